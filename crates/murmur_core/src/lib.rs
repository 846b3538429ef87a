//! Murmur Core - Discord retrieval and analysis layer
//!
//! This crate holds everything that turns raw chat-platform data into
//! something an agent can reason about: history query validation,
//! message and reaction normalization, hot-message detection, the
//! guild → category → channel → thread workspace model, working-group
//! detection and the text rendering of all of the above.
//!
//! Network access lives behind the [`ChatPlatform`] capability so the
//! whole layer can run against an in-memory fake in tests.

pub mod channel;
pub mod collector;
pub mod config;
pub mod error;
pub mod format;
pub mod hot;
pub mod message;
pub mod persona;
pub mod platform;
pub mod probe;
pub mod query;
pub mod thread;
pub mod timestamp;
pub mod working_group;
pub mod workspace;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use channel::{
    Capabilities, Capability, ChannelKind, ChannelNode, ChannelSummary, PlatformChannel,
    PlatformGuild, ThreadMetadata, ThreadSummary,
};
pub use collector::MessageCollector;
pub use config::MurmurConfig;
pub use error::{MurmurError, ResourceKind, Result};
pub use hot::{HotMessage, filter_hot_messages};
pub use message::{MessageRecord, RawEmoji, RawMessage, RawReaction, ReactionCount};
pub use persona::Persona;
pub use platform::ChatPlatform;
pub use probe::Probe;
pub use query::{HistoryQuery, HotCriteria, MessageFilter, ReactionFilter};
pub use thread::{ThreadInspection, ThreadInspector, ThreadOptions};
pub use working_group::{GroupKind, WorkingGroup, detect_working_groups};
pub use workspace::{WorkspaceAnalyzer, WorkspaceStructure};
