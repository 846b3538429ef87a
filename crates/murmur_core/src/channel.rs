//! Normalized channel, thread and guild representations
//!
//! Channel kinds are tagged with the capabilities they support instead of
//! being matched against a closed list of concrete types at every call
//! site. Adding a kind means adding one row to [`ChannelKind::capabilities`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{MurmurError, Result};
use crate::probe::Probe;

/// Discord channel kinds, named the way the platform reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Text,
    News,
    Voice,
    Stage,
    Forum,
    Category,
    PublicThread,
    PrivateThread,
    NewsThread,
    Directory,
    Dm,
    GroupDm,
    Unknown(u8),
}

/// What a channel kind can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub supports_history: bool,
    pub supports_pins: bool,
    pub is_thread: bool,
    /// Active threads are enumerated beneath channels of this kind
    pub hosts_threads: bool,
    /// Kept when building the workspace tree
    pub in_workspace: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    History,
    Pins,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::History => write!(f, "message history"),
            Self::Pins => write!(f, "pinned messages"),
        }
    }
}

impl ChannelKind {
    pub const fn capabilities(self) -> Capabilities {
        const NONE: Capabilities = Capabilities {
            supports_history: false,
            supports_pins: false,
            is_thread: false,
            hosts_threads: false,
            in_workspace: false,
        };

        match self {
            Self::Text | Self::News => Capabilities {
                supports_history: true,
                supports_pins: true,
                hosts_threads: true,
                in_workspace: true,
                ..NONE
            },
            Self::Voice => Capabilities {
                supports_history: true,
                in_workspace: true,
                ..NONE
            },
            Self::PublicThread | Self::PrivateThread | Self::NewsThread => Capabilities {
                supports_history: true,
                supports_pins: true,
                is_thread: true,
                ..NONE
            },
            Self::Dm => Capabilities {
                supports_history: true,
                supports_pins: true,
                ..NONE
            },
            Self::Stage
            | Self::Forum
            | Self::Category
            | Self::Directory
            | Self::GroupDm
            | Self::Unknown(_) => NONE,
        }
    }

    pub const fn is_thread(self) -> bool {
        self.capabilities().is_thread
    }

    pub const fn supports(self, capability: Capability) -> bool {
        let caps = self.capabilities();
        match capability {
            Capability::History => caps.supports_history,
            Capability::Pins => caps.supports_pins,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::News => write!(f, "news"),
            Self::Voice => write!(f, "voice"),
            Self::Stage => write!(f, "stage_voice"),
            Self::Forum => write!(f, "forum"),
            Self::Category => write!(f, "category"),
            Self::PublicThread => write!(f, "public_thread"),
            Self::PrivateThread => write!(f, "private_thread"),
            Self::NewsThread => write!(f, "news_thread"),
            Self::Directory => write!(f, "directory"),
            Self::Dm => write!(f, "private"),
            Self::GroupDm => write!(f, "group"),
            Self::Unknown(raw) => write!(f, "unknown({raw})"),
        }
    }
}

impl Serialize for ChannelKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Thread-specific fields carried by thread channels
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreadMetadata {
    pub owner: Option<String>,
    pub parent_name: Option<String>,
    pub message_count: u64,
    pub member_count: u64,
    pub archived: bool,
    pub locked: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// A channel as handed over by the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformChannel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    pub guild_id: Option<String>,
    pub parent_id: Option<String>,
    /// Display name of the enclosing category, resolved by the platform
    pub category: Option<String>,
    pub position: i32,
    pub topic: Option<String>,
    /// Active threads, attached only to kinds that host them
    pub threads: Vec<PlatformChannel>,
    pub thread: Option<ThreadMetadata>,
}

impl PlatformChannel {
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Fail with `UnsupportedChannel` unless this channel's kind supports `capability`
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.kind.supports(capability) {
            Ok(())
        } else {
            Err(MurmurError::UnsupportedChannel {
                channel_id: self.id.clone(),
                kind: self.kind,
                capability,
            })
        }
    }

    pub fn thread_summary(&self) -> ThreadSummary {
        let meta = self.thread.clone().unwrap_or_default();
        ThreadSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            message_count: meta.message_count,
            member_count: meta.member_count,
            archived: meta.archived,
            created_at: meta.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformGuild {
    pub id: String,
    pub name: String,
    pub member_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub name: String,
    pub message_count: u64,
    pub member_count: u64,
    pub archived: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// One channel in the workspace tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub category: String,
    pub position: i32,
    pub topic: Option<String>,
    pub threads: Vec<ThreadSummary>,
    /// Messages seen by the activity probe; 0 when it was skipped or failed
    pub recent_activity: usize,
    pub activity_probe: Probe<usize>,
}

/// Flat channel description used by the listing tools
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub position: i32,
    pub category_id: Option<String>,
    pub category: Option<String>,
    pub guild_id: Option<String>,
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<ThreadRef>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
}

impl From<&PlatformChannel> for ChannelSummary {
    fn from(channel: &PlatformChannel) -> Self {
        let threads = channel.capabilities().hosts_threads.then(|| {
            channel
                .threads
                .iter()
                .map(|thread| ThreadRef {
                    id: thread.id.clone(),
                    name: thread.name.clone(),
                    kind: thread.kind,
                })
                .collect()
        });

        Self {
            id: channel.id.clone(),
            name: channel.name.clone(),
            kind: channel.kind,
            position: channel.position,
            category_id: channel.parent_id.clone(),
            category: channel.category.clone(),
            guild_id: channel.guild_id.clone(),
            topic: channel.topic.clone(),
            threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{text_channel, thread, voice_channel};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capability_tags() {
        let text = ChannelKind::Text.capabilities();
        assert!(text.supports_history && text.supports_pins && text.hosts_threads);
        assert!(!text.is_thread);

        let voice = ChannelKind::Voice.capabilities();
        assert!(voice.supports_history);
        assert!(!voice.supports_pins);
        assert!(voice.in_workspace);

        assert!(ChannelKind::PrivateThread.is_thread());
        assert!(!ChannelKind::PrivateThread.capabilities().in_workspace);
        assert_eq!(ChannelKind::Forum.capabilities(), Capabilities::default());
        assert_eq!(ChannelKind::Unknown(99).capabilities(), Capabilities::default());
    }

    #[test]
    fn test_require_reports_kind_and_capability() {
        let voice = voice_channel("5", "standup", None);
        assert!(voice.require(Capability::History).is_ok());

        let err = voice.require(Capability::Pins).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Channel type voice does not support pinned messages"
        );
    }

    #[test]
    fn test_kind_serializes_as_platform_name() {
        let json = serde_json::to_string(&ChannelKind::Stage).unwrap();
        assert_eq!(json, "\"stage_voice\"");
        assert_eq!(ChannelKind::Dm.to_string(), "private");
    }

    #[test]
    fn test_summary_lists_threads_only_for_thread_hosts() {
        let mut general = text_channel("1", "general", Some("Lobby"));
        general.threads.push(thread("11", "1", "welcome", 4));

        let summary = ChannelSummary::from(&general);
        let threads = summary.threads.expect("text channels list threads");
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].name, "welcome");
        assert_eq!(summary.category.as_deref(), Some("Lobby"));

        let voice = voice_channel("2", "hangout", None);
        assert!(ChannelSummary::from(&voice).threads.is_none());
    }
}
