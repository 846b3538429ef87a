//! Discord read access for Murmur
//!
//! [`DiscordSession`] wraps a serenity HTTP client and implements
//! [`murmur_core::ChatPlatform`]. No gateway connection is opened; every
//! operation is a REST request made on demand.

pub mod convert;
pub mod error;
pub mod history;
mod platform;
pub mod session;

pub use error::DiscordError;
pub use session::DiscordSession;
