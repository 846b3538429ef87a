use async_trait::async_trait;

use crate::channel::{PlatformChannel, PlatformGuild};
use crate::error::Result;
use crate::message::RawMessage;
use crate::query::HistoryQuery;

/// Read access to a chat platform.
///
/// Implementations own the session (connection, auth, rate limits) and map
/// their own failures onto `MurmurError::NotFound`, `Forbidden` or
/// `Platform`. Everything in this crate talks to the platform through here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn fetch_channel(&self, channel_id: &str) -> Result<PlatformChannel>;

    async fn fetch_guild(&self, guild_id: &str) -> Result<PlatformGuild>;

    /// Every guild the session can see
    async fn guilds(&self) -> Result<Vec<PlatformGuild>>;

    /// All channels of a guild in platform order, categories resolved to
    /// names and active threads attached to the channels that host them
    async fn guild_channels(&self, guild: &PlatformGuild) -> Result<Vec<PlatformChannel>>;

    /// Up to `query.limit` messages inside the query window. Newest first
    /// unless the query asks for oldest first.
    async fn history(
        &self,
        channel: &PlatformChannel,
        query: &HistoryQuery,
    ) -> Result<Vec<RawMessage>>;

    async fn pins(&self, channel: &PlatformChannel) -> Result<Vec<RawMessage>>;

    async fn fetch_message(
        &self,
        channel: &PlatformChannel,
        message_id: &str,
    ) -> Result<RawMessage>;
}
