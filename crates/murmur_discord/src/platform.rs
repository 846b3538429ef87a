use std::collections::HashMap;

use async_trait::async_trait;
use murmur_core::{
    ChatPlatform, HistoryQuery, MurmurError, PlatformChannel, PlatformGuild, RawMessage,
    ResourceKind, Result, ThreadMetadata,
};
use serenity::builder::GetMessages;
use serenity::model::channel::{Channel, ChannelType, GuildChannel, PrivateChannel};
use serenity::model::id::{ChannelId, GuildId, MessageId};
use tracing::{debug, warn};

use crate::convert::{channel_kind, raw_message, timestamp};
use crate::error::{from_serenity, parse_snowflake};
use crate::history::{Cursor, collect_pages};
use crate::session::DiscordSession;

fn guild_channel(channel: &GuildChannel, category: Option<String>) -> PlatformChannel {
    let thread = channel.thread_metadata.as_ref().map(|meta| ThreadMetadata {
        owner: channel.owner_id.map(|id| id.to_string()),
        parent_name: None,
        message_count: channel.message_count.map(u64::from).unwrap_or(0),
        member_count: channel.member_count.map(u64::from).unwrap_or(0),
        archived: meta.archived,
        locked: meta.locked,
        created_at: meta.create_timestamp.as_ref().map(timestamp),
    });

    PlatformChannel {
        id: channel.id.to_string(),
        name: channel.name.clone(),
        kind: channel_kind(channel.kind),
        guild_id: Some(channel.guild_id.to_string()),
        parent_id: channel.parent_id.map(|id| id.to_string()),
        category,
        position: i32::from(channel.position),
        topic: channel.topic.clone(),
        threads: Vec::new(),
        thread,
    }
}

fn private_channel(channel: &PrivateChannel) -> PlatformChannel {
    PlatformChannel {
        id: channel.id.to_string(),
        name: format!("DM with {}", channel.recipient.tag()),
        kind: channel_kind(channel.kind),
        guild_id: None,
        parent_id: None,
        category: None,
        position: 0,
        topic: None,
        threads: Vec::new(),
        thread: None,
    }
}

impl DiscordSession {
    fn channel_id(raw: &str) -> Result<ChannelId> {
        parse_snowflake("channel_id", raw).map(ChannelId::new)
    }

    fn guild_id(raw: &str) -> Result<GuildId> {
        parse_snowflake("guild_id", raw).map(GuildId::new)
    }

    /// Active threads of a guild; an empty list when the bot may not list them
    async fn active_threads(&self, guild_id: GuildId) -> Vec<GuildChannel> {
        match self.http.get_guild_active_threads(guild_id).await {
            Ok(data) => data.threads,
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "could not list active threads");
                Vec::new()
            }
        }
    }

    async fn parent_of(&self, channel: &GuildChannel) -> Option<GuildChannel> {
        let parent_id = channel.parent_id?;
        match self.http.get_channel(parent_id).await {
            Ok(parent) => parent.guild(),
            Err(e) => {
                debug!(parent_id = %parent_id, error = %e, "parent channel unavailable");
                None
            }
        }
    }

    /// Resolve names the channel object only carries as ids
    async fn describe(&self, channel: GuildChannel) -> PlatformChannel {
        let parent = self.parent_of(&channel).await;

        if channel.thread_metadata.is_some() {
            let mut described = guild_channel(&channel, None);
            if let Some(meta) = described.thread.as_mut() {
                meta.parent_name = parent.map(|p| p.name);
                if let Some(owner_id) = channel.owner_id {
                    if let Ok(owner) = self.http.get_user(owner_id).await {
                        meta.owner = Some(owner.tag());
                    }
                }
            }
            return described;
        }

        let category = parent
            .filter(|p| p.kind == ChannelType::Category)
            .map(|p| p.name);
        let mut described = guild_channel(&channel, category);
        if described.capabilities().hosts_threads {
            described.threads = self
                .active_threads(channel.guild_id)
                .await
                .iter()
                .filter(|thread| thread.parent_id == Some(channel.id))
                .map(|thread| guild_channel(thread, None))
                .collect();
        }
        described
    }
}

#[async_trait]
impl ChatPlatform for DiscordSession {
    async fn fetch_channel(&self, channel_id: &str) -> Result<PlatformChannel> {
        let id = Self::channel_id(channel_id)?;
        let channel = self
            .http
            .get_channel(id)
            .await
            .map_err(|e| from_serenity(e, "fetch_channel", ResourceKind::Channel, channel_id))?;

        match channel {
            Channel::Guild(guild_channel) => Ok(self.describe(guild_channel).await),
            Channel::Private(private) => Ok(private_channel(&private)),
            _ => Err(MurmurError::platform(
                "fetch_channel",
                format!("channel {channel_id} has a shape this version cannot read"),
            )),
        }
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<PlatformGuild> {
        let id = Self::guild_id(guild_id)?;
        let guild = self
            .http
            .get_guild_with_counts(id)
            .await
            .map_err(|e| from_serenity(e, "fetch_guild", ResourceKind::Guild, guild_id))?;

        Ok(PlatformGuild {
            id: guild.id.to_string(),
            name: guild.name,
            member_count: guild.approximate_member_count,
        })
    }

    async fn guilds(&self) -> Result<Vec<PlatformGuild>> {
        let guilds = self
            .http
            .get_guilds(None, None)
            .await
            .map_err(|e| MurmurError::platform("guilds", e))?;

        Ok(guilds
            .into_iter()
            .map(|info| PlatformGuild {
                id: info.id.to_string(),
                name: info.name,
                member_count: None,
            })
            .collect())
    }

    async fn guild_channels(&self, guild: &PlatformGuild) -> Result<Vec<PlatformChannel>> {
        let guild_id = Self::guild_id(&guild.id)?;
        let channels = self
            .http
            .get_channels(guild_id)
            .await
            .map_err(|e| from_serenity(e, "guild_channels", ResourceKind::Guild, &guild.id))?;

        let categories: HashMap<ChannelId, String> = channels
            .iter()
            .filter(|channel| channel.kind == ChannelType::Category)
            .map(|channel| (channel.id, channel.name.clone()))
            .collect();
        let threads = self.active_threads(guild_id).await;

        debug!(
            guild_id = %guild.id,
            channels = channels.len(),
            threads = threads.len(),
            "fetched guild channels"
        );

        Ok(channels
            .iter()
            .map(|channel| {
                let category = channel
                    .parent_id
                    .and_then(|parent| categories.get(&parent).cloned());
                let mut converted = guild_channel(channel, category);
                if converted.capabilities().hosts_threads {
                    converted.threads = threads
                        .iter()
                        .filter(|thread| thread.parent_id == Some(channel.id))
                        .map(|thread| {
                            let mut thread = guild_channel(thread, None);
                            if let Some(meta) = thread.thread.as_mut() {
                                meta.parent_name = Some(channel.name.clone());
                            }
                            thread
                        })
                        .collect();
                }
                converted
            })
            .collect())
    }

    async fn history(
        &self,
        channel: &PlatformChannel,
        query: &HistoryQuery,
    ) -> Result<Vec<RawMessage>> {
        let channel_id = Self::channel_id(&channel.id)?;

        let messages = collect_pages(query, |cursor, limit| {
            let http = self.http.clone();
            async move {
                let builder = GetMessages::new().limit(limit);
                let builder = match cursor {
                    // Nothing predates the Discord epoch
                    Cursor::Before(Some(0)) => return Ok(Vec::new()),
                    Cursor::Before(Some(id)) => builder.before(MessageId::new(id)),
                    Cursor::Before(None) => builder,
                    Cursor::After(id) => builder.after(MessageId::new(id.max(1))),
                };
                channel_id.messages(&http, builder).await.map_err(|e| {
                    from_serenity(e, "history", ResourceKind::Channel, &channel_id.to_string())
                })
            }
        })
        .await?;

        Ok(messages
            .iter()
            .map(|message| raw_message(message, channel.guild_id.as_deref()))
            .collect())
    }

    async fn pins(&self, channel: &PlatformChannel) -> Result<Vec<RawMessage>> {
        let channel_id = Self::channel_id(&channel.id)?;
        let pinned = channel_id
            .pins(&self.http)
            .await
            .map_err(|e| from_serenity(e, "pins", ResourceKind::Channel, &channel.id))?;

        Ok(pinned
            .iter()
            .map(|message| raw_message(message, channel.guild_id.as_deref()))
            .collect())
    }

    async fn fetch_message(
        &self,
        channel: &PlatformChannel,
        message_id: &str,
    ) -> Result<RawMessage> {
        let channel_id = Self::channel_id(&channel.id)?;
        let id = parse_snowflake("message_id", message_id).map(MessageId::new)?;
        let message = channel_id
            .message(&self.http, id)
            .await
            .map_err(|e| from_serenity(e, "fetch_message", ResourceKind::Message, message_id))?;

        Ok(raw_message(&message, channel.guild_id.as_deref()))
    }
}
