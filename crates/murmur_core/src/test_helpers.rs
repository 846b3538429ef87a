//! In-memory chat platform and fixtures for tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

use crate::channel::{ChannelKind, PlatformChannel, PlatformGuild, ThreadMetadata};
use crate::error::{MurmurError, ResourceKind, Result};
use crate::message::{MessageRecord, RawEmoji, RawMessage, RawReaction};
use crate::platform::ChatPlatform;
use crate::query::HistoryQuery;

pub const FAKE_GUILD_ID: &str = "900";

/// A [`ChatPlatform`] backed by vectors.
///
/// Messages are stored oldest first, the way they were posted. Channels
/// can be made to fail their history fetch or to answer `Forbidden`.
#[derive(Debug, Default)]
pub struct FakePlatform {
    guilds: Vec<PlatformGuild>,
    channels: Vec<PlatformChannel>,
    messages: HashMap<String, Vec<RawMessage>>,
    pins: HashMap<String, Vec<RawMessage>>,
    failing_history: HashSet<String>,
    forbidden: HashSet<String>,
    history_calls: Mutex<Vec<(String, u32)>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guild(mut self, guild: PlatformGuild) -> Self {
        self.guilds.push(guild);
        self
    }

    pub fn with_channel(mut self, channel: PlatformChannel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_messages(mut self, channel_id: &str, messages: Vec<RawMessage>) -> Self {
        self.messages.insert(channel_id.to_string(), messages);
        self
    }

    pub fn with_pins(mut self, channel_id: &str, messages: Vec<RawMessage>) -> Self {
        self.pins.insert(channel_id.to_string(), messages);
        self
    }

    pub fn with_failing_history(mut self, channel_id: &str) -> Self {
        self.failing_history.insert(channel_id.to_string());
        self
    }

    pub fn with_forbidden(mut self, id: &str) -> Self {
        self.forbidden.insert(id.to_string());
        self
    }

    /// Look a channel up directly, including attached threads
    pub fn channel(&self, channel_id: &str) -> PlatformChannel {
        self.find_channel(channel_id)
            .unwrap_or_else(|| panic!("fake platform has no channel {channel_id}"))
    }

    /// Limits of every history call, in call order
    pub fn history_limits(&self) -> Vec<u32> {
        self.history_calls.lock().iter().map(|(_, l)| *l).collect()
    }

    /// Channel ids of every history call, in call order
    pub fn history_channels(&self) -> Vec<String> {
        self.history_calls
            .lock()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn find_channel(&self, channel_id: &str) -> Option<PlatformChannel> {
        self.channels
            .iter()
            .flat_map(|channel| std::iter::once(channel).chain(channel.threads.iter()))
            .find(|channel| channel.id == channel_id)
            .cloned()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn fetch_channel(&self, channel_id: &str) -> Result<PlatformChannel> {
        if self.forbidden.contains(channel_id) {
            return Err(MurmurError::forbidden(ResourceKind::Channel, channel_id));
        }
        self.find_channel(channel_id)
            .ok_or_else(|| MurmurError::not_found(ResourceKind::Channel, channel_id))
    }

    async fn fetch_guild(&self, guild_id: &str) -> Result<PlatformGuild> {
        if self.forbidden.contains(guild_id) {
            return Err(MurmurError::forbidden(ResourceKind::Guild, guild_id));
        }
        self.guilds
            .iter()
            .find(|guild| guild.id == guild_id)
            .cloned()
            .ok_or_else(|| MurmurError::not_found(ResourceKind::Guild, guild_id))
    }

    async fn guilds(&self) -> Result<Vec<PlatformGuild>> {
        Ok(self.guilds.clone())
    }

    async fn guild_channels(&self, guild: &PlatformGuild) -> Result<Vec<PlatformChannel>> {
        Ok(self
            .channels
            .iter()
            .filter(|channel| channel.guild_id.as_deref() == Some(guild.id.as_str()))
            .filter(|channel| !channel.kind.is_thread())
            .cloned()
            .collect())
    }

    async fn history(
        &self,
        channel: &PlatformChannel,
        query: &HistoryQuery,
    ) -> Result<Vec<RawMessage>> {
        self.history_calls
            .lock()
            .push((channel.id.clone(), query.limit));

        if self.failing_history.contains(&channel.id) {
            return Err(MurmurError::platform(
                "history",
                format!("simulated outage for channel {}", channel.id),
            ));
        }
        if self.forbidden.contains(&channel.id) {
            return Err(MurmurError::forbidden(ResourceKind::Channel, &channel.id));
        }

        let window = self
            .messages
            .get(&channel.id)
            .into_iter()
            .flatten()
            .filter(|message| query.admits(message.created_at))
            .cloned();

        let limit = query.limit as usize;
        Ok(if query.is_oldest_first() {
            window.take(limit).collect()
        } else {
            let mut newest: Vec<_> = window.collect();
            newest.reverse();
            newest.truncate(limit);
            newest
        })
    }

    async fn pins(&self, channel: &PlatformChannel) -> Result<Vec<RawMessage>> {
        Ok(self.pins.get(&channel.id).cloned().unwrap_or_default())
    }

    async fn fetch_message(
        &self,
        channel: &PlatformChannel,
        message_id: &str,
    ) -> Result<RawMessage> {
        self.messages
            .get(&channel.id)
            .and_then(|messages| messages.iter().find(|m| m.id == message_id))
            .cloned()
            .ok_or_else(|| MurmurError::not_found(ResourceKind::Message, message_id))
    }
}

pub fn guild(id: &str, name: &str) -> PlatformGuild {
    PlatformGuild {
        id: id.to_string(),
        name: name.to_string(),
        member_count: Some(42),
    }
}

pub fn channel_of(
    kind: ChannelKind,
    id: &str,
    name: &str,
    category: Option<&str>,
) -> PlatformChannel {
    PlatformChannel {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        guild_id: Some(FAKE_GUILD_ID.to_string()),
        parent_id: category.map(|_| format!("cat-{id}")),
        category: category.map(String::from),
        position: 0,
        topic: None,
        threads: Vec::new(),
        thread: None,
    }
}

pub fn text_channel(id: &str, name: &str, category: Option<&str>) -> PlatformChannel {
    channel_of(ChannelKind::Text, id, name, category)
}

pub fn voice_channel(id: &str, name: &str, category: Option<&str>) -> PlatformChannel {
    channel_of(ChannelKind::Voice, id, name, category)
}

pub fn category(id: &str, name: &str) -> PlatformChannel {
    channel_of(ChannelKind::Category, id, name, None)
}

pub fn thread(id: &str, parent_id: &str, name: &str, message_count: u64) -> PlatformChannel {
    PlatformChannel {
        parent_id: Some(parent_id.to_string()),
        thread: Some(ThreadMetadata {
            owner: Some("ada".to_string()),
            parent_name: None,
            message_count,
            member_count: 2,
            archived: false,
            locked: false,
            created_at: Some(base_time()),
        }),
        ..channel_of(ChannelKind::PublicThread, id, name, None)
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A raw message whose creation time is `id` minutes after 2024-01-01
pub fn message(id: &str, author: &str, content: &str, reactions: &[(&str, u64)]) -> RawMessage {
    let minutes = id.parse::<i64>().unwrap_or(0);
    RawMessage {
        id: id.to_string(),
        author: author.to_string(),
        content: content.to_string(),
        created_at: base_time() + Duration::minutes(minutes),
        reactions: reactions
            .iter()
            .map(|(emoji, count)| RawReaction {
                emoji: RawEmoji::Unicode(emoji.to_string()),
                count: *count,
            })
            .collect(),
        permalink: format!("https://discord.com/channels/{FAKE_GUILD_ID}/0/{id}"),
    }
}

pub fn record(id: &str, author: &str, content: &str, reactions: &[(&str, u64)]) -> MessageRecord {
    MessageRecord::from(message(id, author, content, reactions))
}
