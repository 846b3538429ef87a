//! Serenity model → core model conversions

use chrono::{DateTime, Utc};
use murmur_core::{ChannelKind, RawEmoji, RawMessage, RawReaction};
use serenity::model::channel::{ChannelType, Message, ReactionType};
use serenity::model::id::{ChannelId, MessageId};
use serenity::model::Timestamp;

pub fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::News => ChannelKind::News,
        ChannelType::Voice => ChannelKind::Voice,
        ChannelType::Stage => ChannelKind::Stage,
        ChannelType::Forum => ChannelKind::Forum,
        ChannelType::Category => ChannelKind::Category,
        ChannelType::PublicThread => ChannelKind::PublicThread,
        ChannelType::PrivateThread => ChannelKind::PrivateThread,
        ChannelType::NewsThread => ChannelKind::NewsThread,
        ChannelType::Directory => ChannelKind::Directory,
        ChannelType::Private => ChannelKind::Dm,
        ChannelType::GroupDm => ChannelKind::GroupDm,
        other => ChannelKind::Unknown(u8::from(other)),
    }
}

pub fn emoji(reaction: &ReactionType) -> RawEmoji {
    match reaction {
        ReactionType::Unicode(s) => RawEmoji::Unicode(s.clone()),
        ReactionType::Custom { animated, id, name } => RawEmoji::Custom {
            name: name.clone(),
            id: Some(id.get()),
            animated: *animated,
        },
        other => RawEmoji::Other(other.to_string()),
    }
}

pub fn timestamp(ts: &Timestamp) -> DateTime<Utc> {
    **ts
}

pub fn permalink(guild_id: Option<&str>, channel_id: ChannelId, message_id: MessageId) -> String {
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild_id.unwrap_or("@me"),
        channel_id,
        message_id
    )
}

pub fn raw_message(msg: &Message, guild_id: Option<&str>) -> RawMessage {
    let message_guild = msg.guild_id.map(|id| id.to_string());
    let guild_id = guild_id.or(message_guild.as_deref());

    RawMessage {
        id: msg.id.to_string(),
        author: msg.author.tag(),
        content: msg.content.clone(),
        created_at: timestamp(&msg.timestamp),
        reactions: msg
            .reactions
            .iter()
            .map(|reaction| RawReaction {
                emoji: emoji(&reaction.reaction_type),
                count: reaction.count,
            })
            .collect(),
        permalink: permalink(guild_id, msg.channel_id, msg.id),
    }
}
