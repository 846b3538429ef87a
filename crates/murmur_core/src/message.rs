//! Message records and reaction normalization

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Emoji as the platform reports it on a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEmoji {
    Unicode(String),
    Custom {
        name: Option<String>,
        id: Option<u64>,
        animated: bool,
    },
    /// Anything the platform adds later; kept as its display text
    Other(String),
}

impl std::fmt::Display for RawEmoji {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unicode(s) | Self::Other(s) => write!(f, "{s}"),
            Self::Custom { name, id, animated } => {
                let prefix = if *animated { "a" } else { "" };
                let name = name.as_deref().unwrap_or("_");
                match id {
                    Some(id) => write!(f, "<{prefix}:{name}:{id}>"),
                    None => write!(f, ":{name}:"),
                }
            }
        }
    }
}

impl RawEmoji {
    /// Stable identity for an emoji.
    ///
    /// Literal emoji first, then a custom emoji's name, then its numeric id,
    /// then whatever the display form is.
    pub fn resolve(&self) -> String {
        match self {
            Self::Unicode(s) => s.clone(),
            Self::Custom {
                name: Some(name), ..
            } if !name.is_empty() => name.clone(),
            Self::Custom { id: Some(id), .. } => id.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReaction {
    pub emoji: RawEmoji,
    pub count: u64,
}

/// A message as fetched from the platform, before normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub id: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reactions: Vec<RawReaction>,
    pub permalink: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCount {
    pub emoji: String,
    pub count: u64,
}

/// Normalize a reaction list, preserving fetch order
pub fn normalize_reactions(reactions: &[RawReaction]) -> Vec<ReactionCount> {
    reactions
        .iter()
        .map(|reaction| {
            let emoji = reaction.emoji.resolve();
            tracing::trace!(emoji = %emoji, count = reaction.count, "found reaction");
            ReactionCount {
                emoji,
                count: reaction.count,
            }
        })
        .collect()
}

/// Request-scoped snapshot of a platform message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub author: String,
    pub content: String,
    /// ISO-8601 creation time
    pub timestamp: String,
    pub reactions: Vec<ReactionCount>,
    #[serde(rename = "jump_url")]
    pub permalink: String,
}

impl MessageRecord {
    pub fn total_reactions(&self) -> u64 {
        self.reactions.iter().map(|r| r.count).sum()
    }

    pub fn reaction_type_count(&self) -> usize {
        self.reactions.len()
    }
}

impl From<RawMessage> for MessageRecord {
    fn from(raw: RawMessage) -> Self {
        let reactions = normalize_reactions(&raw.reactions);
        Self {
            id: raw.id,
            author: raw.author,
            content: raw.content,
            timestamp: raw.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, false),
            reactions,
            permalink: raw.permalink,
        }
    }
}
