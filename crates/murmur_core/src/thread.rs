//! Thread detail inspection
//!
//! The thread itself must resolve or the call fails. The starter message
//! and the recent-message sample are side fetches: when they fail the
//! inspection still completes and records a [`Probe::Failed`].

use chrono::SecondsFormat;
use serde::Serialize;

use crate::collector::MessageCollector;
use crate::config::LimitsConfig;
use crate::error::{MurmurError, Result};
use crate::format::truncate_chars;
use crate::message::MessageRecord;
use crate::platform::ChatPlatform;
use crate::probe::Probe;
use crate::query::HistoryQuery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadDetails {
    pub id: String,
    pub name: String,
    pub parent_channel: Option<String>,
    pub parent_channel_id: Option<String>,
    pub owner: Option<String>,
    pub created_at: Option<String>,
    pub archived: bool,
    pub locked: bool,
    pub message_count: u64,
    pub member_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadInspection {
    pub details: ThreadDetails,
    pub starter: Probe<MessageRecord>,
    /// Newest first, starter excluded, bodies truncated for display
    pub recent: Probe<Vec<MessageRecord>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadOptions {
    pub include_recent_messages: bool,
    pub recent_limit: u32,
}

impl Default for ThreadOptions {
    fn default() -> Self {
        Self {
            include_recent_messages: true,
            recent_limit: 5,
        }
    }
}

impl ThreadOptions {
    /// Build options from loosely supplied arguments; the limit is clamped
    /// to at least one here and to the configured maximum at inspection time
    pub fn new(include_recent_messages: Option<bool>, recent_limit: Option<i64>) -> Self {
        let defaults = Self::default();
        Self {
            include_recent_messages: include_recent_messages
                .unwrap_or(defaults.include_recent_messages),
            recent_limit: recent_limit
                .map(|limit| u32::try_from(limit.max(1)).unwrap_or(u32::MAX))
                .unwrap_or(defaults.recent_limit),
        }
    }
}

#[derive(Clone)]
pub struct ThreadInspector<'a> {
    platform: &'a dyn ChatPlatform,
    limits: LimitsConfig,
}

impl<'a> ThreadInspector<'a> {
    pub fn new(platform: &'a dyn ChatPlatform, limits: LimitsConfig) -> Self {
        Self { platform, limits }
    }

    pub async fn inspect(&self, thread_id: &str, options: ThreadOptions) -> Result<ThreadInspection> {
        let channel = self.platform.fetch_channel(thread_id).await?;
        if !channel.kind.is_thread() {
            return Err(MurmurError::NotAThread {
                channel_id: thread_id.to_string(),
                kind: channel.kind,
            });
        }

        let meta = channel.thread.clone().unwrap_or_default();
        let details = ThreadDetails {
            id: channel.id.clone(),
            name: channel.name.clone(),
            parent_channel: meta.parent_name.clone(),
            parent_channel_id: channel.parent_id.clone(),
            owner: meta.owner.clone(),
            created_at: meta
                .created_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            archived: meta.archived,
            locked: meta.locked,
            message_count: meta.message_count,
            member_count: meta.member_count,
        };

        // A thread shares its id with the message that started it
        let starter = match self.platform.fetch_message(&channel, &channel.id).await {
            Ok(raw) => Probe::Completed(MessageRecord::from(raw)),
            Err(e) => {
                tracing::warn!(thread_id, error = %e, "starter message unavailable");
                Probe::Failed(e.to_string())
            }
        };

        let recent = if options.include_recent_messages && details.message_count > 1 {
            let limit = options.recent_limit.clamp(1, self.limits.thread_recent_max.max(1));
            let collected = MessageCollector::new(self.platform)
                .collect(&channel, &HistoryQuery::new(limit))
                .await;

            match collected {
                Ok(messages) => Probe::Completed(
                    messages
                        .into_iter()
                        .filter(|message| message.id != channel.id)
                        .map(|mut message| {
                            message.content =
                                truncate_chars(&message.content, self.limits.preview_chars);
                            message
                        })
                        .collect(),
                ),
                Err(e) => {
                    tracing::warn!(thread_id, error = %e, "recent thread messages unavailable");
                    Probe::Failed(e.to_string())
                }
            }
        } else {
            Probe::Skipped
        };

        Ok(ThreadInspection {
            details,
            starter,
            recent,
        })
    }
}
