//! Text rendering for the agent-facing surface
//!
//! Agents read these blocks directly, so the layouts are kept stable.

use std::fmt::Write;

use crate::channel::{ChannelSummary, PlatformChannel, PlatformGuild};
use crate::hot::HotMessage;
use crate::message::{MessageRecord, ReactionCount};
use crate::query::HistoryQuery;
use crate::thread::ThreadInspection;
use crate::working_group::{GroupKind, WorkingGroup};
use crate::workspace::WorkspaceStructure;

/// Hot entries shown in a report
pub const HOT_DISPLAY_LIMIT: usize = 10;

/// Threads listed per channel in the workspace overview
const OVERVIEW_THREADS: usize = 3;

/// Keep the first `max` characters, appending `...` when anything was cut
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// `emoji(count), ...` or `No reactions`
pub fn format_reactions(reactions: &[ReactionCount]) -> String {
    if reactions.is_empty() {
        return "No reactions".to_string();
    }
    reactions
        .iter()
        .map(|r| format!("{}({})", r.emoji, r.count))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn message_list(messages: &[MessageRecord]) -> String {
    if messages.is_empty() {
        return "No messages found.".to_string();
    }

    messages
        .iter()
        .map(|msg| {
            let mut block = format!("{} ({}): {}", msg.author, msg.timestamp, msg.content);
            if !msg.reactions.is_empty() {
                let _ = write!(block, "\nReactions: {}", format_reactions(&msg.reactions));
            }
            if !msg.permalink.is_empty() {
                let _ = write!(block, "\nJump URL: {}", msg.permalink);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn history_report(messages: &[MessageRecord], query: &HistoryQuery) -> String {
    format!(
        "Retrieved {} messages (filters: {}):\n\n{}",
        messages.len(),
        query.summary(),
        message_list(messages)
    )
}

pub fn pinned_report(messages: &[MessageRecord]) -> String {
    if messages.is_empty() {
        return "No pinned messages found in this channel".to_string();
    }

    let body = messages
        .iter()
        .map(|msg| {
            format!(
                "📌 {} ({}): {}\nReactions: {}\nJump URL: {}",
                msg.author,
                msg.timestamp,
                msg.content,
                format_reactions(&msg.reactions),
                msg.permalink
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Found {} pinned messages:\n\n{}", messages.len(), body)
}

pub fn hot_messages(hot: &[HotMessage], preview_chars: usize) -> String {
    if hot.is_empty() {
        return "No highly reacted messages found.".to_string();
    }

    hot.iter()
        .take(HOT_DISPLAY_LIMIT)
        .map(|entry| {
            let msg = &entry.message;
            format!(
                "🔥 {} ({}) - {} reactions ({} types):\n{}\nReactions: {}\nJump URL: {}",
                msg.author,
                msg.timestamp,
                entry.total_reactions,
                entry.reaction_types,
                truncate_chars(&msg.content, preview_chars),
                format_reactions(&msg.reactions),
                msg.permalink
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn hot_report(hot: &[HotMessage], scanned: usize, preview_chars: usize) -> String {
    if hot.is_empty() {
        return format!("No highly reacted messages found in the last {scanned} messages.");
    }
    format!(
        "Found {} highly reacted messages in the last {} messages:\n\n{}",
        hot.len(),
        scanned,
        hot_messages(hot, preview_chars)
    )
}

pub fn channel_list(channels: &[ChannelSummary]) -> String {
    if channels.is_empty() {
        return "No channels found.".to_string();
    }

    channels
        .iter()
        .map(|ch| {
            format!(
                "📢 {} (ID: {}) - {}\n   Topic: {}\n   Category: {}",
                ch.name,
                ch.id,
                ch.kind,
                ch.topic.as_deref().unwrap_or("No topic"),
                ch.category.as_deref().unwrap_or("None"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn guild_channel_report(guild: &PlatformGuild, channels: &[ChannelSummary]) -> String {
    format!(
        "{} channels in {} (ID: {}):\n\n{}",
        channels.len(),
        guild.name,
        guild.id,
        channel_list(channels)
    )
}

pub fn channel_details(channel: &PlatformChannel) -> String {
    let mut out = format!("Channel: #{} (ID: {})\n", channel.name, channel.id);
    let _ = writeln!(out, "Type: {}", channel.kind);
    if let Some(guild_id) = &channel.guild_id {
        let _ = writeln!(out, "Server ID: {guild_id}");
    }
    let _ = writeln!(
        out,
        "Category: {}",
        channel.category.as_deref().unwrap_or("None")
    );
    if let Some(parent_id) = &channel.parent_id {
        let _ = writeln!(out, "Parent ID: {parent_id}");
    }
    let _ = writeln!(out, "Position: {}", channel.position);
    let _ = writeln!(
        out,
        "Topic: {}",
        channel.topic.as_deref().unwrap_or("No topic")
    );

    let caps = channel.capabilities();
    let _ = writeln!(
        out,
        "Supports: history={}, pins={}",
        caps.supports_history, caps.supports_pins
    );

    if let Some(meta) = &channel.thread {
        let _ = writeln!(
            out,
            "Thread: {} messages, {} members, {}{}",
            meta.message_count,
            meta.member_count,
            if meta.archived { "archived" } else { "active" },
            if meta.locked { ", locked" } else { "" }
        );
    }
    if caps.hosts_threads {
        let _ = writeln!(out, "Active threads: {}", channel.threads.len());
    }
    out
}

pub fn workspace_overview(workspace: &WorkspaceStructure) -> String {
    let mut out = format!(
        "🏢 **{}** Workspace Overview\n📊 {} channels, {} threads\n\n",
        workspace.guild_info.name,
        workspace.total_channels(),
        workspace.total_threads()
    );

    for category in workspace.categories() {
        let _ = writeln!(
            out,
            "📁 **{}** ({} channels, {} threads)",
            category.name,
            category.channels.len(),
            category.total_threads
        );

        for channel in &category.channels {
            let thread_info = if channel.threads.is_empty() {
                String::new()
            } else {
                format!(" ({} threads)", channel.threads.len())
            };
            let activity_info = if channel.recent_activity > 0 {
                format!(" - {} recent msgs", channel.recent_activity)
            } else {
                String::new()
            };
            let _ = writeln!(out, "   #{}{}{}", channel.name, thread_info, activity_info);

            for thread in channel.threads.iter().take(OVERVIEW_THREADS) {
                let _ = writeln!(out, "     🧵 {} ({} msgs)", thread.name, thread.message_count);
            }
            if channel.threads.len() > OVERVIEW_THREADS {
                let _ = writeln!(
                    out,
                    "     ... and {} more threads",
                    channel.threads.len() - OVERVIEW_THREADS
                );
            }
        }
        out.push('\n');
    }

    out
}

pub fn working_groups(groups: &[WorkingGroup]) -> String {
    if groups.is_empty() {
        return "No working groups or active projects found.".to_string();
    }

    let mut out = String::from("🏗️ **Working Groups & Active Projects**\n\n");
    for group in groups {
        let icon = match group.kind {
            GroupKind::WorkingGroup => "👥",
            GroupKind::ActiveProject => "🚀",
        };
        let _ = writeln!(
            out,
            "{} **#{}** ({})",
            icon, group.channel_name, group.category
        );
        let _ = writeln!(
            out,
            "   📊 {} threads, {} recent messages",
            group.thread_count, group.recent_activity
        );

        if !group.threads.is_empty() {
            out.push_str("   📋 Active Threads:\n");
            for thread in &group.threads {
                let status = if thread.archived {
                    "📦 Archived"
                } else {
                    "🟢 Active"
                };
                let _ = writeln!(
                    out,
                    "      • {} ({} msgs) {}",
                    thread.name, thread.message_count, status
                );
            }
        }
        out.push('\n');
    }
    out
}

pub fn thread_analysis(inspection: &ThreadInspection) -> String {
    let details = &inspection.details;
    let mut out = format!("Thread Analysis: {}\n", details.name);
    let _ = writeln!(
        out,
        "Messages: {} | Members: {}",
        details.message_count, details.member_count
    );
    let _ = writeln!(
        out,
        "Created: {} | Owner: {}",
        details.created_at.as_deref().unwrap_or("Unknown"),
        details.owner.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(
        out,
        "Status: {} | {}",
        if details.archived { "Archived" } else { "Active" },
        if details.locked { "Locked" } else { "Unlocked" }
    );
    out.push('\n');

    if let Some(starter) = inspection.starter.completed() {
        let _ = writeln!(
            out,
            "📝 Starter Message by {}:\n{}",
            starter.author, starter.content
        );
        let _ = writeln!(out, "Reactions: {}\n", format_reactions(&starter.reactions));
    }

    if let Some(recent) = inspection.recent.completed().filter(|r| !r.is_empty()) {
        let _ = writeln!(out, "🔄 Recent Messages ({}):", recent.len());
        for msg in recent {
            let _ = writeln!(
                out,
                "{}: {}\nReactions: {}\n",
                msg.author,
                msg.content,
                format_reactions(&msg.reactions)
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Probe;
    use crate::query::HotCriteria;
    use crate::test_helpers::record;
    use crate::thread::ThreadDetails;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_chars("héllo", 10), "héllo");
        assert_eq!(truncate_chars("héllo", 2), "hé...");
        assert_eq!(truncate_chars("🔥🔥🔥", 1), "🔥...");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn test_reactions_line() {
        assert_eq!(format_reactions(&[]), "No reactions");
        let msg = record("1", "a", "x", &[("👍", 3), ("party", 1)]);
        assert_eq!(format_reactions(&msg.reactions), "👍(3), party(1)");
    }

    #[test]
    fn test_message_list_layout() {
        let mut quiet = record("1", "ada", "hello", &[]);
        quiet.timestamp = "2024-01-01T00:00:00+00:00".into();
        let mut loud = record("2", "grace", "ship", &[("🔥", 2)]);
        loud.timestamp = "2024-01-01T00:01:00+00:00".into();

        assert_eq!(
            message_list(&[quiet.clone(), loud.clone()]),
            format!(
                "ada (2024-01-01T00:00:00+00:00): hello\nJump URL: {}\n\n\
                 grace (2024-01-01T00:01:00+00:00): ship\nReactions: 🔥(2)\nJump URL: {}",
                quiet.permalink, loud.permalink
            )
        );
        assert_eq!(message_list(&[]), "No messages found.");
    }

    #[test]
    fn test_history_report_header() {
        let msg = record("1", "ada", "hello", &[]);
        let report = history_report(&[msg], &HistoryQuery::new(10));
        assert!(report.starts_with("Retrieved 1 messages (filters: limit=10):\n\n"));
    }

    #[test]
    fn test_pinned_always_shows_reactions() {
        let msg = record("1", "ada", "rules", &[]);
        let report = pinned_report(&[msg]);
        assert!(report.starts_with("Found 1 pinned messages:\n\n📌 ada"));
        assert!(report.contains("\nReactions: No reactions\n"));
        assert_eq!(pinned_report(&[]), "No pinned messages found in this channel");
    }

    #[test]
    fn test_hot_report_shows_ten_with_previews() {
        let long = "y".repeat(300);
        let messages: Vec<_> = (0..12)
            .map(|i| record(&i.to_string(), "ada", &long, &[("🔥", 12 - i as u64)]))
            .collect();
        let hot = crate::filter_hot_messages(&messages, &HotCriteria::default());

        let rendered = hot_messages(&hot, 200);
        assert_eq!(rendered.matches("🔥 ada").count(), 10);
        assert!(rendered.starts_with("🔥 ada ("));
        assert!(rendered.contains(" - 12 reactions (1 types):\n"));
        assert!(rendered.contains(&format!("{}...", "y".repeat(200))));
        assert!(!rendered.contains(&"y".repeat(201)));
    }

    #[test]
    fn test_thread_analysis_layout() {
        let inspection = ThreadInspection {
            details: ThreadDetails {
                id: "5".into(),
                name: "roadmap".into(),
                parent_channel: Some("general".into()),
                parent_channel_id: Some("1".into()),
                owner: Some("ada".into()),
                created_at: None,
                archived: false,
                locked: true,
                message_count: 3,
                member_count: 2,
            },
            starter: Probe::Completed(record("5", "ada", "kick off", &[("👍", 1)])),
            recent: Probe::Completed(vec![record("6", "grace", "yes", &[])]),
        };

        assert_eq!(
            thread_analysis(&inspection),
            "Thread Analysis: roadmap\n\
             Messages: 3 | Members: 2\n\
             Created: Unknown | Owner: ada\n\
             Status: Active | Locked\n\n\
             📝 Starter Message by ada:\nkick off\n\
             Reactions: 👍(1)\n\n\
             🔄 Recent Messages (1):\n\
             grace: yes\nReactions: No reactions\n\n"
        );
    }

    #[test]
    fn test_working_groups_empty() {
        assert_eq!(
            working_groups(&[]),
            "No working groups or active projects found."
        );
    }
}
