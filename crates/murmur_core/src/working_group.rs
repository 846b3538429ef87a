use serde::Serialize;

use crate::channel::{ChannelNode, ThreadSummary};
use crate::config::WorkingGroupConfig;
use crate::workspace::WorkspaceStructure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Channel name matched a working-group pattern
    WorkingGroup,
    /// No name match but enough threads to look like sustained work
    ActiveProject,
}

/// A channel that looks like it hosts ongoing collaborative work.
/// Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingGroup {
    pub channel_id: String,
    pub channel_name: String,
    pub category: String,
    pub thread_count: usize,
    pub recent_activity: usize,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    /// Preview of the first threads, in enumeration order
    pub threads: Vec<ThreadSummary>,
}

impl WorkingGroup {
    fn classify(channel: &ChannelNode, config: &WorkingGroupConfig) -> Option<Self> {
        let name = channel.name.to_lowercase();
        let name_match = config
            .patterns
            .iter()
            .any(|pattern| name.contains(pattern.as_str()));
        let threaded = channel.threads.len() >= config.min_threads;

        let kind = match (name_match, threaded) {
            (true, _) => GroupKind::WorkingGroup,
            (false, true) => GroupKind::ActiveProject,
            (false, false) => return None,
        };

        Some(Self {
            channel_id: channel.id.clone(),
            channel_name: channel.name.clone(),
            category: channel.category.clone(),
            thread_count: channel.threads.len(),
            recent_activity: channel.recent_activity,
            kind,
            threads: channel
                .threads
                .iter()
                .take(config.preview_threads)
                .cloned()
                .collect(),
        })
    }
}

/// Find working groups, most active first; thread count breaks ties
pub fn detect_working_groups(
    workspace: &WorkspaceStructure,
    config: &WorkingGroupConfig,
) -> Vec<WorkingGroup> {
    let mut groups: Vec<WorkingGroup> = workspace
        .channels()
        .iter()
        .filter_map(|channel| WorkingGroup::classify(channel, config))
        .collect();

    groups.sort_by(|a, b| {
        (b.recent_activity, b.thread_count).cmp(&(a.recent_activity, a.thread_count))
    });
    groups
}
