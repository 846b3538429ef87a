//! Guild → category → channel → thread tree with activity metrics
//!
//! Building the tree costs one channel listing plus one bounded history
//! probe per messageable channel, independent of how many messages the
//! guild holds. A failed probe leaves that channel at zero activity and
//! records the failure on the node; it never fails the whole tree.

use futures::{StreamExt, stream};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::channel::{Capability, ChannelNode, PlatformChannel, PlatformGuild};
use crate::config::LimitsConfig;
use crate::error::Result;
use crate::platform::ChatPlatform;
use crate::probe::Probe;
use crate::query::HistoryQuery;

/// Category name used for channels that sit outside any category
pub const NO_CATEGORY: &str = "No Category";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildInfo {
    pub id: String,
    pub name: String,
    pub member_count: u64,
}

impl From<&PlatformGuild> for GuildInfo {
    fn from(guild: &PlatformGuild) -> Self {
        Self {
            id: guild.id.clone(),
            name: guild.name.clone(),
            member_count: guild.member_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryGroup {
    name: String,
    /// Positions in the flat channel list, so both views share one node
    channel_indices: Vec<usize>,
    total_threads: usize,
}

/// Borrowed view of one category and its channels
#[derive(Debug, Clone, Serialize)]
pub struct CategoryView<'a> {
    #[serde(skip)]
    pub name: &'a str,
    pub channels: Vec<&'a ChannelNode>,
    pub total_threads: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceStructure {
    pub guild_info: GuildInfo,
    channels: Vec<ChannelNode>,
    categories: Vec<CategoryGroup>,
    total_threads: usize,
}

impl WorkspaceStructure {
    pub fn new(guild_info: GuildInfo) -> Self {
        Self {
            guild_info,
            channels: Vec::new(),
            categories: Vec::new(),
            total_threads: 0,
        }
    }

    /// Every retained channel in platform order
    pub fn channels(&self) -> &[ChannelNode] {
        &self.channels
    }

    /// Categories in the order their first channel was seen
    pub fn categories(&self) -> impl Iterator<Item = CategoryView<'_>> {
        self.categories.iter().map(|group| self.view(group))
    }

    pub fn category(&self, name: &str) -> Option<CategoryView<'_>> {
        self.categories
            .iter()
            .find(|group| group.name == name)
            .map(|group| self.view(group))
    }

    pub fn total_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn total_threads(&self) -> usize {
        self.total_threads
    }

    fn view<'a>(&'a self, group: &'a CategoryGroup) -> CategoryView<'a> {
        CategoryView {
            name: &group.name,
            channels: group
                .channel_indices
                .iter()
                .map(|&index| &self.channels[index])
                .collect(),
            total_threads: group.total_threads,
        }
    }

    /// Add a channel, creating its category on first use
    pub fn push(&mut self, channel: &PlatformChannel, activity_probe: Probe<usize>) {
        let category = channel
            .category
            .clone()
            .unwrap_or_else(|| NO_CATEGORY.to_string());

        let threads: Vec<_> = if channel.capabilities().hosts_threads {
            channel.threads.iter().map(PlatformChannel::thread_summary).collect()
        } else {
            Vec::new()
        };

        let index = self.channels.len();
        let group_pos = match self.categories.iter().position(|g| g.name == category) {
            Some(pos) => pos,
            None => {
                self.categories.push(CategoryGroup {
                    name: category.clone(),
                    channel_indices: Vec::new(),
                    total_threads: 0,
                });
                self.categories.len() - 1
            }
        };
        let group = &mut self.categories[group_pos];
        group.channel_indices.push(index);
        group.total_threads += threads.len();
        self.total_threads += threads.len();

        self.channels.push(ChannelNode {
            id: channel.id.clone(),
            name: channel.name.clone(),
            kind: channel.kind,
            category,
            position: channel.position,
            topic: channel.topic.clone(),
            threads,
            recent_activity: activity_probe.completed().copied().unwrap_or(0),
            activity_probe,
        });
    }
}

struct CategoryMap<'a>(&'a WorkspaceStructure);

impl Serialize for CategoryMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.categories.len()))?;
        for view in self.0.categories() {
            map.serialize_entry(view.name, &view)?;
        }
        map.end()
    }
}

impl Serialize for WorkspaceStructure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WorkspaceStructure", 5)?;
        state.serialize_field("guild_info", &self.guild_info)?;
        state.serialize_field("categories", &CategoryMap(self))?;
        state.serialize_field("channels", &self.channels)?;
        state.serialize_field("total_channels", &self.total_channels())?;
        state.serialize_field("total_threads", &self.total_threads)?;
        state.end()
    }
}

/// Builds [`WorkspaceStructure`]s from a platform session
#[derive(Clone)]
pub struct WorkspaceAnalyzer<'a> {
    platform: &'a dyn ChatPlatform,
    limits: LimitsConfig,
}

impl<'a> WorkspaceAnalyzer<'a> {
    pub fn new(platform: &'a dyn ChatPlatform, limits: LimitsConfig) -> Self {
        Self { platform, limits }
    }

    pub async fn build(&self, guild: &PlatformGuild) -> Result<WorkspaceStructure> {
        let channels: Vec<PlatformChannel> = self
            .platform
            .guild_channels(guild)
            .await?
            .into_iter()
            .filter(|channel| channel.capabilities().in_workspace)
            .collect();

        // Probes run concurrently but `buffered` yields them in input order.
        // The futures are built up front so the stream holds no borrowing closure.
        let pending: Vec<_> = channels
            .iter()
            .map(|channel| self.probe_activity(channel))
            .collect();
        let probes: Vec<Probe<usize>> = stream::iter(pending)
            .buffered(self.limits.probe_concurrency.max(1))
            .collect()
            .await;

        let mut structure = WorkspaceStructure::new(GuildInfo::from(guild));
        for (channel, probe) in channels.iter().zip(probes) {
            structure.push(channel, probe);
        }

        tracing::info!(
            guild_id = %guild.id,
            channels = structure.total_channels(),
            threads = structure.total_threads(),
            "built workspace structure"
        );
        Ok(structure)
    }

    async fn probe_activity(&self, channel: &PlatformChannel) -> Probe<usize> {
        if !channel.kind.supports(Capability::History) {
            return Probe::Skipped;
        }

        let query = HistoryQuery::new(self.limits.activity_probe);
        match self.platform.history(channel, &query).await {
            Ok(messages) => {
                tracing::debug!(channel_id = %channel.id, seen = messages.len(), "activity probe");
                Probe::Completed(messages.len())
            }
            Err(e) => {
                tracing::warn!(channel_id = %channel.id, error = %e, "activity probe failed");
                Probe::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChannelKind;
    use crate::test_helpers::{FakePlatform, category, message, text_channel, thread, voice_channel};
    use pretty_assertions::assert_eq;

    fn guild() -> PlatformGuild {
        PlatformGuild {
            id: "900".into(),
            name: "Makers".into(),
            member_count: None,
        }
    }

    fn busy_messages(n: usize) -> Vec<crate::RawMessage> {
        (0..n)
            .map(|i| message(&format!("{}", 1000 + i), "ada", "hi", &[]))
            .collect()
    }

    fn platform() -> FakePlatform {
        let mut general = text_channel("1", "general", Some("Lobby"));
        general.threads.push(thread("11", "1", "intro", 3));

        let mut dev = text_channel("2", "dev-x", Some("Build"));
        for (id, name) in [("21", "dev-x"), ("22", "y"), ("23", "z"), ("24", "w")] {
            dev.threads.push(thread(id, "2", name, 2));
        }

        FakePlatform::new()
            .with_guild(guild())
            .with_channel(category("5", "Lobby"))
            .with_channel(general)
            .with_channel(dev)
            .with_channel(voice_channel("3", "hangout", Some("Lobby")))
            .with_channel(text_channel("4", "loose", None))
            .with_messages("1", busy_messages(25))
            .with_messages("2", busy_messages(3))
            .with_failing_history("4")
    }

    #[tokio::test]
    async fn test_tree_groups_channels_by_category() {
        let platform = platform();
        let structure = WorkspaceAnalyzer::new(&platform, LimitsConfig::default())
            .build(&guild())
            .await
            .unwrap();

        assert_eq!(structure.guild_info.member_count, 0);
        assert_eq!(structure.total_channels(), 4);

        let names: Vec<_> = structure.categories().map(|c| c.name).collect();
        assert_eq!(names, vec!["Lobby", "Build", NO_CATEGORY]);

        let lobby = structure.category("Lobby").unwrap();
        let lobby_ids: Vec<_> = lobby.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(lobby_ids, vec!["1", "3"]);
        assert_eq!(lobby.total_threads, 1);

        let flat: Vec<_> = structure.channels().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(flat, vec!["1", "2", "3", "4"]);
        assert!(structure.channels().iter().all(|c| c.kind != ChannelKind::Category));
    }

    #[tokio::test]
    async fn test_thread_totals_agree() {
        let platform = platform();
        let structure = WorkspaceAnalyzer::new(&platform, LimitsConfig::default())
            .build(&guild())
            .await
            .unwrap();

        let by_category: usize = structure.categories().map(|c| c.total_threads).sum();
        let by_channel: usize = structure.channels().iter().map(|c| c.threads.len()).sum();
        assert_eq!(structure.total_threads(), 5);
        assert_eq!(by_category, 5);
        assert_eq!(by_channel, 5);
    }

    #[tokio::test]
    async fn test_activity_probe_saturates_and_tolerates_failure() {
        let platform = platform();
        let structure = WorkspaceAnalyzer::new(&platform, LimitsConfig::default())
            .build(&guild())
            .await
            .unwrap();

        let activity: Vec<_> = structure
            .channels()
            .iter()
            .map(|c| c.recent_activity)
            .collect();
        assert_eq!(activity, vec![10, 3, 0, 0]);

        let loose = &structure.channels()[3];
        assert!(loose.activity_probe.is_failed());
        assert_eq!(structure.channels()[2].activity_probe, Probe::Completed(0));

        // one bounded request per workspace channel, categories never read
        assert_eq!(platform.history_channels(), vec!["1", "2", "3", "4"]);
        assert!(platform.history_limits().iter().all(|&limit| limit == 10));
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn test_build_future_is_send() {
        let platform = platform();
        let guild = guild();
        let analyzer = WorkspaceAnalyzer::new(&platform, LimitsConfig::default());
        assert_send(analyzer.build(&guild));
    }

    #[tokio::test]
    async fn test_build_runs_on_spawned_task() {
        let platform = std::sync::Arc::new(platform());
        let handle = tokio::spawn({
            let platform = platform.clone();
            async move {
                WorkspaceAnalyzer::new(platform.as_ref(), LimitsConfig::default())
                    .build(&guild())
                    .await
                    .map(|structure| structure.total_channels())
            }
        });
        assert_eq!(handle.await.unwrap().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_serialized_categories_expand_channels() {
        let platform = platform();
        let structure = WorkspaceAnalyzer::new(&platform, LimitsConfig::default())
            .build(&guild())
            .await
            .unwrap();

        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["total_channels"], 4);
        assert_eq!(json["categories"]["Build"]["total_threads"], 4);
        assert_eq!(json["categories"]["Build"]["channels"][0]["name"], "dev-x");
        assert_eq!(json["channels"][0]["type"], "text");
    }
}
