//! The tool catalogue and its handlers
//!
//! Every handler is read-only and returns the text an agent will see.
//! Errors propagate as [`MurmurError`]; turning them into `Error: ...`
//! text is the dispatch boundary's job.

use std::sync::Arc;

use murmur_core::config::MurmurConfig;
use murmur_core::format;
use murmur_core::{
    ChannelKind, ChannelSummary, ChatPlatform, HistoryQuery, HotCriteria, MessageCollector,
    MessageFilter, MurmurError, PlatformGuild, ReactionFilter, Result, ThreadInspector,
    ThreadOptions, WorkspaceAnalyzer, detect_working_groups, filter_hot_messages,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// Every tool name, in catalogue order
pub const TOOL_NAMES: [&str; 10] = [
    "list_channels",
    "get_all_channels_across_servers",
    "fetch_server_with_channels",
    "fetch_channel_details",
    "read_messages_from_channel",
    "get_pinned_messages",
    "get_thread_details",
    "get_workspace_structure",
    "get_messages_by_reactions",
    "find_announcement_channels",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GuildRequest {
    /// Discord server ID (Guild ID); falls back to the configured default server
    #[serde(default)]
    pub guild_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChannelRequest {
    /// Discord channel ID
    pub channel_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadMessagesRequest {
    /// Discord channel or thread ID from which to fetch messages
    pub channel_id: String,

    /// Filtering options for message retrieval
    #[serde(default)]
    pub filter: MessageFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ThreadRequest {
    /// Discord thread ID to analyze
    pub thread_id: String,

    /// Include recent messages from the thread (default true)
    #[serde(default)]
    pub include_recent_messages: Option<bool>,

    /// Number of recent messages to include (1 to 10, default 5)
    #[serde(default)]
    pub recent_limit: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WorkspaceRequest {
    /// Discord server ID to analyze; falls back to the configured default server
    #[serde(default)]
    pub guild_id: Option<String>,

    /// Return a readable overview instead of raw structural data
    #[serde(default)]
    pub overview: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReactionsRequest {
    /// Discord channel or thread ID to scan
    pub channel_id: String,

    /// Reaction thresholds and scan window
    #[serde(default)]
    pub filter: ReactionFilter,
}

/// Handlers for every tool, sharing one platform session
#[derive(Clone)]
pub struct MurmurTools {
    platform: Arc<dyn ChatPlatform>,
    config: Arc<MurmurConfig>,
}

impl MurmurTools {
    pub fn new(platform: Arc<dyn ChatPlatform>, config: Arc<MurmurConfig>) -> Self {
        Self { platform, config }
    }

    pub fn config(&self) -> &MurmurConfig {
        &self.config
    }

    async fn guild(&self, requested: Option<&str>) -> Result<PlatformGuild> {
        let guild_id = requested
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or(self.config.discord.default_guild_id.as_deref())
            .ok_or_else(|| {
                MurmurError::invalid_filter(
                    "guild_id",
                    "no server ID given and discord.default_guild_id is not set",
                    "a Discord server ID",
                )
            })?;
        self.platform.fetch_guild(guild_id).await
    }

    async fn summaries(&self, guild: &PlatformGuild) -> Result<Vec<ChannelSummary>> {
        let channels = self.platform.guild_channels(guild).await?;
        Ok(channels.iter().map(ChannelSummary::from).collect())
    }

    pub async fn list_channels(&self, req: GuildRequest) -> Result<String> {
        let guild = self.guild(req.guild_id.as_deref()).await?;
        let channels = self.summaries(&guild).await?;
        Ok(format::guild_channel_report(&guild, &channels))
    }

    pub async fn get_all_channels_across_servers(&self) -> Result<String> {
        let mut channels = Vec::new();
        for guild in self.platform.guilds().await? {
            channels.extend(self.summaries(&guild).await?);
        }
        Ok(format!("Channels: {}", to_json(&channels)?))
    }

    pub async fn fetch_server_with_channels(&self, req: GuildRequest) -> Result<String> {
        let guild = self.guild(req.guild_id.as_deref()).await?;
        let channels = self.summaries(&guild).await?;
        let server = json!({
            "id": guild.id,
            "name": guild.name,
            "member_count": guild.member_count,
            "channels": channels,
        });
        Ok(format!("Server: {}", to_json(&server)?))
    }

    pub async fn fetch_channel_details(&self, req: ChannelRequest) -> Result<String> {
        let channel = self.platform.fetch_channel(&req.channel_id).await?;
        Ok(format::channel_details(&channel))
    }

    pub async fn read_messages_from_channel(&self, req: ReadMessagesRequest) -> Result<String> {
        let query = HistoryQuery::from_filter(&req.filter, &self.config.limits)?;
        let channel = self.platform.fetch_channel(&req.channel_id).await?;

        info!(channel_id = %channel.id, filters = %query.summary(), "reading messages");
        let messages = MessageCollector::new(self.platform.as_ref())
            .collect(&channel, &query)
            .await?;
        Ok(format::history_report(&messages, &query))
    }

    pub async fn get_pinned_messages(&self, req: ChannelRequest) -> Result<String> {
        let channel = self.platform.fetch_channel(&req.channel_id).await?;
        let pinned = MessageCollector::new(self.platform.as_ref())
            .collect_pinned(&channel)
            .await?;
        Ok(format::pinned_report(&pinned))
    }

    pub async fn get_thread_details(&self, req: ThreadRequest) -> Result<String> {
        let options = ThreadOptions::new(
            req.include_recent_messages,
            req.recent_limit.map(|limit| limit.trunc() as i64),
        );
        let inspection = ThreadInspector::new(self.platform.as_ref(), self.config.limits.clone())
            .inspect(&req.thread_id, options)
            .await?;
        Ok(format::thread_analysis(&inspection))
    }

    pub async fn get_workspace_structure(&self, req: WorkspaceRequest) -> Result<String> {
        let guild = self.guild(req.guild_id.as_deref()).await?;
        let structure = WorkspaceAnalyzer::new(self.platform.as_ref(), self.config.limits.clone())
            .build(&guild)
            .await?;
        let groups = detect_working_groups(&structure, &self.config.working_groups);

        if req.overview {
            return Ok(format!(
                "{}\n{}",
                format::workspace_overview(&structure),
                format::working_groups(&groups)
            ));
        }

        to_json(&json!({
            "workspace_structure": structure,
            "working_groups": groups,
        }))
    }

    pub async fn get_messages_by_reactions(&self, req: ReactionsRequest) -> Result<String> {
        let criteria = HotCriteria::from_filter(&req.filter, &self.config.hot, &self.config.limits)?;
        let channel = self.platform.fetch_channel(&req.channel_id).await?;

        let messages = MessageCollector::new(self.platform.as_ref())
            .collect(&channel, &criteria.history_query())
            .await?;
        let hot = filter_hot_messages(&messages, &criteria);

        info!(
            channel_id = %channel.id,
            scanned = messages.len(),
            hot = hot.len(),
            "ranked messages by reactions"
        );
        Ok(format::hot_report(
            &hot,
            messages.len(),
            self.config.limits.preview_chars,
        ))
    }

    pub async fn find_announcement_channels(&self, req: GuildRequest) -> Result<String> {
        let guild = self.guild(req.guild_id.as_deref()).await?;
        let announcements: Vec<ChannelSummary> = self
            .summaries(&guild)
            .await?
            .into_iter()
            .filter(|channel| {
                channel.kind == ChannelKind::News
                    || channel.name.to_lowercase().contains("announce")
            })
            .collect();

        if announcements.is_empty() {
            return Ok(format!("No announcement channels found in {}.", guild.name));
        }
        Ok(format!(
            "Found {} announcement channels in {}:\n\n{}",
            announcements.len(),
            guild.name,
            format::channel_list(&announcements)
        ))
    }
}

fn to_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| MurmurError::platform("serialize result", e))
}
