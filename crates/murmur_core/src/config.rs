//! Configuration system for Murmur
//!
//! Every tunable constant of the retrieval layer lives here. Defaults match
//! the behaviour agents are calibrated against; a config file only tunes them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{MurmurError, Result};

/// Environment variable that supplies or overrides `discord.token`
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Top-level configuration for Murmur
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MurmurConfig {
    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub hot: HotConfig,

    #[serde(default)]
    pub working_groups: WorkingGroupConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Discord session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Bot token; usually supplied through `DISCORD_TOKEN` instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Guild used when a tool call omits one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_guild_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Upper cap on any history request
    pub max_history: u32,
    pub default_history: u32,
    pub default_hot: u32,
    /// Window size of the per-channel activity probe
    pub activity_probe: u32,
    /// How many activity probes run at once
    pub probe_concurrency: usize,
    /// Characters kept when previewing message bodies
    pub preview_chars: usize,
    pub thread_recent_max: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_history: 500,
            default_history: 10,
            default_hot: 50,
            activity_probe: 10,
            probe_concurrency: 4,
            preview_chars: 200,
            thread_recent_max: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotConfig {
    pub min_reactions: u64,
    pub min_reaction_types: usize,
    pub target_emojis: Vec<String>,
}

impl Default for HotConfig {
    fn default() -> Self {
        Self {
            min_reactions: 5,
            min_reaction_types: 2,
            target_emojis: ["👍", "🔥", "✨", "❤️", "💯"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingGroupConfig {
    /// Lowercase substrings that mark a channel as a working group
    pub patterns: Vec<String>,
    pub min_threads: usize,
    pub preview_threads: usize,
}

impl Default for WorkingGroupConfig {
    fn default() -> Self {
        Self {
            patterns: [
                "wg-",
                "working-group",
                "team-",
                "project-",
                "dev-",
                "design-",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            min_threads: 3,
            preview_threads: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl MurmurConfig {
    /// Apply `DISCORD_TOKEN` from the environment if it is set
    pub fn with_env_overrides(self) -> Self {
        self.with_token_override(std::env::var(TOKEN_ENV).ok())
    }

    fn with_token_override(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.discord.token = Some(token);
        }
        self
    }

    /// Reject values that would make every query fail
    pub fn validate(&self, config_path: &str) -> Result<()> {
        let invalid = |field: &str, expected: &str| MurmurError::Configuration {
            config_path: config_path.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
            cause: format!("{field} is out of range").into(),
        };

        let limits = &self.limits;
        if limits.max_history == 0 {
            return Err(invalid("limits.max_history", "at least 1"));
        }
        if limits.default_history == 0 || limits.default_history > limits.max_history {
            return Err(invalid(
                "limits.default_history",
                "between 1 and limits.max_history",
            ));
        }
        if limits.default_hot == 0 || limits.default_hot > limits.max_history {
            return Err(invalid(
                "limits.default_hot",
                "between 1 and limits.max_history",
            ));
        }
        if limits.probe_concurrency == 0 {
            return Err(invalid("limits.probe_concurrency", "at least 1"));
        }
        if limits.thread_recent_max == 0 {
            return Err(invalid("limits.thread_recent_max", "at least 1"));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub async fn load_config(path: &Path) -> Result<MurmurConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| MurmurError::Configuration {
            config_path: path.display().to_string(),
            field: "file".to_string(),
            expected: "readable TOML file".to_string(),
            cause: Box::new(e),
        })?;

    let config: MurmurConfig =
        toml::from_str(&content).map_err(|e| MurmurError::Configuration {
            config_path: path.display().to_string(),
            field: "content".to_string(),
            expected: "valid TOML configuration".to_string(),
            cause: Box::new(e),
        })?;

    config.validate(&path.display().to_string())?;
    Ok(config)
}

/// Get standard config file locations, most specific first
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // Project-specific config
    paths.push(PathBuf::from("murmur.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("murmur").join("config.toml"));
    }

    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".murmur").join("config.toml"));
    }

    paths
}

/// Load configuration from the first standard location that exists
pub async fn load_config_from_standard_locations() -> Result<MurmurConfig> {
    for path in config_paths() {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            return load_config(&path).await;
        }
    }

    // No config found, return default
    Ok(MurmurConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: MurmurConfig = toml::from_str(
            r#"
            [discord]
            default_guild_id = "1234"

            [limits]
            probe_concurrency = 8

            [hot]
            target_emojis = ["🎉"]
            "#,
        )
        .unwrap();

        assert_eq!(config.discord.default_guild_id.as_deref(), Some("1234"));
        assert_eq!(config.limits.probe_concurrency, 8);
        assert_eq!(config.limits.max_history, 500);
        assert_eq!(config.hot.target_emojis, vec!["🎉"]);
        assert_eq!(config.hot.min_reactions, 5);
        assert_eq!(config.working_groups, WorkingGroupConfig::default());
    }

    #[test]
    fn test_token_override() {
        let config = MurmurConfig::default().with_token_override(Some("abc".into()));
        assert_eq!(config.discord.token.as_deref(), Some("abc"));

        let config = config.with_token_override(Some("  ".into()));
        assert_eq!(config.discord.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_validate_rejects_zero_cap() {
        let mut config = MurmurConfig::default();
        assert!(config.validate("test").is_ok());

        config.limits.max_history = 0;
        let err = config.validate("test").unwrap_err();
        assert!(matches!(
            err,
            MurmurError::Configuration { ref field, .. } if field == "limits.max_history"
        ));
    }

    #[tokio::test]
    async fn test_load_config_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("murmur-config-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("broken.toml");
        tokio::fs::write(&path, "[limits\nmax_history = ").await.unwrap();

        let err = load_config(&path).await.unwrap_err();
        assert!(matches!(
            err,
            MurmurError::Configuration { ref field, .. } if field == "content"
        ));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
