use std::sync::Arc;

use murmur_core::config::DiscordConfig;
use serenity::http::Http;
use tracing::info;

use crate::error::DiscordError;

/// A validated Discord REST session.
///
/// Created once at startup and passed to whatever needs platform access;
/// cloning shares the underlying HTTP client and its rate limiter.
#[derive(Clone)]
pub struct DiscordSession {
    pub(crate) http: Arc<Http>,
    bot_user: String,
}

impl DiscordSession {
    /// Validate the configured token by fetching the bot's own user
    pub async fn connect(config: &DiscordConfig) -> Result<Self, DiscordError> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| DiscordError::MissingToken {
                config_hint: "murmur.toml".to_string(),
            })?;

        let http = Arc::new(Http::new(token));
        let current_user = http
            .get_current_user()
            .await
            .map_err(|e| DiscordError::auth_failed(e, token))?;

        let bot_user = current_user.tag();
        info!(bot = %bot_user, id = %current_user.id, "connected to Discord");

        Ok(Self { http, bot_user })
    }
}

impl std::fmt::Debug for DiscordSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordSession")
            .field("bot_user", &self.bot_user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        for token in [None, Some(String::new()), Some("   ".to_string())] {
            let config = DiscordConfig {
                token,
                default_guild_id: None,
            };
            let err = DiscordSession::connect(&config).await.unwrap_err();
            assert!(matches!(err, DiscordError::MissingToken { .. }));
        }
    }
}
