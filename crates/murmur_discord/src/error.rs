use miette::Diagnostic;
use murmur_core::{MurmurError, ResourceKind};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DiscordError {
    #[error("Discord authentication failed")]
    #[diagnostic(
        code(murmur::discord::auth_failed),
        help("Check that your Discord bot token ({token_preview}) is valid and has not been regenerated")
    )]
    AuthenticationFailed {
        #[source]
        cause: serenity::Error,
        token_preview: String,
    },

    #[error("No Discord bot token configured")]
    #[diagnostic(
        code(murmur::discord::missing_token),
        help("Set DISCORD_TOKEN in the environment or a .env file, or discord.token in {config_hint}")
    )]
    MissingToken { config_hint: String },
}

impl DiscordError {
    pub fn auth_failed(cause: serenity::Error, token: &str) -> Self {
        // Show first 6 and last 4 characters of token for debugging
        let token_preview = if token.is_ascii() && token.len() > 10 {
            format!("{}...{}", &token[..6], &token[token.len() - 4..])
        } else {
            "***".to_string()
        };

        Self::AuthenticationFailed {
            cause,
            token_preview,
        }
    }
}

/// Map a serenity failure onto the core taxonomy.
///
/// 404 and 403 become `NotFound` / `Forbidden` for the object that was
/// being looked up; everything else is an opaque platform failure.
pub(crate) fn from_serenity(
    err: serenity::Error,
    operation: &str,
    resource: ResourceKind,
    id: &str,
) -> MurmurError {
    let status = match &err {
        serenity::Error::Http(http_err) => http_err.status_code().map(|code| code.as_u16()),
        _ => None,
    };

    match status {
        Some(404) => MurmurError::not_found(resource, id),
        Some(403) => MurmurError::forbidden(resource, id),
        _ => MurmurError::platform(operation, err),
    }
}

/// Discord ids are u64 snowflakes; anything else cannot name an object
pub(crate) fn parse_snowflake(field: &str, raw: &str) -> Result<u64, MurmurError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| {
            MurmurError::invalid_filter(
                field,
                format!("'{raw}' is not a Discord ID"),
                "a numeric Discord snowflake ID",
            )
        })
}
