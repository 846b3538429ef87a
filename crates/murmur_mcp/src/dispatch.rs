//! The boundary between tool handlers and whoever called them
//!
//! Whatever a handler does, the caller gets text back: the handler's
//! output, or `Error: <message>`. Panics are caught here too so one bad
//! call never takes the server down.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use murmur_core::{MurmurError, Result};
use rmcp::model::{CallToolResult, Content};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::tools::MurmurTools;

/// Result of one tool call, already rendered as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success(String),
    Failure(String),
}

impl ToolOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    pub fn into_call_result(self) -> CallToolResult {
        match self {
            Self::Success(text) => CallToolResult::success(vec![Content::text(text)]),
            Self::Failure(text) => CallToolResult::error(vec![Content::text(text)]),
        }
    }
}

fn is_expected(err: &MurmurError) -> bool {
    !matches!(
        err,
        MurmurError::Platform { .. }
            | MurmurError::Configuration { .. }
            | MurmurError::Template { .. }
    )
}

/// Run one handler and render whatever it produced
pub async fn guarded<F>(tool: &str, handler: F) -> ToolOutcome
where
    F: Future<Output = Result<String>>,
{
    match AssertUnwindSafe(handler).catch_unwind().await {
        Ok(Ok(text)) => ToolOutcome::Success(text),
        Ok(Err(e)) if is_expected(&e) => {
            warn!(tool, error = %e, "tool call rejected");
            ToolOutcome::Failure(format!("Error: {e}"))
        }
        Ok(Err(e)) => {
            error!(tool, error = ?e, "tool call failed");
            ToolOutcome::Failure(format!("Error: Unexpected error: {e}"))
        }
        Err(_) => {
            error!(tool, "tool handler panicked");
            ToolOutcome::Failure("Error: Unexpected error: tool handler panicked".to_string())
        }
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| {
        MurmurError::invalid_filter(
            "arguments",
            e.to_string(),
            "an object matching the tool's input schema",
        )
    })
}

impl MurmurTools {
    /// Call a tool by name with loosely typed JSON arguments
    pub async fn dispatch(&self, name: &str, arguments: Value) -> ToolOutcome {
        info!(tool = name, %arguments, "calling tool");

        match name {
            "list_channels" => {
                guarded(name, async {
                    self.list_channels(parse_args(arguments)?).await
                })
                .await
            }
            "get_all_channels_across_servers" => {
                guarded(name, self.get_all_channels_across_servers()).await
            }
            "fetch_server_with_channels" => {
                guarded(name, async {
                    self.fetch_server_with_channels(parse_args(arguments)?).await
                })
                .await
            }
            "fetch_channel_details" => {
                guarded(name, async {
                    self.fetch_channel_details(parse_args(arguments)?).await
                })
                .await
            }
            "read_messages_from_channel" => {
                guarded(name, async {
                    self.read_messages_from_channel(parse_args(arguments)?).await
                })
                .await
            }
            "get_pinned_messages" => {
                guarded(name, async {
                    self.get_pinned_messages(parse_args(arguments)?).await
                })
                .await
            }
            "get_thread_details" => {
                guarded(name, async {
                    self.get_thread_details(parse_args(arguments)?).await
                })
                .await
            }
            "get_workspace_structure" => {
                guarded(name, async {
                    self.get_workspace_structure(parse_args(arguments)?).await
                })
                .await
            }
            "get_messages_by_reactions" => {
                guarded(name, async {
                    self.get_messages_by_reactions(parse_args(arguments)?).await
                })
                .await
            }
            "find_announcement_channels" => {
                guarded(name, async {
                    self.find_announcement_channels(parse_args(arguments)?).await
                })
                .await
            }
            unknown => {
                warn!(tool = unknown, "unknown tool requested");
                ToolOutcome::Failure(format!("Error: Unknown tool: {unknown}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::ResourceKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_success_passes_text_through() {
        let outcome = guarded("t", async { Ok("fine".to_string()) }).await;
        assert_eq!(outcome, ToolOutcome::Success("fine".to_string()));
    }

    #[tokio::test]
    async fn test_expected_errors_render_plainly() {
        let outcome = guarded("t", async {
            Err(MurmurError::not_found(ResourceKind::Channel, "42"))
        })
        .await;
        assert_eq!(outcome.text(), "Error: Channel 42 not found");
        assert!(outcome.is_failure());
    }

    #[tokio::test]
    async fn test_platform_errors_are_marked_unexpected() {
        let outcome = guarded("t", async {
            Err(MurmurError::platform("history", "connection reset"))
        })
        .await;
        assert_eq!(
            outcome.text(),
            "Error: Unexpected error: history failed: connection reset"
        );
    }

    #[tokio::test]
    async fn test_panics_are_contained() {
        let outcome = guarded("t", async {
            let empty: Vec<String> = Vec::new();
            Ok(empty[3].clone())
        })
        .await;
        assert!(outcome.text().starts_with("Error: Unexpected error"));
    }

    #[test]
    fn test_null_arguments_read_as_empty_object() {
        let req: crate::tools::GuildRequest = parse_args(Value::Null).unwrap();
        assert_eq!(req.guild_id, None);

        let err = parse_args::<crate::tools::ChannelRequest>(Value::Null).unwrap_err();
        assert!(matches!(err, MurmurError::InvalidFilter { .. }));
    }

    #[test]
    fn test_outcomes_map_to_call_results() {
        let ok = ToolOutcome::Success("x".into()).into_call_result();
        assert_eq!(ok.is_error, Some(false));

        let failed = ToolOutcome::Failure("Error: x".into()).into_call_result();
        assert_eq!(failed.is_error, Some(true));
    }
}
