//! Agent personas layered over the read tools
//!
//! Murmur does not run a model. A persona is the instruction text and tool
//! list an agent runtime should be configured with.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::error::{MurmurError, Result};

const THREAD_DIGEST: &str = "thread_digest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    General,
    HotTopic,
    WorkspaceAnalyst,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Self::General, Self::HotTopic, Self::WorkspaceAnalyst];

    pub fn name(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::HotTopic => "hot_topic",
            Self::WorkspaceAnalyst => "workspace_analyst",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::General => "Reads Discord channels and messages and routes deeper analysis",
            Self::HotTopic => "Identifies and summarises the hot topics in Discord channels",
            Self::WorkspaceAnalyst => {
                "Maps a server's structure, decisions, key players and active projects"
            }
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            Self::General => include_str!("../prompts/general.md"),
            Self::HotTopic => include_str!("../prompts/hot_topic.md"),
            Self::WorkspaceAnalyst => include_str!("../prompts/workspace_analyst.md"),
        }
    }

    /// Tools the persona's instructions tell it to call
    pub fn tools(self) -> &'static [&'static str] {
        match self {
            Self::General => &[
                "list_channels",
                "get_all_channels_across_servers",
                "fetch_server_with_channels",
                "fetch_channel_details",
                "read_messages_from_channel",
                "get_pinned_messages",
                "get_thread_details",
            ],
            Self::HotTopic => &[
                "find_announcement_channels",
                "get_pinned_messages",
                "get_messages_by_reactions",
                "get_thread_details",
            ],
            Self::WorkspaceAnalyst => &[
                "get_workspace_structure",
                "fetch_server_with_channels",
                "read_messages_from_channel",
                "get_pinned_messages",
                "get_thread_details",
                "fetch_channel_details",
            ],
        }
    }

    /// Personas this one hands requests to
    pub fn delegates(self) -> &'static [Persona] {
        match self {
            Self::General => &[Self::HotTopic, Self::WorkspaceAnalyst],
            Self::HotTopic | Self::WorkspaceAnalyst => &[],
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|persona| persona.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|p| p.name()).collect();
                format!("unknown persona '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// Render the thread catch-up prompt for one thread link
pub fn thread_digest(thread_link: &str) -> Result<String> {
    let template_error = |e: minijinja::Error| MurmurError::Template {
        name: THREAD_DIGEST.to_string(),
        cause: e,
    };

    let mut env = Environment::new();
    env.add_template(THREAD_DIGEST, include_str!("../prompts/thread_digest.md.j2"))
        .map_err(template_error)?;

    env.get_template(THREAD_DIGEST)
        .and_then(|template| template.render(context! { thread_link }))
        .map_err(template_error)
}
