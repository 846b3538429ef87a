use rmcp::{
    ErrorData, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use tracing::info;

use crate::dispatch::guarded;
use crate::error::McpError;
use crate::tools::{
    ChannelRequest, GuildRequest, MurmurTools, ReactionsRequest, ReadMessagesRequest,
    ThreadRequest, WorkspaceRequest,
};

const INSTRUCTIONS: &str = "Read-only access to Discord servers: channel listings, message \
history with time filters, pinned messages, thread analysis, reaction-ranked messages and \
workspace structure with working-group detection. Every tool answers with text; failures \
start with 'Error:'.";

/// MCP server exposing [`MurmurTools`]
#[derive(Clone)]
pub struct MurmurServer {
    tools: MurmurTools,
    tool_router: ToolRouter<Self>,
}

impl MurmurServer {
    pub fn new(tools: MurmurTools) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    /// Serve over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> crate::error::Result<()> {
        info!("starting MCP server on stdio");
        let service = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| McpError::transport_init("stdio", e))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| McpError::server_stopped("stdio", e))?;
        info!(?reason, "MCP server stopped");
        Ok(())
    }
}

#[tool_router]
impl MurmurServer {
    #[tool(description = "List all channels in the server")]
    async fn list_channels(
        &self,
        Parameters(req): Parameters<GuildRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded("list_channels", self.tools.list_channels(req))
            .await
            .into_call_result())
    }

    #[tool(description = "List every channel in every server the bot can see")]
    async fn get_all_channels_across_servers(
        &self,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded(
            "get_all_channels_across_servers",
            self.tools.get_all_channels_across_servers(),
        )
        .await
        .into_call_result())
    }

    #[tool(description = "Get a server by its ID together with its channels")]
    async fn fetch_server_with_channels(
        &self,
        Parameters(req): Parameters<GuildRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded(
            "fetch_server_with_channels",
            self.tools.fetch_server_with_channels(req),
        )
        .await
        .into_call_result())
    }

    #[tool(description = "Fetch a channel by its ID and return its details")]
    async fn fetch_channel_details(
        &self,
        Parameters(req): Parameters<ChannelRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            guarded("fetch_channel_details", self.tools.fetch_channel_details(req))
                .await
                .into_call_result(),
        )
    }

    #[tool(description = "Read recent messages from a channel with filtering options")]
    async fn read_messages_from_channel(
        &self,
        Parameters(req): Parameters<ReadMessagesRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded(
            "read_messages_from_channel",
            self.tools.read_messages_from_channel(req),
        )
        .await
        .into_call_result())
    }

    #[tool(
        description = "Get all pinned messages from a channel (key announcements and important messages)"
    )]
    async fn get_pinned_messages(
        &self,
        Parameters(req): Parameters<ChannelRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            guarded("get_pinned_messages", self.tools.get_pinned_messages(req))
                .await
                .into_call_result(),
        )
    }

    #[tool(description = "Analyze a thread's activity (thick threads are hot topics)")]
    async fn get_thread_details(
        &self,
        Parameters(req): Parameters<ThreadRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(
            guarded("get_thread_details", self.tools.get_thread_details(req))
                .await
                .into_call_result(),
        )
    }

    #[tool(
        description = "Get raw workspace structural data with all channels, threads, and working groups"
    )]
    async fn get_workspace_structure(
        &self,
        Parameters(req): Parameters<WorkspaceRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded(
            "get_workspace_structure",
            self.tools.get_workspace_structure(req),
        )
        .await
        .into_call_result())
    }

    #[tool(description = "Find highly reacted messages in a channel, most reactions first")]
    async fn get_messages_by_reactions(
        &self,
        Parameters(req): Parameters<ReactionsRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded(
            "get_messages_by_reactions",
            self.tools.get_messages_by_reactions(req),
        )
        .await
        .into_call_result())
    }

    #[tool(description = "Find announcement and news channels in a server")]
    async fn find_announcement_channels(
        &self,
        Parameters(req): Parameters<GuildRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(guarded(
            "find_announcement_channels",
            self.tools.find_announcement_channels(req),
        )
        .await
        .into_call_result())
    }
}

#[tool_handler]
impl ServerHandler for MurmurServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "murmur".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::TOOL_NAMES;
    use murmur_core::MurmurConfig;
    use murmur_core::test_helpers::FakePlatform;
    use std::sync::Arc;

    fn server() -> MurmurServer {
        let tools = MurmurTools::new(
            Arc::new(FakePlatform::new()),
            Arc::new(MurmurConfig::default()),
        );
        MurmurServer::new(tools)
    }

    #[test]
    fn test_router_lists_whole_catalogue() {
        let mut routed: Vec<String> = server()
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        routed.sort();

        let mut expected: Vec<String> = TOOL_NAMES.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(routed, expected);
    }

    #[test]
    fn test_server_info_advertises_tools() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "murmur");
        assert!(info.capabilities.tools.is_some());
    }
}
