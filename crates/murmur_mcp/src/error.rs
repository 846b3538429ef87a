use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum McpError {
    #[error("Transport initialization failed")]
    #[diagnostic(
        code(murmur::mcp::transport_init_failed),
        help("Failed to initialize the {transport_type} transport; the client may have closed the pipe before the handshake")
    )]
    TransportInitFailed {
        transport_type: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("MCP server stopped unexpectedly")]
    #[diagnostic(
        code(murmur::mcp::server_stopped),
        help("The {transport_type} service task ended abnormally")
    )]
    ServerStopped {
        transport_type: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, McpError>;

impl McpError {
    pub fn transport_init(
        transport_type: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TransportInitFailed {
            transport_type: transport_type.into(),
            cause: Box::new(cause),
        }
    }

    pub fn server_stopped(
        transport_type: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ServerStopped {
            transport_type: transport_type.into(),
            cause: Box::new(cause),
        }
    }
}
