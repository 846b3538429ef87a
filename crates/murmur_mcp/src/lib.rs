//! Murmur MCP - tool surface over the Discord retrieval layer
//!
//! - [`tools`]: the tool catalogue, argument schemas and handlers
//! - [`dispatch`]: the boundary that turns every outcome into text
//! - [`server`]: an rmcp `ServerHandler` serving the tools over stdio

pub mod dispatch;
pub mod error;
pub mod server;
pub mod tools;

pub use dispatch::{ToolOutcome, guarded};
pub use error::{McpError, Result};
pub use server::MurmurServer;
pub use tools::{MurmurTools, TOOL_NAMES};
