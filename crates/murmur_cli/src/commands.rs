pub mod call;
pub mod config;
pub mod persona;
pub mod serve;

use std::sync::Arc;

use miette::Result;
use murmur_core::MurmurConfig;
use murmur_discord::DiscordSession;
use murmur_mcp::MurmurTools;

/// Connect to Discord and wrap the session in the tool handlers
async fn connect_tools(config: MurmurConfig) -> Result<MurmurTools> {
    let session = DiscordSession::connect(&config.discord).await?;
    Ok(MurmurTools::new(Arc::new(session), Arc::new(config)))
}
