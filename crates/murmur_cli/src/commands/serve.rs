use miette::Result;
use murmur_core::MurmurConfig;
use murmur_mcp::MurmurServer;

/// Serve every tool over stdio until the client goes away
pub async fn run(config: MurmurConfig) -> Result<()> {
    let tools = super::connect_tools(config).await?;
    MurmurServer::new(tools).serve_stdio().await?;
    Ok(())
}
