mod commands;
mod output;

use clap::{Parser, Subcommand};
use miette::Result;
use murmur_core::config::{self, MurmurConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "murmur")]
#[command(about = "Read-only Discord retrieval tools for agents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tools over MCP on stdin/stdout
    Serve,
    /// Call one tool directly and print its text result
    Call {
        /// Tool name, e.g. read_messages_from_channel
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
    /// Agent persona prompts
    Persona {
        #[command(subcommand)]
        cmd: PersonaCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum PersonaCommands {
    /// List personas and the tools they use
    List,
    /// Print a persona's instructions
    Show { name: String },
    /// Render the thread catch-up prompt for a thread link
    Digest { thread_link: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))?;
    miette::set_panic_hook();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path).await?,
        None => config::load_config_from_standard_locations().await?,
    }
    .with_env_overrides();

    let _guard = init_logging(cli.debug, &config);
    match &cli.config {
        Some(path) => info!("Loaded config from: {:?}", path),
        None => info!("Loaded config from standard locations"),
    }

    match &cli.command {
        Commands::Serve => commands::serve::run(config).await?,
        Commands::Call { tool, args } => commands::call::run(config, tool, args).await?,
        Commands::Persona { cmd } => match cmd {
            PersonaCommands::List => commands::persona::list(),
            PersonaCommands::Show { name } => commands::persona::show(name)?,
            PersonaCommands::Digest { thread_link } => commands::persona::digest(thread_link)?,
        },
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => commands::config::show(&config)?,
        },
    }

    Ok(())
}

/// Logs go to stderr because stdout carries the MCP transport
fn init_logging(debug: bool, config: &MurmurConfig) -> Option<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if debug {
        // Only show debug output from murmur crates
        EnvFilter::new("murmur_core=debug,murmur_discord=debug,murmur_mcp=debug,murmur=debug,warn")
    } else {
        // Show info level for murmur crates, warn for everything else
        EnvFilter::new("murmur_core=info,murmur_discord=info,murmur_mcp=info,murmur=info,warn")
    };

    let (file_layer, guard) = match &config.logging.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "murmur.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::LocalTime::rfc_3339())
                .compact(),
        )
        .with(file_layer)
        .init();

    guard
}
