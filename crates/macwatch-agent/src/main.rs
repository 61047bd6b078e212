//! CLI entry point for the macwatch device tracker.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use macwatch_agent::commands::{self, Command};
use macwatch_agent::config::AgentConfig;
use macwatch_store::Store;

#[derive(Parser)]
#[command(name = "macwatch")]
#[command(about = "Tracks known and unknown devices on the local network")]
struct Cli {
    /// Config file prefix (default: macwatch).
    #[arg(short, long, default_value = "macwatch")]
    config: String,

    /// Override the store path from config.
    #[arg(long)]
    store: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut agent_config = load_agent_config(&cli.config)?;
    if let Some(store_path) = cli.store {
        agent_config.store_path = store_path;
    }

    let store = Store::open(&agent_config.store_path).await?;
    // Idempotent; keeps first-run commands from tripping over a missing
    // schema.
    store.init_schema().await?;

    commands::run(cli.command, &agent_config, &store).await
}

fn load_agent_config(file_prefix: &str) -> anyhow::Result<AgentConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("MACWATCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.try_deserialize::<AgentConfig>() {
        Ok(c) => Ok(c),
        Err(_) => Ok(AgentConfig::default()),
    }
}
