use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over flags; logs go to stderr so replies stay clean on stdout
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(cli.config.clone(), &cli.command)?;

    match cli.command {
        Commands::Serve { .. } => commands::serve::execute(&config).await,
        Commands::Chat { .. } => commands::chat::execute(&config).await,
        Commands::Ask { text, .. } => commands::ask::execute(&config, &text.join(" ")).await,
        Commands::Config => commands::config::execute(&config),
    }
}
