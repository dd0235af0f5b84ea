//! Back-office operator CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backoffice_service_lib::{
    cli::{Cli, Commands},
    commands,
    config::BackofficeConfig,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = BackofficeConfig::from_env();

    init_tracing(cli.verbose, &config.log_level);
    tracing::debug!("Configuration loaded");

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Trash(args) => commands::lifecycle::trash(args, cli.actor, config).await,
        Commands::Restore(args) => commands::lifecycle::restore(args, cli.actor, config).await,
        Commands::Purge(args) => commands::lifecycle::purge(args, cli.actor, config).await,
        Commands::List(args) => commands::lifecycle::list(args, cli.actor, config).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool, fallback: &str) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| fallback.to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
