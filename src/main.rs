mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use args::{Args, Command};
use gql_server::config::Config;
use gql_server::server::Server;
use gql_server::{db, metrics};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(args.dev_log);
    info!("GraphQL Server v{} started", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Gql => run_gql(&args).await,
    }
}

fn init_logging(dev_log: bool) {
    let default_filter = if dev_log {
        "debug"
    } else {
        "info,gql_server=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    if dev_log {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
        info!("Development logging enabled");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn run_gql(args: &Args) -> Result<()> {
    // Load configuration
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .context("Failed to load configuration")?;
    info!("Configuration loaded successfully");

    // Initialize metrics
    metrics::registry::init_metrics();

    // Initialize user store
    let users = db::init_repository(&config.database)
        .await
        .context("Failed to initialize database")?;
    users
        .test_connection()
        .await
        .context("Failed to test database connection")?;
    info!(backend = users.backend_name(), "User store ready");

    Server::new(config, users).serve().await
}
