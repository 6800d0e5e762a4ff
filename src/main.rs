use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod handlers;
mod router;
mod schemas;
mod test_utils;

use cli::Cli;

/// Main entry point for the Spendbook application.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "spendbook=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment from .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.run().await
}
