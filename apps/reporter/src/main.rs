use std::env::var;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use reporter::{cli::Cli, daily::Outcome};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match reporter::run(&cli, |key| var(key).ok(), Utc::now()).await? {
        Outcome::DryRun { message } => println!("{message}"),
        Outcome::PublishedPartial { indices, failed } => {
            warn!(indices, failed = %failed.join(", "), "published partial report");
        }
        outcome => info!(?outcome, "done"),
    }

    Ok(())
}
