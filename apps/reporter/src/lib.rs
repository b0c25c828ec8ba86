use anyhow::Context;
use chrono::{DateTime, Utc};
use market::{PriceClient, Watchlist};
use tracing::{error, info};

pub mod cli;
pub mod commentary;
pub mod config;
pub mod daily;
pub mod message;
pub mod webhook;

#[cfg(test)]
mod fake_http;

use cli::Cli;
use commentary::CommentaryClient;
use config::Config;
use daily::Outcome;
use webhook::WebhookClient;

/// Outbound clients shared by one run.
pub struct Clients {
    pub price_client: PriceClient,
    pub webhook: WebhookClient,
    pub commentary: Option<CommentaryClient>,
}

impl Clients {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let price_client = PriceClient::new(config.quote_api_base_url.clone(), config.http_timeout)?;
        let webhook = WebhookClient::new(
            config.webhook_url.clone(),
            config.webhook_flavor,
            config.http_timeout,
        )?;
        let commentary = config
            .openai
            .clone()
            .map(|openai| CommentaryClient::new(openai, config.http_timeout))
            .transpose()?;

        Ok(Self {
            price_client,
            webhook,
            commentary,
        })
    }
}

/// Load configuration, apply the weekday gate and run the pipeline once.
/// Configuration errors return before any client is built.
pub async fn run<F>(cli: &Cli, lookup: F, now: DateTime<Utc>) -> anyhow::Result<Outcome>
where
    F: Fn(&str) -> Option<String>,
{
    let config =
        Config::from_lookup(lookup).inspect_err(|e| error!(error = %e, "invalid configuration"))?;
    let watchlist =
        Watchlist::standard().inspect_err(|e| error!(error = %e, "invalid watchlist"))?;

    let now = now.with_timezone(&config.timezone);
    if !daily::is_trading_day(&now) && !cli.force {
        info!(date = %now.date_naive(), tz = config.timezone.name(), "not a trading day, skipping");
        return Ok(Outcome::Skipped);
    }

    let clients = Clients::from_config(&config).context("failed to build http clients")?;
    daily::run_daily(&clients, &watchlist, now.date_naive(), cli.dry_run)
        .await
        .inspect_err(|e| error!(error = ?e, "run_daily failed"))
}
