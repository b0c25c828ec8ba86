use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::config::WebhookFlavor;

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    flavor: WebhookFlavor,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>, flavor: WebhookFlavor, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            flavor,
        })
    }

    /// Post once. Non-2xx and transport errors are returned, never retried.
    #[instrument(name = "publish", skip(self, message), fields(flavor = ?self.flavor, chars = message.chars().count()))]
    pub async fn publish(&self, message: &str) -> Result<()> {
        let status = self
            .client
            .post(&self.url)
            .json(&payload(self.flavor, message))
            .send()
            .await
            .context("webhook request failed")?
            .error_for_status()
            .context("webhook rejected the message")?
            .status();

        info!(%status, "message delivered");
        Ok(())
    }
}

pub fn payload(flavor: WebhookFlavor, message: &str) -> Value {
    let mut body = Map::new();
    body.insert(flavor.text_field().to_string(), Value::from(message));
    Value::Object(body)
}
