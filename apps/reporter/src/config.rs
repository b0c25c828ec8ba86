use std::{str::FromStr, time::Duration};

use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("WEBHOOK_URL environment variable not set")]
    MissingWebhookUrl,

    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which chat platform the webhook belongs to. Decides the payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookFlavor {
    #[default]
    Discord,
    Slack,
}

impl WebhookFlavor {
    pub fn text_field(&self) -> &'static str {
        match self {
            WebhookFlavor::Discord => "content",
            WebhookFlavor::Slack => "text",
        }
    }
}

impl FromStr for WebhookFlavor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discord" => Ok(Self::Discord),
            "slack" => Ok(Self::Slack),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub webhook_url: String,
    pub webhook_flavor: WebhookFlavor,
    pub timezone: Tz,
    pub http_timeout: Duration,
    pub quote_api_base_url: String,
    pub openai: Option<OpenAiConfig>,
}

impl Config {
    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let webhook_url = get("WEBHOOK_URL").ok_or(ConfigError::MissingWebhookUrl)?;

        let webhook_flavor = match get("WEBHOOK_FLAVOR") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                key: "WEBHOOK_FLAVOR",
                value: v,
            })?,
            None => WebhookFlavor::default(),
        };

        let timezone = match get("REPORT_TIMEZONE") {
            Some(v) => v.parse::<Tz>().map_err(|_| ConfigError::Invalid {
                key: "REPORT_TIMEZONE",
                value: v,
            })?,
            None => DEFAULT_TIMEZONE,
        };

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value: v,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let openai = get("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
        });

        Ok(Self {
            webhook_url,
            webhook_flavor,
            timezone,
            http_timeout: Duration::from_secs(timeout_secs),
            quote_api_base_url: get("QUOTE_API_BASE_URL")
                .unwrap_or_else(|| market::DEFAULT_BASE_API.to_string()),
            openai,
        })
    }
}
