use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::OpenAiConfig;

pub const FALLBACK: &str = "Today's commentary could not be generated.";

const SYSTEM_PROMPT: &str = "You are a full-time investor writing the morning market note for an \
     investment community. Your readers range from beginners to experienced traders. Be accurate \
     and brief.";

const MAX_TOKENS: u32 = 400;
const TEMPERATURE: f32 = 0.5;

#[derive(Clone)]
pub struct CommentaryClient {
    client: Client,
    config: OpenAiConfig,
}

impl CommentaryClient {
    pub fn new(config: OpenAiConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    /// Commentary text, or [`FALLBACK`] when the model call fails.
    pub async fn generate_or_fallback(&self, date: NaiveDate, data: &str) -> String {
        match self.generate(date, data).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = ?e, "commentary failed, using fallback");
                FALLBACK.to_string()
            }
        }
    }

    #[instrument(name = "commentary", skip(self, data), fields(model = %self.config.model))]
    pub async fn generate(&self, date: NaiveDate, data: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt(date, data),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let res: ChatResponse = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .context("commentary request failed")?
            .error_for_status()?
            .json()
            .await
            .context("commentary response did not parse")?;

        let text = first_choice(res)?;
        info!(chars = text.chars().count(), "commentary generated");
        Ok(text)
    }
}

pub fn prompt(date: NaiveDate, data: &str) -> String {
    format!(
        "Analyse the market data below and write today's key points.\n\
         \n\
         Date: {}\n\
         \n\
         Market data:\n\
         {}\n\
         \n\
         Rules:\n\
         1. Three or four short lines.\n\
         2. Objective analysis based on the numbers only.\n\
         3. Keep speculation to a minimum.\n\
         4. Plain wording a beginner can follow.\n\
         5. No emoji.\n\
         6. Finish with \"🎯 Watch:\" and the one thing to watch today.\n\
         \n\
         Never recommend specific stocks, give buy or sell instructions, or make unfounded \
         predictions.",
        date.format("%A %d %B %Y"),
        data
    )
}

fn first_choice(res: ChatResponse) -> Result<String> {
    let Some(text) = res
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    else {
        bail!("commentary response had no text");
    };

    Ok(text)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
