//! OpenAI-compatible chat-completions client: availability probe plus a
//! single chat call with 429 retry/backoff, grounded in
//! `legacy_src/suggest/llm/client.rs::call_llm_with_usage`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cancel::CancellationToken;

use super::LlmConfig;

const AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(5);
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 2000;
const BACKOFF_MULTIPLIER: u64 = 2;
const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 2048;

pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    /// A short-timeout GET against `<endpoint>/models`. Any non-2xx, or any
    /// transport error, means unavailable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/models", self.config.endpoint.trim_end_matches('/'));
        let probe = reqwest::Client::builder().timeout(AVAILABILITY_TIMEOUT).build();
        let Ok(probe) = probe else { return false };

        match probe
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Sends one chat-completion request. Retries on HTTP 429 with
    /// exponential backoff; other errors return immediately. Cancellation
    /// is polled between attempts and while waiting out a backoff.
    pub async fn chat(&self, system: &str, user: &str, cancel: &CancellationToken) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        let mut retry_count = 0;

        loop {
            if cancel.is_cancelled() {
                anyhow::bail!("cancelled");
            }

            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            let text = response.text().await?;

            if status.is_success() {
                let parsed: ChatResponse = serde_json::from_str(&text)
                    .map_err(|e| anyhow::anyhow!("malformed chat-completions response: {e}"))?;
                return Ok(parsed
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .unwrap_or_default());
            }

            if status.as_u16() == 429 && retry_count < MAX_RETRIES {
                retry_count += 1;
                let backoff_ms = INITIAL_BACKOFF_MS * BACKOFF_MULTIPLIER.pow(retry_count - 1);
                sleep_cancellable(Duration::from_millis(backoff_ms), cancel).await;
                if cancel.is_cancelled() {
                    anyhow::bail!("cancelled");
                }
                continue;
            }

            anyhow::bail!("provider returned {status}: {}", truncate(&text, 200));
        }
    }
}

async fn sleep_cancellable(duration: Duration, cancel: &CancellationToken) {
    let step = Duration::from_millis(100);
    let mut waited = Duration::ZERO;
    while waited < duration {
        if cancel.is_cancelled() {
            return;
        }
        let remaining = duration - waited;
        tokio::time::sleep(step.min(remaining)).await;
        waited += step;
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let idx = s.char_indices().nth(max).map(|(i, _)| i).unwrap_or(s.len());
        &s[..idx]
    }
}
