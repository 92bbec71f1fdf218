//! LLM-backed review: an OpenAI-compatible chat-completions client, a
//! diff-to-prompt context builder, and three sequential review passes with
//! confidence-gated JSON parsing and dedup.

pub mod client;
pub mod context;
pub mod dedup;
pub mod parse;
pub mod prompts;
pub mod reviewer;

pub use client::LlmClient;
pub use reviewer::LlmReviewer;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    #[serde(default = "default_provider_type")]
    pub provider_type: String,
}

fn default_provider_type() -> String {
    "openai-compatible".to_string()
}
