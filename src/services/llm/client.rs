use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::FallbackResponder;
use crate::config::LlmConfig;

/// Chat-completion client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiResponder {
    client: Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiResponder {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout()) // whole-request bound, including body read
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    /// Single attempt against `{base_url}/chat/completions`. No retries.
    pub async fn complete(&self, user_input: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| anyhow!("LLM API key not configured"))?;

        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_input,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("LLM server error: {}", response.status()));
        }

        let resp_json: ChatCompletionResponse = response.json().await?;
        let content = resp_json
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| anyhow!("LLM response had no message content"))?;

        Ok(content)
    }
}

#[async_trait]
impl FallbackResponder for OpenAiResponder {
    async fn answer(&self, user_input: &str) -> Option<String> {
        if self.config.api_key().is_none() {
            return None;
        }

        match self.complete(user_input).await {
            Ok(text) => {
                debug!(model = %self.config.model, "LLM fallback answered");
                Some(text)
            }
            Err(e) => {
                warn!("LLM fallback failed: {}", e);
                None
            }
        }
    }

    fn is_enabled(&self) -> bool {
        self.config.api_key().is_some()
    }
}
