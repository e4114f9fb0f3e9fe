//! Async chat-completion client shared by every LLM collaborator
//!
//! One plain `complete(system, user)` call, spoken either as an Anthropic
//! messages request or as an OpenAI-compatible chat completion. Endpoint,
//! model and limits come from the `[llm]` config section; the API key is
//! read from the environment variable that section names.

use crate::core::config::{LlmConfig, LlmProvider};
use crate::core::error::{Result, RpgError};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct LlmClient {
    http: Client,
    provider: LlmProvider,
    api_url: String,
    /// Optional for self-hosted OpenAI-compatible servers
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl LlmClient {
    /// Build a client from config, reading the key from `config.api_key_env`
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::new(config, api_key)
    }

    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self> {
        if config.provider == LlmProvider::Anthropic && api_key.is_none() {
            return Err(RpgError::LlmError(format!(
                "{} is not set",
                config.api_key_env
            )));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs_f64(config.request_timeout_s))
            .build()
            .map_err(|e| RpgError::LlmError(e.to_string()))?;

        Ok(Self {
            http,
            provider: config.provider,
            api_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| config.provider.default_url().to_string()),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Send one system + user exchange and return the reply text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!(model = %self.model, %user, "LLM request");

        let response = self
            .request(system, user)
            .send()
            .await
            .map_err(|e| RpgError::LlmError(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RpgError::LlmError(e.to_string()))?;
        if !status.is_success() {
            return Err(RpgError::LlmError(format!("{}: {}", status, body.trim())));
        }

        let text = parse_completion(self.provider, &body)?;
        tracing::debug!(model = %self.model, chars = text.len(), "LLM reply");
        Ok(text)
    }

    fn request(&self, system: &str, user: &str) -> RequestBuilder {
        let post = self.http.post(&self.api_url);
        match self.provider {
            LlmProvider::Anthropic => {
                let body = AnthropicRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    system,
                    messages: [Message {
                        role: "user",
                        content: user,
                    }],
                };
                post.header("x-api-key", self.api_key.as_deref().unwrap_or_default())
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
            }
            LlmProvider::OpenAiCompatible => {
                let body = ChatRequest {
                    model: &self.model,
                    max_tokens: self.max_tokens,
                    temperature: self.temperature,
                    messages: [
                        Message {
                            role: "system",
                            content: system,
                        },
                        Message {
                            role: "user",
                            content: user,
                        },
                    ],
                };
                let post = post.json(&body);
                match &self.api_key {
                    Some(key) => post.bearer_auth(key),
                    None => post,
                }
            }
        }
    }
}

/// Pull the reply text out of a provider response body
///
/// Anthropic replies may interleave non-text blocks; only text blocks are
/// kept. A reply with no text at all is an error.
pub fn parse_completion(provider: LlmProvider, body: &str) -> Result<String> {
    let text = match provider {
        LlmProvider::Anthropic => {
            let reply: AnthropicResponse = serde_json::from_str(body)?;
            reply
                .content
                .into_iter()
                .filter(|block| block.kind == "text")
                .filter_map(|block| block.text)
                .collect::<Vec<_>>()
                .join("")
        }
        LlmProvider::OpenAiCompatible => {
            let reply: ChatResponse = serde_json::from_str(body)?;
            reply
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default()
        }
    };
    if text.trim().is_empty() {
        return Err(RpgError::LlmError("Empty response".into()));
    }
    Ok(text)
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    messages: [Message<'a>; 2],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
