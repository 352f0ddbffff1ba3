use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::DigestConfig;
use crate::error::DigestError;

const API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const SYSTEM_PROMPT: &str =
    "You are an expert AI-news curator. Follow the JSON schema strictly.";
const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    response_format: ResponseFormat,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Client for the OpenRouter chat-completions endpoint. One digest run makes
/// exactly one call; there is no retry.
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    referer: String,
}

impl OpenRouterClient {
    /// Fails with `MissingApiKey` when the credential is absent, before any
    /// network activity.
    pub fn new(config: &DigestConfig) -> Result<Self, DigestError> {
        let api_key = config
            .openrouter_api_key
            .clone()
            .ok_or(DigestError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            referer: config.referer.clone(),
        })
    }

    /// Issue the single chat-completion call and return the raw JSON text the
    /// model produced, still unparsed.
    pub async fn request_digest(&self, prompt: &str) -> Result<String, DigestError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object".to_string(),
            },
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", "AI-News-Digest")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(DigestError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response.json().await?;

        if let Some(usage) = &chat_response.usage {
            debug!(
                "OpenRouter usage: {} prompt / {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(DigestError::EmptyResponse)
    }
}
