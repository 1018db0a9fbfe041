//! Anthropic Messages API client and the remote analyst built on it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use chess_core::Game;

use crate::analysis::{parse_analysis, AnalysisResult};
use crate::config::AnalysisConfig;
use crate::error::GuideError;
use crate::orchestrator::{AnalysisRequest, Analyst};
use crate::prompt::build_prompt;

const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(config: &AnalysisConfig) -> Result<Self, GuideError> {
        let client = Client::builder()
            .user_agent("ChessBuddy/1.0")
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Send a single-turn prompt and return the first text block.
    pub async fn complete(&self, prompt: &str) -> Result<String, GuideError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GuideError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = resp.json().await?;
        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or(GuideError::EmptyResponse)
    }
}

/// Analyst that asks the language model about the position.
pub struct LlmAnalyst {
    client: AnthropicClient,
}

impl LlmAnalyst {
    pub fn new(config: &AnalysisConfig) -> Result<Self, GuideError> {
        Ok(Self {
            client: AnthropicClient::new(config)?,
        })
    }
}

#[async_trait]
impl Analyst for LlmAnalyst {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GuideError> {
        let game = Game::load(&request.fen)?;
        let prompt = build_prompt(request, &game);
        debug!(chars = prompt.len(), "Requesting remote analysis");

        let text = self.client.complete(&prompt).await?;
        parse_analysis(&text).map_err(|e| {
            warn!(error = %e, "Unusable analysis reply");
            e
        })
    }
}
