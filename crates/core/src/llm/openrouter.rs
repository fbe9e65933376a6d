use crate::config::Settings;
use crate::error::{Upstream, UpstreamError};
use crate::llm::{genre_prompt, CompletionClient, Provider};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai";
const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenRouterClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_openrouter_api_key()?.to_string();
        let base_url = settings
            .openrouter_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = settings
            .openrouter_model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.openrouter_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .context("failed to build OpenRouter http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            model,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_PATH
        )
    }

    fn request(&self, mood: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user",
                content: genre_prompt(mood),
            }],
        }
    }

    async fn create_completion(
        &self,
        req: ChatCompletionRequest,
    ) -> anyhow::Result<ChatCompletionResponse> {
        let res = self
            .http
            .post(self.url())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("OpenRouter request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read OpenRouter response body")?;
        if !status.is_success() {
            return Err(
                UpstreamError::from_status(Upstream::OpenRouter, "http", status, text).into(),
            );
        }

        serde_json::from_str::<ChatCompletionResponse>(&text)
            .with_context(|| format!("failed to decode OpenRouter response: {text}"))
    }

    fn response_text(res: ChatCompletionResponse) -> anyhow::Result<String> {
        res.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("OpenRouter response has no choices[0].message.content")
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenRouterClient {
    fn provider(&self) -> Provider {
        Provider::OpenRouter
    }

    async fn complete(&self, mood: &str) -> anyhow::Result<String> {
        let res = self.create_completion(self.request(mood)).await?;
        Self::response_text(res)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
