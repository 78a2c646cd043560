use crate::config::RambleConfig;
use crate::error::ProviderError;
use crate::keywords::RewriteProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_REFERER: &str = "http://localhost:5173";
pub const DEFAULT_TITLE: &str = "Visual Ramble Keyword Enhancer";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a chat-completions body.
pub fn parse_chat_completion(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ProviderError::Malformed("response has no message content".to_string()))
}

/// OpenAI-compatible chat-completions client (OpenRouter by default).
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Values for the `HTTP-Referer` and `X-Title` attribution headers.
    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.referer = referer.into();
        self.title = title.into();
        self
    }

    /// `None` when no API key is configured: rewriting is then disabled.
    pub fn from_config(config: &RambleConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.rewrite_api_key.clone() else {
            return Ok(None);
        };
        let client = Self::new(
            api_key,
            config.rewrite_base_url.clone(),
            config.request_timeout(),
        )?
        .with_model(config.rewrite_model.clone())
        .with_attribution(config.rewrite_referer.clone(), config.rewrite_title.clone());
        Ok(Some(client))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn attribution(&self) -> (&str, &str) {
        (&self.referer, &self.title)
    }
}

#[async_trait]
impl RewriteProvider for OpenRouterClient {
    async fn rewrite(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!(model = %self.model, "keyword rewrite request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(super::status_error(status, body));
        }

        let text = response.text().await?;
        parse_chat_completion(&text)
    }
}
