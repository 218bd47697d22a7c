//! Model gateway client — page indexing, model registry, inference proxy.

use async_trait::async_trait;
use pagelens_core::{Error, PageCapture, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::types::{ActiveModelResponse, CompletionResponse};

/// Operations the pipeline needs from the local model gateway.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send a capture to the content-indexing endpoint.
    async fn index_page(&self, capture: &PageCapture) -> Result<()>;

    /// Resolve the model reference to use for all subsequent calls.
    async fn active_model(&self) -> Result<String>;

    /// Run a single-message, non-streaming completion and return the first
    /// choice's content.
    async fn chat_completions(&self, model: &str, prompt: &str) -> Result<String>;
}

/// HTTP implementation against the gateway's REST surface.
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::Transport(format!("gateway error {status}: {body}")))
        }
    }
}

#[async_trait]
impl ModelGateway for GatewayClient {
    async fn index_page(&self, capture: &PageCapture) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/add_page", self.base_url))
            .json(capture)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn active_model(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/active_model", self.base_url))
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let parsed: ActiveModelResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!(model = %parsed.model.model, "resolved active model");
        Ok(parsed.model.model)
    }

    async fn chat_completions(&self, model: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "stream": false,
        });

        let response = self
            .client
            .post(format!("{}/proxy/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let parsed: CompletionResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Transport("completion returned no choices".to_string()))
    }
}
