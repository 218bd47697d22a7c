//! Chat backend client — file uploads and chat session lifecycle.

use async_trait::async_trait;
use pagelens_core::{Error, Result};
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::types::{ChatUpdateRequest, NewChatRequest, NewChatResponse, UploadedFile};

/// Operations the pipeline needs from the chat backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Upload page content as a file; the result becomes an attachment on
    /// the first chat message.
    async fn upload_file(&self, content: &str) -> Result<UploadedFile>;

    /// Create a chat session and return its durable id.
    async fn create_chat(&self, request: &NewChatRequest) -> Result<String>;

    /// Overwrite a session with the completed two-message thread.
    async fn update_chat(&self, chat_id: &str, request: &ChatUpdateRequest) -> Result<()>;
}

/// HTTP implementation against the chat backend's REST surface.
pub struct WebUiClient {
    client: Client,
    base_url: String,
}

impl WebUiClient {
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
            Err(Error::Transport(format!(
                "chat backend error {status}: {body}"
            )))
        }
    }
}

#[async_trait]
impl ChatBackend for WebUiClient {
    async fn upload_file(&self, content: &str) -> Result<UploadedFile> {
        let response = self
            .client
            .post(format!(
                "{}/api/v1/files/create_from_payload",
                self.base_url
            ))
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let file: UploadedFile = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        debug!(file_id = %file.id, size = file.meta.size, "uploaded page content");
        Ok(file)
    }

    async fn create_chat(&self, request: &NewChatRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/v1/chats/new", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let created: NewChatResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(created.id)
    }

    async fn update_chat(&self, chat_id: &str, request: &ChatUpdateRequest) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/api/v1/chats/{chat_id}", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}
