//! Wire types matching the gateway and chat backend API surfaces.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

// ---------------------------------------------------------------
// Model gateway
// ---------------------------------------------------------------

/// Response of the model-registry endpoint: `{"model": {"model": "<ref>"}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveModelResponse {
    pub model: ActiveModel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveModel {
    pub model: String,
}

/// Non-streaming completion response from the inference proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    pub content: String,
}

// ---------------------------------------------------------------
// Chat backend
// ---------------------------------------------------------------

/// File metadata as returned by the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeta {
    pub size: u64,
    pub name: String,
    /// Backend-specific fields we carry through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of the file-creation endpoint. The whole object is embedded
/// back into the first chat message's attachment, so unknown fields are
/// preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub meta: FileMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Attachment entry in a chat message's `files` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub file: UploadedFile,
    pub id: String,
    pub url: String,
    pub name: String,
    pub collection_name: String,
    pub status: String,
    pub size: u64,
    pub error: String,
    #[serde(rename = "itemId")]
    pub item_id: Uuid,
}

impl FileAttachment {
    /// Wrap an uploaded file the way the chat backend expects it on a
    /// message.
    pub fn from_upload(file: UploadedFile) -> Self {
        let id = file.id.clone();
        let name = file.meta.name.clone();
        let size = file.meta.size;
        Self {
            kind: "file".to_string(),
            url: format!("/api/v1/files/{id}"),
            collection_name: format!("file-{id}"),
            name,
            size,
            status: "uploaded".to_string(),
            error: String::new(),
            item_id: Uuid::new_v4(),
            id,
            file,
        }
    }
}

/// A message in a chat session thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    #[serde(rename = "parentId")]
    pub parent_id: Option<Uuid>,
    #[serde(rename = "childrenIds")]
    pub children_ids: Vec<Uuid>,
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileAttachment>>,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "modelName", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(rename = "modelIdx", skip_serializing_if = "Option::is_none")]
    pub model_idx: Option<u32>,
}

impl ChatMessage {
    /// The opening user message: placeholder body plus the page attachment.
    pub fn user(content: &str, model: &str, attachment: FileAttachment, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: None,
            children_ids: Vec::new(),
            role: "user".to_string(),
            content: content.to_string(),
            files: Some(vec![attachment]),
            timestamp,
            models: Some(vec![model.to_string()]),
            model: None,
            model_name: None,
            model_idx: None,
        }
    }

    /// The assistant reply, parented to the first user message.
    pub fn assistant(content: &str, model: &str, parent_id: Uuid, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_id: Some(parent_id),
            children_ids: Vec::new(),
            role: "assistant".to_string(),
            content: content.to_string(),
            files: None,
            timestamp,
            models: None,
            model: Some(model.to_string()),
            model_name: Some(model.to_string()),
            model_idx: Some(0),
        }
    }
}

/// Body of the new-chat endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewChatRequest {
    pub chat: NewChatBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewChatBody {
    pub id: String,
    pub title: String,
    pub models: Vec<String>,
    pub params: Map<String, Value>,
    pub messages: Vec<ChatMessage>,
    pub tags: Vec<String>,
    pub timestamp: i64,
}

impl NewChatRequest {
    /// A fresh chat holding exactly one user message.
    pub fn single_message(model: &str, message: ChatMessage, timestamp: i64) -> Self {
        Self {
            chat: NewChatBody {
                id: String::new(),
                title: "New Chat".to_string(),
                models: vec![model.to_string()],
                params: Map::new(),
                messages: vec![message],
                tags: Vec::new(),
                timestamp,
            },
        }
    }
}

/// Response of the new-chat endpoint; only the id is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewChatResponse {
    pub id: String,
}

/// Body of the session-update endpoint: the completed two-message thread.
#[derive(Debug, Clone, Serialize)]
pub struct ChatUpdateRequest {
    pub chat: ChatUpdateBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatUpdateBody {
    pub models: Vec<String>,
    pub messages: Vec<ChatMessage>,
    pub params: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileAttachment>>,
}

impl ChatUpdateRequest {
    /// Thread the assistant reply under the opening user message.
    pub fn completed_thread(model: &str, mut user: ChatMessage, assistant: ChatMessage) -> Self {
        user.children_ids = vec![assistant.id];
        let files = user.files.clone();
        Self {
            chat: ChatUpdateBody {
                models: vec![model.to_string()],
                messages: vec![user, assistant],
                params: Map::new(),
                files,
            },
        }
    }
}
