//! Configuration for the PageLens service and its downstream endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 9400;
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9000";
pub const DEFAULT_WEBUI_URL: &str = "http://localhost:3003";

/// Top-level PageLens configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLensConfig {
    /// HTTP server port.
    pub port: u16,
    /// Model gateway base URL (indexing, model registry, inference proxy).
    pub gateway_url: String,
    /// Chat backend base URL (file uploads, chat sessions).
    pub webui_url: String,
}

impl PageLensConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PAGELENS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let gateway_url = std::env::var("PAGELENS_GATEWAY_URL")
            .unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());

        let webui_url = std::env::var("PAGELENS_WEBUI_URL")
            .unwrap_or_else(|_| DEFAULT_WEBUI_URL.to_string());

        Self {
            port,
            gateway_url,
            webui_url,
        }
    }
}

impl Default for PageLensConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            webui_url: DEFAULT_WEBUI_URL.to_string(),
        }
    }
}
