//! Shared capture types.

use serde::{Deserialize, Serialize};

/// Browser tab identifier, as reported by the capturing extension.
pub type TabId = i64;

/// A captured snapshot of a browsed page. Produced once per page load,
/// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCapture {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl PageCapture {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }
}
