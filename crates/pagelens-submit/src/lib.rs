//! Page Submitter — forwards captures to the indexing endpoint and keeps
//! the last-submission record.
//!
//! The record is a single process-wide slot with last-write-wins semantics:
//! captures from different tabs racing to submit overwrite each other. That
//! is the intended single global "current page" notion, not a per-tab store.

use std::sync::Arc;

use pagelens_client::ModelGateway;
use pagelens_core::{Error, PageCapture, Result};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

/// How much of the captured content a preview exposes.
pub const SNIPPET_CHARS: usize = 200;

/// The last capture sent to the indexing endpoint, with its outcome.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub capture: PageCapture,
    pub is_success: bool,
}

/// Truncated view of the last submission for UI queries.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionPreview {
    pub title: String,
    pub url: String,
    #[serde(rename = "isSuccess")]
    pub is_success: bool,
    pub snippet: String,
}

pub struct PageSubmitter {
    gateway: Arc<dyn ModelGateway>,
    last: RwLock<Option<SubmissionRecord>>,
}

impl PageSubmitter {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            gateway,
            last: RwLock::new(None),
        }
    }

    /// Send a capture to the indexing endpoint. Transport failures are
    /// swallowed into `false`; the record is written either way.
    pub async fn submit(&self, capture: &PageCapture) -> bool {
        let is_success = match self.gateway.index_page(capture).await {
            Ok(()) => true,
            Err(e) => {
                warn!(url = %capture.url, error = %e, "page indexing failed");
                false
            }
        };

        *self.last.write() = Some(SubmissionRecord {
            capture: capture.clone(),
            is_success,
        });

        info!(url = %capture.url, is_success, "page submitted");
        is_success
    }

    /// Preview of the last submission, or `NotFound` when nothing has been
    /// captured yet.
    pub fn last_submission(&self) -> Result<SubmissionPreview> {
        let last = self.last.read();
        let record = last
            .as_ref()
            .ok_or_else(|| Error::NotFound("no data captured yet".to_string()))?;

        Ok(SubmissionPreview {
            title: record.capture.title.clone(),
            url: record.capture.url.clone(),
            is_success: record.is_success,
            snippet: record.capture.content.chars().take(SNIPPET_CHARS).collect(),
        })
    }

    /// Resubmit the last stored capture. Fails with `NotFound` before any
    /// network call when the slot is empty.
    pub async fn resend(&self) -> Result<bool> {
        let capture = {
            let last = self.last.read();
            last.as_ref()
                .map(|record| record.capture.clone())
                .ok_or_else(|| Error::NotFound("no data captured yet".to_string()))?
        };

        Ok(self.submit(&capture).await)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    #[derive(Default)]
    struct FakeGateway {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl ModelGateway for FakeGateway {
        async fn index_page(&self, _capture: &PageCapture) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                Err(Error::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        async fn active_model(&self) -> Result<String> {
            unreachable!("submitter never resolves models")
        }

        async fn chat_completions(&self, _model: &str, _prompt: &str) -> Result<String> {
            unreachable!("submitter never runs inference")
        }
    }

    fn capture(content: &str) -> PageCapture {
        PageCapture::new("Title", "https://example.com", content)
    }

    #[tokio::test]
    async fn test_submit_then_preview_truncates_content() {
        let gateway = Arc::new(FakeGateway::default());
        let submitter = PageSubmitter::new(gateway);

        let long = "x".repeat(500);
        assert!(submitter.submit(&capture(&long)).await);

        let preview = submitter.last_submission().unwrap();
        assert!(preview.is_success);
        assert_eq!(preview.snippet, "x".repeat(200));
    }

    #[tokio::test]
    async fn test_preview_keeps_short_content_whole() {
        let gateway = Arc::new(FakeGateway::default());
        let submitter = PageSubmitter::new(gateway);

        submitter.submit(&capture("short")).await;
        assert_eq!(submitter.last_submission().unwrap().snippet, "short");
    }

    #[tokio::test]
    async fn test_failure_is_recorded_not_raised() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.fail.store(true, Ordering::SeqCst);
        let submitter = PageSubmitter::new(gateway);

        assert!(!submitter.submit(&capture("body")).await);
        let preview = submitter.last_submission().unwrap();
        assert!(!preview.is_success);
    }

    #[tokio::test]
    async fn test_resend_without_capture_makes_no_network_call() {
        let gateway = Arc::new(FakeGateway::default());
        let submitter = PageSubmitter::new(gateway.clone());

        let err = submitter.resend().await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resend_resubmits_and_overwrites_outcome() {
        let gateway = Arc::new(FakeGateway::default());
        let submitter = PageSubmitter::new(gateway.clone());

        submitter.submit(&capture("body")).await;
        gateway.fail.store(true, Ordering::SeqCst);

        assert!(!submitter.resend().await.unwrap());
        assert!(!submitter.last_submission().unwrap().is_success);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_last_write_wins_across_captures() {
        let gateway = Arc::new(FakeGateway::default());
        let submitter = PageSubmitter::new(gateway);

        submitter.submit(&capture("first")).await;
        submitter
            .submit(&PageCapture::new("Other", "https://other.example", "second"))
            .await;

        let preview = submitter.last_submission().unwrap();
        assert_eq!(preview.url, "https://other.example");
        assert_eq!(preview.snippet, "second");
    }
}
