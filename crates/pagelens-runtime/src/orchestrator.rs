//! Chat Orchestrator — the capture-to-chat pipeline.
//!
//! Stages run strictly in order; each later stage depends on identifiers
//! produced by earlier ones, so there is no parallel fan-out. The first
//! failing stage short-circuits the remainder and becomes the run's
//! terminal outcome. No timeouts, retries, or cancellation: a hung
//! downstream service stalls that run without affecting others.

use std::sync::Arc;

use chrono::Utc;
use pagelens_client::{
    ChatBackend, ChatMessage, ChatUpdateRequest, FileAttachment, ModelGateway, NewChatRequest,
};
use pagelens_core::{PageCapture, TabId};
use pagelens_reply::{build_prompt, parse};
use pagelens_session::{Badge, BadgeBoard, SessionRegistry};
use tracing::{error, info, warn};

use crate::outcome::{RunOutcome, RunTracker, Stage};

/// Body of the opening user message; the real content rides along as a
/// file attachment.
pub const PLACEHOLDER_USER_MESSAGE: &str = "...";

/// Assistant text used to close out a session whose run failed after the
/// session already existed, so no orphaned single-message thread remains.
const FAILED_RUN_MESSAGE: &str =
    "The page analysis did not complete. Reload the page to try again.";

pub struct ChatOrchestrator {
    gateway: Arc<dyn ModelGateway>,
    backend: Arc<dyn ChatBackend>,
    registry: Arc<SessionRegistry>,
    badges: Arc<BadgeBoard>,
    tracker: Arc<RunTracker>,
}

impl ChatOrchestrator {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        backend: Arc<dyn ChatBackend>,
        registry: Arc<SessionRegistry>,
        badges: Arc<BadgeBoard>,
        tracker: Arc<RunTracker>,
    ) -> Self {
        Self {
            gateway,
            backend,
            registry,
            badges,
            tracker,
        }
    }

    /// Run the full pipeline for one capture. Fire-and-forget from the
    /// caller's perspective: the terminal outcome is logged and recorded in
    /// the run tracker, never returned.
    pub async fn run(
        &self,
        capture: PageCapture,
        tab_id: TabId,
        document_id: Option<String>,
        url: String,
    ) {
        info!(
            tab_id,
            url = %url,
            document_id = document_id.as_deref().unwrap_or(""),
            "orchestration run started"
        );

        let outcome = self.execute(&capture, tab_id, &url).await;

        match &outcome {
            RunOutcome::Completed {
                chat_id,
                has_matches,
            } => {
                info!(tab_id, url = %url, chat_id = %chat_id, has_matches, "orchestration run completed");
            }
            RunOutcome::Failed {
                stage,
                error,
                chat_id,
            } => {
                error!(
                    tab_id,
                    url = %url,
                    stage = %stage,
                    chat_id = chat_id.as_deref().unwrap_or(""),
                    error = %error,
                    "orchestration run failed"
                );
            }
        }

        self.tracker.record(tab_id, outcome);
    }

    async fn execute(&self, capture: &PageCapture, tab_id: TabId, url: &str) -> RunOutcome {
        // Stage 1: resolve the active model. Nothing exists yet, so a
        // failure here aborts the run with no session to clean up.
        let model = match self.gateway.active_model().await {
            Ok(model) => model,
            Err(e) => return Self::failed(Stage::ResolveModel, e, None),
        };

        // Stage 2: upload the page content as the first message's attachment.
        let uploaded = match self.backend.upload_file(&capture.content).await {
            Ok(file) => file,
            Err(e) => return Self::failed(Stage::UploadFile, e, None),
        };

        // Stage 3: create the session with one placeholder user message.
        let timestamp = Utc::now().timestamp();
        let attachment = FileAttachment::from_upload(uploaded);
        let user = ChatMessage::user(PLACEHOLDER_USER_MESSAGE, &model, attachment, timestamp);
        let request = NewChatRequest::single_message(&model, user.clone(), timestamp);
        let chat_id = match self.backend.create_chat(&request).await {
            Ok(id) => id,
            Err(e) => return Self::failed(Stage::CreateChat, e, None),
        };

        // Stage 4: register the session so the side panel can find it.
        self.registry.put(tab_id, url, &chat_id);

        // Stage 5: one-shot inference over the dual-task prompt.
        let prompt = build_prompt(&capture.content);
        let reply = match self.gateway.chat_completions(&model, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                return self
                    .fail_with_placeholder(Stage::RunInference, e, &model, user, &chat_id)
                    .await
            }
        };

        // Stage 6: split the reply into summary and memory matches.
        let parsed = match parse(&reply) {
            Ok(parsed) => parsed,
            Err(e) => {
                return self
                    .fail_with_placeholder(Stage::ParseReply, e, &model, user, &chat_id)
                    .await
            }
        };

        // Stage 7: badge the tab when the page touched stored memories.
        if parsed.has_matches {
            self.badges.set(tab_id, Badge::memory_match());
        }

        // Stage 8: append the assistant reply, completing the thread.
        let assistant = ChatMessage::assistant(&parsed.display_text(), &model, user.id, timestamp);
        let update = ChatUpdateRequest::completed_thread(&model, user, assistant);
        match self.backend.update_chat(&chat_id, &update).await {
            Ok(()) => RunOutcome::Completed {
                chat_id,
                has_matches: parsed.has_matches,
            },
            Err(e) => Self::failed(Stage::FinalizeChat, e, Some(chat_id)),
        }
    }

    fn failed(stage: Stage, error: pagelens_core::Error, chat_id: Option<String>) -> RunOutcome {
        RunOutcome::Failed {
            stage,
            error: error.to_string(),
            chat_id,
        }
    }

    /// A stage failed after the session was created: finalize the thread
    /// with a placeholder reply before reporting the failure.
    async fn fail_with_placeholder(
        &self,
        stage: Stage,
        error: pagelens_core::Error,
        model: &str,
        user: ChatMessage,
        chat_id: &str,
    ) -> RunOutcome {
        let timestamp = user.timestamp;
        let assistant = ChatMessage::assistant(FAILED_RUN_MESSAGE, model, user.id, timestamp);
        let update = ChatUpdateRequest::completed_thread(model, user, assistant);
        if let Err(e) = self.backend.update_chat(chat_id, &update).await {
            warn!(chat_id, error = %e, "could not finalize failed run with placeholder");
        }

        Self::failed(stage, error, Some(chat_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pagelens_client::UploadedFile;
    use pagelens_core::{Error, Result};
    use parking_lot::Mutex;

    use super::*;

    /// Which stage a fake should fail at, if any.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum FailAt {
        Nothing,
        ActiveModel,
        Upload,
        CreateChat,
        Inference,
    }

    struct FakeGateway {
        fail_at: FailAt,
        reply: String,
    }

    #[async_trait]
    impl ModelGateway for FakeGateway {
        async fn index_page(&self, _capture: &PageCapture) -> Result<()> {
            Ok(())
        }

        async fn active_model(&self) -> Result<String> {
            if self.fail_at == FailAt::ActiveModel {
                return Err(Error::Transport("no model".into()));
            }
            Ok("llama3.2:3b".to_string())
        }

        async fn chat_completions(&self, _model: &str, _prompt: &str) -> Result<String> {
            if self.fail_at == FailAt::Inference {
                return Err(Error::Transport("inference down".into()));
            }
            Ok(self.reply.clone())
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        fail_upload: bool,
        fail_create: bool,
        chats_created: AtomicUsize,
        updates: Mutex<Vec<(String, ChatUpdateRequest)>>,
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn upload_file(&self, content: &str) -> Result<UploadedFile> {
            if self.fail_upload {
                return Err(Error::Transport("upload refused".into()));
            }
            Ok(serde_json::from_value(serde_json::json!({
                "id": "file-1",
                "meta": {"size": content.len(), "name": "page.txt"},
            }))
            .unwrap())
        }

        async fn create_chat(&self, _request: &NewChatRequest) -> Result<String> {
            if self.fail_create {
                return Err(Error::Transport("chat backend down".into()));
            }
            let n = self.chats_created.fetch_add(1, Ordering::SeqCst);
            Ok(format!("chat-{n}"))
        }

        async fn update_chat(&self, chat_id: &str, request: &ChatUpdateRequest) -> Result<()> {
            self.updates
                .lock()
                .push((chat_id.to_string(), request.clone()));
            Ok(())
        }
    }

    struct Harness {
        backend: Arc<FakeBackend>,
        registry: Arc<SessionRegistry>,
        badges: Arc<BadgeBoard>,
        tracker: Arc<RunTracker>,
        orchestrator: ChatOrchestrator,
    }

    fn harness(fail_at: FailAt, reply: &str) -> Harness {
        let gateway = Arc::new(FakeGateway {
            fail_at,
            reply: reply.to_string(),
        });
        let backend = Arc::new(FakeBackend {
            fail_upload: fail_at == FailAt::Upload,
            fail_create: fail_at == FailAt::CreateChat,
            ..FakeBackend::default()
        });
        let registry = Arc::new(SessionRegistry::new());
        let badges = Arc::new(BadgeBoard::new());
        let tracker = Arc::new(RunTracker::new());
        let orchestrator = ChatOrchestrator::new(
            gateway,
            backend.clone(),
            registry.clone(),
            badges.clone(),
            tracker.clone(),
        );
        Harness {
            backend,
            registry,
            badges,
            tracker,
            orchestrator,
        }
    }

    fn capture() -> PageCapture {
        PageCapture::new("Title", "https://example.com/article", "page body")
    }

    const MATCH_REPLY: &str = "[task1]\nA summary\n[task2]\nYou like chess";
    const NO_MATCH_REPLY: &str = "[task1]\nA summary\n[task2]\nNO_INTERESTS_FOUND";

    #[tokio::test]
    async fn test_full_run_registers_session_and_badges_tab() {
        let h = harness(FailAt::Nothing, MATCH_REPLY);
        h.orchestrator
            .run(capture(), 1, None, "https://example.com/article".into())
            .await;

        assert_eq!(
            h.registry.get(1, "https://example.com/article").as_deref(),
            Some("chat-0")
        );
        assert_eq!(h.badges.get(1), Some(Badge::memory_match()));
        assert!(h.tracker.get(1).unwrap().is_completed());

        let updates = h.backend.updates.lock();
        assert_eq!(updates.len(), 1);
        let (chat_id, update) = &updates[0];
        assert_eq!(chat_id, "chat-0");
        assert_eq!(update.chat.messages.len(), 2);
        assert_eq!(update.chat.messages[1].content, "You like chess\nA summary");
        assert_eq!(
            update.chat.messages[0].children_ids,
            vec![update.chat.messages[1].id]
        );
    }

    #[tokio::test]
    async fn test_no_match_run_sets_no_badge() {
        let h = harness(FailAt::Nothing, NO_MATCH_REPLY);
        h.orchestrator
            .run(capture(), 1, None, "https://example.com/article".into())
            .await;

        assert_eq!(h.badges.get(1), None);
        let updates = h.backend.updates.lock();
        assert_eq!(updates[0].1.chat.messages[1].content, "A summary");
    }

    #[tokio::test]
    async fn test_model_failure_aborts_before_any_session() {
        let h = harness(FailAt::ActiveModel, MATCH_REPLY);
        h.orchestrator
            .run(capture(), 1, None, "https://example.com/article".into())
            .await;

        assert!(h.registry.is_empty());
        assert_eq!(h.backend.chats_created.load(Ordering::SeqCst), 0);
        match h.tracker.get(1).unwrap() {
            RunOutcome::Failed { stage, chat_id, .. } => {
                assert_eq!(stage, Stage::ResolveModel);
                assert!(chat_id.is_none());
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_failure_never_registers_a_session() {
        let h = harness(FailAt::Upload, MATCH_REPLY);
        h.orchestrator
            .run(capture(), 1, None, "https://example.com/article".into())
            .await;

        assert!(h.registry.is_empty());
        assert_eq!(h.backend.chats_created.load(Ordering::SeqCst), 0);
        match h.tracker.get(1).unwrap() {
            RunOutcome::Failed { stage, .. } => assert_eq!(stage, Stage::UploadFile),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inference_failure_finalizes_with_placeholder() {
        let h = harness(FailAt::Inference, MATCH_REPLY);
        h.orchestrator
            .run(capture(), 1, None, "https://example.com/article".into())
            .await;

        // Session exists and stays registered; the thread was closed out.
        assert_eq!(
            h.registry.get(1, "https://example.com/article").as_deref(),
            Some("chat-0")
        );
        let updates = h.backend.updates.lock();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].1.chat.messages[1].content, FAILED_RUN_MESSAGE);

        match h.tracker.get(1).unwrap() {
            RunOutcome::Failed { stage, chat_id, .. } => {
                assert_eq!(stage, Stage::RunInference);
                assert_eq!(chat_id.as_deref(), Some("chat-0"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(h.badges.get(1), None);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_reported_not_sliced() {
        let h = harness(FailAt::Nothing, "free-form text with no markers");
        h.orchestrator
            .run(capture(), 1, None, "https://example.com/article".into())
            .await;

        match h.tracker.get(1).unwrap() {
            RunOutcome::Failed { stage, error, .. } => {
                assert_eq!(stage, Stage::ParseReply);
                assert!(error.contains("[task1]"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        // Placeholder finalization still closed the thread.
        assert_eq!(h.backend.updates.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_tabs_do_not_interfere() {
        let h = harness(FailAt::Nothing, MATCH_REPLY);
        let run_a = h
            .orchestrator
            .run(capture(), 1, None, "https://a.example".into());
        let run_b = h.orchestrator.run(
            PageCapture::new("Other", "https://b.example", "other body"),
            2,
            None,
            "https://b.example".into(),
        );
        tokio::join!(run_a, run_b);

        let chat_a = h.registry.get(1, "https://a.example").unwrap();
        let chat_b = h.registry.get(2, "https://b.example").unwrap();
        assert_ne!(chat_a, chat_b);
        assert!(h.badges.get(1).is_some());
        assert!(h.badges.get(2).is_some());
        assert!(h.tracker.get(1).unwrap().is_completed());
        assert!(h.tracker.get(2).unwrap().is_completed());
    }
}
