//! Terminal outcome of an orchestration run, tracked per tab.

use std::collections::HashMap;

use pagelens_core::TabId;
use parking_lot::RwLock;
use serde::Serialize;

/// The stages of an orchestration run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ResolveModel,
    UploadFile,
    CreateChat,
    RegisterSession,
    RunInference,
    ParseReply,
    SetBadge,
    FinalizeChat,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ResolveModel => "resolve_model",
            Stage::UploadFile => "upload_file",
            Stage::CreateChat => "create_chat",
            Stage::RegisterSession => "register_session",
            Stage::RunInference => "run_inference",
            Stage::ParseReply => "parse_reply",
            Stage::SetBadge => "set_badge",
            Stage::FinalizeChat => "finalize_chat",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a run ended. The first failing stage short-circuits the rest and is
/// reported here instead of being swallowed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    Completed {
        #[serde(rename = "chatId")]
        chat_id: String,
        #[serde(rename = "hasMatches")]
        has_matches: bool,
    },
    Failed {
        stage: Stage,
        error: String,
        /// Present when the run got far enough to create a session.
        #[serde(rename = "chatId", skip_serializing_if = "Option::is_none")]
        chat_id: Option<String>,
    },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }
}

/// Last run outcome per tab, queryable by the side panel.
pub struct RunTracker {
    runs: RwLock<HashMap<TabId, RunOutcome>>,
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
        }
    }

    pub fn record(&self, tab_id: TabId, outcome: RunOutcome) {
        self.runs.write().insert(tab_id, outcome);
    }

    pub fn get(&self, tab_id: TabId) -> Option<RunOutcome> {
        self.runs.read().get(&tab_id).cloned()
    }

    pub fn clear(&self, tab_id: TabId) -> bool {
        self.runs.write().remove(&tab_id).is_some()
    }
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}
