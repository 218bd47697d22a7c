//! Capture signal routes — page content, last-submission queries, resend.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pagelens_core::{Error, PageCapture, TabId};
use serde::Deserialize;
use tracing::info;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signals/page-content", post(page_content))
        .route("/signals/last-data", get(last_data))
        .route("/signals/resend", post(resend_last))
}

/// The extension's `PAGE_CONTENT` message.
#[derive(Debug, Deserialize)]
struct PageContentSignal {
    #[serde(rename = "tabId")]
    tab_id: TabId,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
    /// Sender frame URL; falls back to the captured page URL when absent.
    url: Option<String>,
    data: PageCapture,
}

/// A capture arrived: record-and-forward it to the indexing endpoint and,
/// independently, kick off an orchestration run. Both are fire-and-forget;
/// the caller gets an immediate ack.
async fn page_content(
    State(state): State<Arc<AppState>>,
    Json(signal): Json<PageContentSignal>,
) -> (StatusCode, Json<serde_json::Value>) {
    let url = signal.url.unwrap_or_else(|| signal.data.url.clone());
    info!(tab_id = signal.tab_id, url = %url, title = %signal.data.title, "page content received");

    let capture = signal.data.clone();
    let submit_state = state.clone();
    tokio::spawn(async move {
        submit_state.submitter.submit(&capture).await;
    });

    let run_state = state.clone();
    tokio::spawn(async move {
        run_state
            .orchestrator
            .run(signal.data, signal.tab_id, signal.document_id, url)
            .await;
    });

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "accepted": true })),
    )
}

/// The extension's `GET_LAST_DATA` query.
async fn last_data(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    match state.submitter.last_submission() {
        Ok(preview) => (StatusCode::OK, Json(serde_json::json!(preview))),
        Err(Error::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No data captured yet." })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// The extension's `RESEND_LAST` command.
async fn resend_last(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    match state.submitter.resend().await {
        Ok(is_success) => (
            StatusCode::OK,
            Json(serde_json::json!({ "isSuccess": is_success })),
        ),
        Err(Error::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "isSuccess": false,
                "error": "No data captured yet.",
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "isSuccess": false, "error": e.to_string() })),
        ),
    }
}
