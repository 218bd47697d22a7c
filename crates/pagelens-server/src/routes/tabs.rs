//! Tab lifecycle and side-panel query routes.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pagelens_core::TabId;
use serde::Deserialize;
use tracing::info;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tabs/removed", post(tab_removed))
        .route("/tabs/{tab_id}/session", get(get_session))
        .route("/tabs/{tab_id}/badge", get(get_badge))
        .route("/tabs/{tab_id}/run", get(get_run))
}

#[derive(Debug, Deserialize)]
struct TabRemovedBody {
    #[serde(rename = "tabId")]
    tab_id: TabId,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    url: String,
}

/// Tab closed: drop everything keyed to it.
async fn tab_removed(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TabRemovedBody>,
) -> Json<serde_json::Value> {
    let removed = state.registry.evict_tab(body.tab_id);
    state.badges.clear(body.tab_id);
    state.tracker.clear(body.tab_id);
    info!(tab_id = body.tab_id, removed, "tab removed");
    Json(serde_json::json!({ "removedSessions": removed }))
}

/// Chat session serving a tab+url pair; 404 puts the panel in its idle
/// state.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
    Query(query): Query<SessionQuery>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.registry.get(tab_id, &query.url) {
        Some(chat_id) => (
            StatusCode::OK,
            Json(serde_json::json!({ "chatId": chat_id })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No session for this tab" })),
        ),
    }
}

async fn get_badge(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
) -> Json<serde_json::Value> {
    match state.badges.get(tab_id) {
        Some(badge) => Json(serde_json::json!({ "active": true, "badge": badge })),
        None => Json(serde_json::json!({ "active": false })),
    }
}

/// Terminal outcome of the last orchestration run for a tab.
async fn get_run(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.tracker.get(tab_id) {
        Some(outcome) => (StatusCode::OK, Json(serde_json::json!(outcome))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No run recorded for this tab" })),
        ),
    }
}
