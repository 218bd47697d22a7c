//! Shared application state.

use std::sync::Arc;

use pagelens_client::{GatewayClient, WebUiClient};
use pagelens_core::PageLensConfig;
use pagelens_runtime::{ChatOrchestrator, RunTracker};
use pagelens_session::{BadgeBoard, SessionRegistry};
use pagelens_submit::PageSubmitter;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: PageLensConfig,
    pub submitter: PageSubmitter,
    pub orchestrator: ChatOrchestrator,
    pub registry: Arc<SessionRegistry>,
    pub badges: Arc<BadgeBoard>,
    pub tracker: Arc<RunTracker>,
}

impl AppState {
    pub fn new(config: PageLensConfig) -> Self {
        let gateway = Arc::new(GatewayClient::new(&config.gateway_url));
        let backend = Arc::new(WebUiClient::new(&config.webui_url));

        let registry = Arc::new(SessionRegistry::new());
        let badges = Arc::new(BadgeBoard::new());
        let tracker = Arc::new(RunTracker::new());

        let submitter = PageSubmitter::new(gateway.clone());
        let orchestrator = ChatOrchestrator::new(
            gateway,
            backend,
            registry.clone(),
            badges.clone(),
            tracker.clone(),
        );

        Self {
            config,
            submitter,
            orchestrator,
            registry,
            badges,
            tracker,
        }
    }
}
