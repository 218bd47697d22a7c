//! Per-tab action badges signaling relevant-memory matches.

use std::collections::HashMap;

use pagelens_core::TabId;
use parking_lot::RwLock;
use serde::Serialize;

pub const MATCH_BADGE_TEXT: &str = "New";
pub const MATCH_BADGE_BACKGROUND: &str = "#ff0f0f";
pub const MATCH_BADGE_TEXT_COLOR: &str = "#ffffff";

/// A visual badge attached to a tab's action icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "textColor")]
    pub text_color: String,
}

impl Badge {
    /// The red "New" badge set when a page matches stored memories.
    pub fn memory_match() -> Self {
        Self {
            text: MATCH_BADGE_TEXT.to_string(),
            background_color: MATCH_BADGE_BACKGROUND.to_string(),
            text_color: MATCH_BADGE_TEXT_COLOR.to_string(),
        }
    }
}

/// In-process badge state, one slot per tab.
pub struct BadgeBoard {
    badges: RwLock<HashMap<TabId, Badge>>,
}

impl BadgeBoard {
    pub fn new() -> Self {
        Self {
            badges: RwLock::new(HashMap::new()),
        }
    }

    pub fn set(&self, tab_id: TabId, badge: Badge) {
        self.badges.write().insert(tab_id, badge);
    }

    pub fn get(&self, tab_id: TabId) -> Option<Badge> {
        self.badges.read().get(&tab_id).cloned()
    }

    pub fn clear(&self, tab_id: TabId) -> bool {
        self.badges.write().remove(&tab_id).is_some()
    }
}

impl Default for BadgeBoard {
    fn default() -> Self {
        Self::new()
    }
}
