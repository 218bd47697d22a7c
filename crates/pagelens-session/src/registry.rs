//! Session registry — maps (tab, url) to the chat session serving it.

use std::collections::HashMap;

use pagelens_core::TabId;
use parking_lot::RwLock;
use tracing::debug;

/// Two-level mapping from tab to the chat sessions it has accumulated,
/// one per visited URL. A tab may register several sessions over its
/// lifetime; all of them are dropped when the tab closes.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<TabId, HashMap<String, String>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register the chat session serving `url` in `tab_id`.
    pub fn put(&self, tab_id: TabId, url: &str, chat_id: &str) {
        let mut sessions = self.sessions.write();
        sessions
            .entry(tab_id)
            .or_default()
            .insert(url.to_string(), chat_id.to_string());
        debug!(tab_id, url, chat_id, "session registered");
    }

    /// Look up the chat session for a tab+url pair.
    pub fn get(&self, tab_id: TabId, url: &str) -> Option<String> {
        self.sessions
            .read()
            .get(&tab_id)
            .and_then(|urls| urls.get(url))
            .cloned()
    }

    /// Drop every session registered under a tab, regardless of URL.
    /// Returns the number of entries removed.
    pub fn evict_tab(&self, tab_id: TabId) -> usize {
        let removed = self
            .sessions
            .write()
            .remove(&tab_id)
            .map(|urls| urls.len())
            .unwrap_or(0);
        if removed > 0 {
            debug!(tab_id, removed, "evicted tab sessions");
        }
        removed
    }

    /// Total number of registered sessions across all tabs.
    pub fn len(&self) -> usize {
        self.sessions.read().values().map(|urls| urls.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
