//! PanelEntities - Shared State Handles
//!
//! Cheap-to-clone handles to every piece of panel state a view reads. State is
//! split by who writes it: the draft is written only by user edits, the status
//! mirror by the poller and service round-trips.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::states::{ConfigDraftStore, Notice, NoticeLog, StatusMirror};

/// Collection of all shared state handles
#[derive(Clone, Debug)]
pub struct PanelEntities {
    /// Saved/draft configuration pair
    pub draft: ConfigDraftStore,
    /// Mirrored service status
    pub status: StatusMirror,
    /// User-facing notices (ring buffer)
    pub notices: Arc<Mutex<NoticeLog>>,
}

impl PanelEntities {
    /// Initialize all entities with default values
    pub fn init(notice_capacity: usize) -> Self {
        Self {
            draft: ConfigDraftStore::new(),
            status: StatusMirror::new(),
            notices: Arc::new(Mutex::new(NoticeLog::new(notice_capacity))),
        }
    }

    /// Copy of the notice history, oldest first
    pub fn notice_history(&self) -> Vec<Notice> {
        self.notices.lock().entries().iter().cloned().collect()
    }
}
