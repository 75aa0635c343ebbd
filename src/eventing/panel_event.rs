//! PanelEvent - Panel Event Enum
//!
//! Everything the state layer pushes to whatever renders it.

use crate::states::{LiveStatus, Notice, OperatingMode};

/// Events for state -> UI communication
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// Feedback for the user
    Notice(Notice),

    /// Mirrored service status changed
    StatusChanged(LiveStatus),

    /// Draft was edited, saved, discarded or reloaded
    DraftChanged {
        dirty: bool,
    },

    /// Operating mode switched
    ModeChanged(OperatingMode),
}

impl PanelEvent {
    /// Short tag for logging
    pub fn kind(&self) -> &'static str {
        match self {
            PanelEvent::Notice(_) => "notice",
            PanelEvent::StatusChanged(_) => "status",
            PanelEvent::DraftChanged { .. } => "draft",
            PanelEvent::ModeChanged(_) => "mode",
        }
    }
}
