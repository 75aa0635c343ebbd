//! Operating Mode
//!
//! `Default` lets the service apply the resolution on the primary display.
//! `MultiMonitor` targets one chosen display, so a monitor must be selected
//! before the watcher may be switched on.

use tracing::debug;

use crate::domain::MonitorsMap;
use crate::error::{Error, Result};

/// UI-local mode selector; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperatingMode {
    #[default]
    Default,
    MultiMonitor,
}

/// Whether the watcher may be switched on in `mode`
pub fn can_enable_watch(mode: OperatingMode, selected_monitor: Option<&str>) -> bool {
    match mode {
        OperatingMode::Default => true,
        OperatingMode::MultiMonitor => selected_monitor.is_some(),
    }
}

/// What a mode assignment asks the caller to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeTransition {
    pub changed: bool,
    /// Run the one-time monitor scan for this entry into multi-monitor mode
    pub scan_monitors: bool,
}

/// Two-state mode machine
#[derive(Debug, Default)]
pub struct ModeController {
    mode: OperatingMode,
    scan_pending: bool,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Assign the mode
    ///
    /// Entering `MultiMonitor` with no known monitors requests one scan. Staying
    /// in a mode, or re-entering while that scan is still pending, requests
    /// nothing.
    pub fn set_mode(&mut self, mode: OperatingMode, monitors: &MonitorsMap) -> ModeTransition {
        if self.mode == mode {
            return ModeTransition::default();
        }
        self.mode = mode;
        debug!(?mode, "Operating mode changed");

        let scan_monitors =
            mode == OperatingMode::MultiMonitor && monitors.is_empty() && !self.scan_pending;
        if scan_monitors {
            self.scan_pending = true;
        }
        ModeTransition {
            changed: true,
            scan_monitors,
        }
    }

    /// The scan requested by [`ModeController::set_mode`] has ended
    pub fn scan_finished(&mut self) {
        self.scan_pending = false;
    }

    pub fn is_scan_pending(&self) -> bool {
        self.scan_pending
    }

    /// Local precondition for `set_watching(enable)`
    pub fn check_toggle(&self, enable: bool, selected_monitor: Option<&str>) -> Result<()> {
        if enable && !can_enable_watch(self.mode, selected_monitor) {
            return Err(Error::precondition("select a monitor before enabling the watcher"));
        }
        Ok(())
    }
}
