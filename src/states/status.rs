//! Live Status Mirror
//!
//! Local copy of the watcher service's state. Only the service owns these
//! values; the panel refreshes them and never invents them.

use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::RwLock;

use crate::domain::{Configuration, MonitorsMap};
use crate::error::{Error, Result};

/// Snapshot of everything the panel knows about the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveStatus {
    /// Watcher is monitoring for the game process
    pub watching: bool,
    /// Game process is currently detected
    pub gaming: bool,
    /// Service runs with administrator rights; `None` until probed
    pub elevated: Option<bool>,
    /// Configuration as last fetched by a status batch
    pub config: Option<Configuration>,
    /// Result of the last explicit monitor scan
    pub monitors: MonitorsMap,
    /// Always a key of `monitors`, or `None`
    pub selected_monitor: Option<String>,
    /// When the last status batch finished
    pub refreshed_at: Option<DateTime<Local>>,
}

/// Results of one polling batch, one per fetch
#[derive(Debug)]
pub struct StatusBatch {
    pub watching: Result<bool>,
    pub gaming: Result<bool>,
    pub config: Result<Configuration>,
}

/// What applying a batch did
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Any mirrored value changed
    pub changed: bool,
    /// Fetches that failed, in fetch order
    pub errors: Vec<Error>,
}

/// Shared handle to the mirrored status
#[derive(Clone, Debug, Default)]
pub struct StatusMirror {
    inner: Arc<RwLock<LiveStatus>>,
}

impl StatusMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> LiveStatus {
        self.inner.read().clone()
    }

    pub fn is_watching(&self) -> bool {
        self.inner.read().watching
    }

    pub fn selected_monitor(&self) -> Option<String> {
        self.inner.read().selected_monitor.clone()
    }

    pub fn monitors(&self) -> MonitorsMap {
        self.inner.read().monitors.clone()
    }

    pub fn config(&self) -> Option<Configuration> {
        self.inner.read().config.clone()
    }

    /// Apply every successful fetch of a batch in one write
    ///
    /// Failed fetches leave their mirror untouched and are handed back.
    pub fn apply_batch(&self, batch: StatusBatch) -> BatchReport {
        let mut report = BatchReport::default();
        let mut status = self.inner.write();

        match batch.watching {
            Ok(watching) => report.changed |= replace(&mut status.watching, watching),
            Err(e) => report.errors.push(e),
        }
        match batch.gaming {
            Ok(gaming) => report.changed |= replace(&mut status.gaming, gaming),
            Err(e) => report.errors.push(e),
        }
        match batch.config {
            Ok(config) => report.changed |= replace(&mut status.config, Some(config)),
            Err(e) => report.errors.push(e),
        }

        status.refreshed_at = Some(Local::now());
        report
    }

    pub fn set_watching(&self, watching: bool) -> bool {
        replace(&mut self.inner.write().watching, watching)
    }

    pub fn set_elevated(&self, elevated: bool) -> bool {
        replace(&mut self.inner.write().elevated, Some(elevated))
    }

    pub fn set_config(&self, config: Configuration) -> bool {
        replace(&mut self.inner.write().config, Some(config))
    }

    /// Replace the monitor map, dropping a selection that no longer exists
    ///
    /// Returns the selection that was cleared, if any.
    pub fn set_monitors(&self, monitors: MonitorsMap) -> Option<String> {
        let mut status = self.inner.write();
        status.monitors = monitors;
        let stale = status
            .selected_monitor
            .as_ref()
            .is_some_and(|selected| !status.monitors.contains(selected));
        if stale {
            status.selected_monitor.take()
        } else {
            None
        }
    }

    /// Record a selection the service accepted
    pub fn set_selected_monitor(&self, name: String) -> Result<()> {
        let mut status = self.inner.write();
        if !status.monitors.contains(&name) {
            return Err(Error::precondition(format!(
                "monitor {name} is not in the last scan"
            )));
        }
        status.selected_monitor = Some(name);
        Ok(())
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
