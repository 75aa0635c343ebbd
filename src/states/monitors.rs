//! Monitor Selection Guard
//!
//! The target monitor cannot change while the watcher is active. Scanning is
//! only discouraged while watching (see [`can_rescan`]); selection is enforced.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::MonitorsMap;
use crate::error::{Error, Result};
use crate::services::ServiceClient;
use crate::states::StatusMirror;

/// Whether a rescan should be offered to the user
pub fn can_rescan(watching: bool) -> bool {
    !watching
}

/// Outcome of a monitor rescan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescanOutcome {
    pub monitors: MonitorsMap,
    /// Selection dropped because its monitor disappeared
    pub cleared_selection: Option<String>,
}

/// Enforces the selection lock and keeps the selection consistent with scans
#[derive(Clone)]
pub struct MonitorSelectionGuard {
    service: Arc<dyn ServiceClient>,
    mirror: StatusMirror,
}

impl MonitorSelectionGuard {
    pub fn new(service: Arc<dyn ServiceClient>, mirror: StatusMirror) -> Self {
        Self { service, mirror }
    }

    /// Local check performed before any service call
    pub fn check_select(&self, name: &str) -> Result<()> {
        let status = self.mirror.snapshot();
        if status.watching {
            return Err(Error::precondition(
                "stop the watcher before changing the monitor",
            ));
        }
        if !status.monitors.contains(name) {
            return Err(Error::precondition(format!(
                "monitor {name} is not in the last scan"
            )));
        }
        Ok(())
    }

    /// Ask the service to target `name`
    ///
    /// Returns whether the selection was recorded locally. A rescan that lands
    /// while the service call is pending and drops `name` leaves the mirror
    /// without a selection even though the service accepted it.
    pub async fn select(&self, name: &str) -> Result<bool> {
        self.check_select(name)?;
        self.service.select_monitor(name.to_string()).await?;
        if let Err(e) = self.mirror.set_selected_monitor(name.to_string()) {
            warn!(monitor = name, error = %e, "Monitor vanished while being selected");
            return Ok(false);
        }
        info!(monitor = name, "Monitor selected");
        Ok(true)
    }

    /// Scan, then fetch the resulting map
    ///
    /// A failed scan or fetch leaves the previous map and selection in place.
    pub async fn rescan(&self) -> Result<RescanOutcome> {
        self.service.scan_monitors().await?;
        let monitors = self.service.get_monitors_map().await?;

        let cleared_selection = self.mirror.set_monitors(monitors.clone());
        if let Some(cleared) = &cleared_selection {
            warn!(monitor = %cleared, "Selected monitor disappeared after rescan");
        }
        info!(count = monitors.len(), "Monitor list refreshed");
        Ok(RescanOutcome {
            monitors,
            cleared_selection,
        })
    }
}

impl std::fmt::Debug for MonitorSelectionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSelectionGuard")
            .field("selected", &self.mirror.selected_monitor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ServiceOp, SimulatedService};

    fn guard_with(service: Arc<SimulatedService>) -> MonitorSelectionGuard {
        MonitorSelectionGuard::new(service, StatusMirror::new())
    }

    fn single_monitor() -> MonitorsMap {
        [("DP-1", "NVIDIA RTX 3080")].into_iter().collect()
    }

    #[tokio::test]
    async fn select_while_watching_never_reaches_service() {
        let service = Arc::new(SimulatedService::new().with_attached_monitors(single_monitor()));
        let guard = guard_with(service.clone());
        guard.rescan().await.expect("rescan");
        guard.mirror.set_watching(true);
        let calls_before = service.total_calls();

        let err = guard.select("DP-1").await.expect_err("locked while watching");

        assert!(err.is_precondition());
        assert_eq!(service.total_calls(), calls_before);
        assert_eq!(guard.mirror.selected_monitor(), None);
    }

    #[tokio::test]
    async fn select_unknown_monitor_is_rejected_locally() {
        let service = Arc::new(SimulatedService::new());
        let guard = guard_with(service.clone());

        assert!(guard.select("HDMI-1").await.is_err());
        assert_eq!(service.calls(ServiceOp::SelectMonitor), 0);
    }

    #[tokio::test]
    async fn rescan_clears_selection_of_removed_monitor() {
        let service = Arc::new(SimulatedService::new().with_attached_monitors(single_monitor()));
        let guard = guard_with(service.clone());
        guard.rescan().await.expect("rescan");
        assert!(guard.select("DP-1").await.expect("select"));

        service.set_attached_monitors([("DP-2", "NVIDIA RTX 3080")].into_iter().collect());
        let outcome = guard.rescan().await.expect("rescan");

        assert_eq!(outcome.cleared_selection.as_deref(), Some("DP-1"));
        assert_eq!(guard.mirror.selected_monitor(), None);
        assert!(guard.mirror.monitors().contains("DP-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn rescan_during_select_leaves_no_selection() {
        let service = Arc::new(SimulatedService::new().with_attached_monitors(single_monitor()));
        let guard = guard_with(service.clone());
        guard.rescan().await.expect("rescan");
        service.set_latency(std::time::Duration::from_millis(500));

        let select = guard.select("DP-1");
        tokio::pin!(select);
        assert!(futures::poll!(&mut select).is_pending());
        guard
            .mirror
            .set_monitors([("DP-2", "NVIDIA RTX 3080")].into_iter().collect());

        assert!(!select.await.expect("service accepted"));
        assert_eq!(service.selected_monitor().as_deref(), Some("DP-1"));
        assert_eq!(guard.mirror.selected_monitor(), None);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_map() {
        let service = Arc::new(SimulatedService::new().with_attached_monitors(single_monitor()));
        let guard = guard_with(service.clone());
        guard.rescan().await.expect("rescan");

        service.fail(ServiceOp::GetMonitorsMap);
        assert!(guard.rescan().await.is_err());
        assert_eq!(guard.mirror.monitors(), single_monitor());
    }

    #[test]
    fn rescan_offered_only_when_idle() {
        assert!(can_rescan(false));
        assert!(!can_rescan(true));
    }
}
