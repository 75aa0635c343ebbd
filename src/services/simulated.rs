//! Simulated Watcher Service
//!
//! In-memory stand-in for the watcher service. Used by the demo binary and
//! by the state layer tests: it records every call, can be told to fail
//! individual operations, and can add latency to every call.

use std::time::Duration;

use ahash::{AHashMap, AHashSet};
use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;

use crate::domain::{Configuration, MonitorsMap};
use crate::error::{Error, Result};
use crate::services::{ServiceClient, ServiceOp};

/// Where the simulated game path scan "finds" the game
#[derive(Debug, Clone)]
pub struct GameInstall {
    pub game_path: String,
    pub launcher_path: String,
}

#[derive(Debug, Default)]
struct SimState {
    config: Configuration,
    watching: bool,
    game_running: bool,
    elevated: bool,
    /// Displays physically attached; a scan copies these into `monitors`
    attached: MonitorsMap,
    monitors: MonitorsMap,
    selected: Option<String>,
    install: Option<GameInstall>,
    taskbar_hidden: bool,
}

/// In-memory watcher service
#[derive(Debug, Default)]
pub struct SimulatedService {
    state: Mutex<SimState>,
    calls: Mutex<AHashMap<ServiceOp, usize>>,
    failing: Mutex<AHashSet<ServiceOp>>,
    latency: Mutex<Duration>,
}

impl SimulatedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(self, config: Configuration) -> Self {
        self.state.lock().config = config;
        self
    }

    pub fn with_attached_monitors(self, monitors: MonitorsMap) -> Self {
        self.state.lock().attached = monitors;
        self
    }

    pub fn with_game_install(self, install: GameInstall) -> Self {
        self.state.lock().install = Some(install);
        self
    }

    pub fn with_elevated(self, elevated: bool) -> Self {
        self.state.lock().elevated = elevated;
        self
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock() = latency;
        self
    }

    // ==================== Fault Injection ====================

    /// Make every subsequent call of `op` fail
    pub fn fail(&self, op: ServiceOp) {
        self.failing.lock().insert(op);
    }

    /// Undo [`SimulatedService::fail`]
    pub fn recover(&self, op: ServiceOp) {
        self.failing.lock().remove(&op);
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    // ==================== External Actors ====================

    /// Swap the attached displays, as if one was plugged or unplugged
    pub fn set_attached_monitors(&self, monitors: MonitorsMap) {
        self.state.lock().attached = monitors;
    }

    /// Simulate the game process exiting on its own
    pub fn set_game_running(&self, running: bool) {
        self.state.lock().game_running = running;
    }

    /// Overwrite the persisted configuration behind the panel's back
    pub fn replace_config(&self, config: Configuration) {
        self.state.lock().config = config;
    }

    // ==================== Inspection ====================

    /// Number of times `op` was invoked, failed calls included
    pub fn calls(&self, op: ServiceOp) -> usize {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    pub fn config(&self) -> Configuration {
        self.state.lock().config.clone()
    }

    pub fn is_watching(&self) -> bool {
        self.state.lock().watching
    }

    pub fn selected_monitor(&self) -> Option<String> {
        self.state.lock().selected.clone()
    }

    pub fn is_taskbar_hidden(&self) -> bool {
        self.state.lock().taskbar_hidden
    }

    fn call<T, F>(&self, op: ServiceOp, handler: F) -> BoxFuture<'_, Result<T>>
    where
        T: Send + 'static,
        F: FnOnce(&mut SimState) -> Result<T> + Send + 'static,
    {
        async move {
            *self.calls.lock().entry(op).or_insert(0) += 1;
            tracing::trace!(op = %op, "Simulated service call");

            let latency = *self.latency.lock();
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }

            if self.failing.lock().contains(&op) {
                return Err(Error::service(op.name(), "simulated failure"));
            }

            let mut state = self.state.lock();
            handler(&mut state)
        }
        .boxed()
    }
}

impl ServiceClient for SimulatedService {
    fn load_configuration(&self) -> BoxFuture<'_, Result<Configuration>> {
        self.call(ServiceOp::LoadConfiguration, |state| Ok(state.config.clone()))
    }

    fn save_configuration(&self, config: Configuration) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::SaveConfiguration, move |state| {
            state.config = config;
            Ok(())
        })
    }

    fn reset_configuration_to_defaults(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::ResetConfiguration, |state| {
            state.config = Configuration::default();
            Ok(())
        })
    }

    fn get_watching_status(&self) -> BoxFuture<'_, Result<bool>> {
        self.call(ServiceOp::GetWatchingStatus, |state| Ok(state.watching))
    }

    fn get_gaming_status(&self) -> BoxFuture<'_, Result<bool>> {
        self.call(ServiceOp::GetGamingStatus, |state| {
            Ok(state.watching && state.game_running)
        })
    }

    fn toggle_watching(&self) -> BoxFuture<'_, Result<bool>> {
        self.call(ServiceOp::ToggleWatching, |state| {
            if state.watching {
                state.watching = false;
                return Ok(false);
            }
            if !state.config.has_watcher_game_path() {
                return Err(Error::service(
                    ServiceOp::ToggleWatching.name(),
                    "watcher game path is not configured",
                ));
            }
            state.watching = true;
            Ok(true)
        })
    }

    fn scan_monitors(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::ScanMonitors, |state| {
            state.monitors = state.attached.clone();
            if let Some(selected) = &state.selected {
                if !state.monitors.contains(selected) {
                    state.selected = None;
                }
            }
            Ok(())
        })
    }

    fn get_monitors_map(&self) -> BoxFuture<'_, Result<MonitorsMap>> {
        self.call(ServiceOp::GetMonitorsMap, |state| Ok(state.monitors.clone()))
    }

    fn select_monitor(&self, name: String) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::SelectMonitor, move |state| {
            if !state.monitors.contains(&name) {
                return Err(Error::service(
                    ServiceOp::SelectMonitor.name(),
                    format!("unknown monitor {name}"),
                ));
            }
            state.selected = Some(name);
            Ok(())
        })
    }

    fn start_game(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::StartGame, |state| {
            if !state.config.has_watcher_game_path() {
                return Err(Error::service(
                    ServiceOp::StartGame.name(),
                    "game path is not configured",
                ));
            }
            state.game_running = true;
            Ok(())
        })
    }

    fn scan_game_path(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::ScanGamePath, |state| {
            let Some(install) = state.install.clone() else {
                return Err(Error::service(
                    ServiceOp::ScanGamePath.name(),
                    "game installation not found",
                ));
            };
            state.config.valorant.game_path = install.game_path;
            state.config.valorant.launcher_path = install.launcher_path;
            Ok(())
        })
    }

    fn restore_file_permissions(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::RestoreFilePermissions, |_| Ok(()))
    }

    fn create_preset_watcher(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::CreatePresetWatcher, |_| Ok(()))
    }

    fn hide_system_taskbar(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::HideSystemTaskbar, |state| {
            state.taskbar_hidden = true;
            Ok(())
        })
    }

    fn modify_game_config_file(&self) -> BoxFuture<'_, Result<()>> {
        self.call(ServiceOp::ModifyGameConfigFile, |_| Ok(()))
    }

    fn is_elevated(&self) -> BoxFuture<'_, Result<bool>> {
        self.call(ServiceOp::IsElevated, |state| Ok(state.elevated))
    }
}
