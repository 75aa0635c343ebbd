//! Watcher Service Client
//!
//! The command boundary to the external watcher service. Every call is
//! independent: no ordering or atomicity holds between two invocations.

use futures::future::BoxFuture;

use crate::domain::{Configuration, MonitorsMap};
use crate::error::Result;

/// Operations offered by the watcher service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceOp {
    LoadConfiguration,
    SaveConfiguration,
    ResetConfiguration,
    GetWatchingStatus,
    GetGamingStatus,
    ToggleWatching,
    ScanMonitors,
    GetMonitorsMap,
    SelectMonitor,
    StartGame,
    ScanGamePath,
    RestoreFilePermissions,
    CreatePresetWatcher,
    HideSystemTaskbar,
    ModifyGameConfigFile,
    IsElevated,
}

impl ServiceOp {
    /// Command name as exposed by the service
    pub fn name(self) -> &'static str {
        match self {
            ServiceOp::LoadConfiguration => "load_config",
            ServiceOp::SaveConfiguration => "save_config",
            ServiceOp::ResetConfiguration => "reset_config",
            ServiceOp::GetWatchingStatus => "get_watching_status",
            ServiceOp::GetGamingStatus => "get_gaming_status",
            ServiceOp::ToggleWatching => "toggle_watching",
            ServiceOp::ScanMonitors => "scan_monitors",
            ServiceOp::GetMonitorsMap => "get_monitors_map",
            ServiceOp::SelectMonitor => "select_monitor",
            ServiceOp::StartGame => "start_game",
            ServiceOp::ScanGamePath => "scan_game_path",
            ServiceOp::RestoreFilePermissions => "restore_file_permissions",
            ServiceOp::CreatePresetWatcher => "create_preset_watcher",
            ServiceOp::HideSystemTaskbar => "hide_windows_taskbar",
            ServiceOp::ModifyGameConfigFile => "modify_cfg_file",
            ServiceOp::IsElevated => "is_elevated",
        }
    }
}

impl std::fmt::Display for ServiceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Client for the watcher service
///
/// Implementations must report failures as [`crate::error::Error::Service`]
/// so callers can tell them apart from local rejections.
pub trait ServiceClient: Send + Sync {
    fn load_configuration(&self) -> BoxFuture<'_, Result<Configuration>>;

    /// The service only accepts the complete aggregate
    fn save_configuration(&self, config: Configuration) -> BoxFuture<'_, Result<()>>;

    fn reset_configuration_to_defaults(&self) -> BoxFuture<'_, Result<()>>;

    fn get_watching_status(&self) -> BoxFuture<'_, Result<bool>>;

    fn get_gaming_status(&self) -> BoxFuture<'_, Result<bool>>;

    /// Flip the watcher and return its new state
    fn toggle_watching(&self) -> BoxFuture<'_, Result<bool>>;

    fn scan_monitors(&self) -> BoxFuture<'_, Result<()>>;

    fn get_monitors_map(&self) -> BoxFuture<'_, Result<MonitorsMap>>;

    fn select_monitor(&self, name: String) -> BoxFuture<'_, Result<()>>;

    fn start_game(&self) -> BoxFuture<'_, Result<()>>;

    /// Locates the game install and writes it into the persisted configuration
    fn scan_game_path(&self) -> BoxFuture<'_, Result<()>>;

    fn restore_file_permissions(&self) -> BoxFuture<'_, Result<()>>;

    fn create_preset_watcher(&self) -> BoxFuture<'_, Result<()>>;

    fn hide_system_taskbar(&self) -> BoxFuture<'_, Result<()>>;

    fn modify_game_config_file(&self) -> BoxFuture<'_, Result<()>>;

    fn is_elevated(&self) -> BoxFuture<'_, Result<bool>>;
}
