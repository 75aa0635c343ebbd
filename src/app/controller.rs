//! Panel Controller
//!
//! The single entry point a view calls into. Decides which actions are legal
//! right now, runs them against the watcher service, and turns every outcome
//! into state updates, events and notices.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::app::entities::PanelEntities;
use crate::domain::{ConfigEdit, Configuration, ResolutionPreset};
use crate::error::{Error, Result};
use crate::eventing::PanelEvent;
use crate::i18n::{Locale, t, t_detail};
use crate::services::ServiceClient;
use crate::states::{
    LiveStatus, ModeController, ModeTransition, MonitorSelectionGuard, NoticeLevel,
    OperatingMode, PanelSettings, RescanOutcome, StatusPoller, TickOutcome, Verbosity,
    can_enable_watch, can_rescan,
};

/// Controller for one panel session
pub struct PanelController {
    service: Arc<dyn ServiceClient>,
    entities: PanelEntities,
    poller: StatusPoller,
    monitors: MonitorSelectionGuard,
    mode: Mutex<ModeController>,
    events: Sender<PanelEvent>,
    locale: Locale,
}

impl PanelController {
    /// Build a controller and the receiving end of its event channel
    pub fn new(
        service: Arc<dyn ServiceClient>,
        settings: &PanelSettings,
    ) -> (Self, Receiver<PanelEvent>) {
        let (events, rx) = crossbeam_channel::unbounded();
        let entities = PanelEntities::init(settings.notice_capacity);
        let poller = StatusPoller::new(
            service.clone(),
            entities.status.clone(),
            events.clone(),
            settings.poll_interval(),
        );
        let monitors = MonitorSelectionGuard::new(service.clone(), entities.status.clone());

        let controller = Self {
            service,
            entities,
            poller,
            monitors,
            mode: Mutex::new(ModeController::new()),
            events,
            locale: settings.locale(),
        };
        (controller, rx)
    }

    // ==================== Lifecycle ====================

    /// Load configuration and status, probe elevation, then start polling
    ///
    /// A failing step is reported and the remaining steps still run. The
    /// first failure is returned.
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing panel controller");
        let mut first_error = None;

        match self.entities.draft.load(&*self.service).await {
            Ok(config) => {
                self.entities.status.set_config(config);
                self.emit_draft();
            }
            Err(e) => {
                first_error.get_or_insert(self.fail("config-load-failed", e));
            }
        }

        if let Err(e) = self.poller.refresh_now(Verbosity::Verbose).await {
            first_error.get_or_insert(self.fail("init-failed", e));
        }

        match self.service.is_elevated().await {
            Ok(elevated) => {
                self.entities.status.set_elevated(elevated);
                info!(elevated, "Service privilege level probed");
            }
            Err(e) => warn!(error = %e, "Failed to query service privileges"),
        }

        self.poller.start()?;
        self.emit_status();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stop polling; a batch already running still lands
    pub fn teardown(&self) {
        self.poller.stop();
        info!("Panel controller torn down");
    }

    // ==================== Accessors ====================

    pub fn entities(&self) -> &PanelEntities {
        &self.entities
    }

    pub fn poller(&self) -> &StatusPoller {
        &self.poller
    }

    pub fn status(&self) -> LiveStatus {
        self.entities.status.snapshot()
    }

    pub fn draft(&self) -> Configuration {
        self.entities.draft.draft()
    }

    pub fn saved(&self) -> Configuration {
        self.entities.draft.saved()
    }

    pub fn is_dirty(&self) -> bool {
        self.entities.draft.is_dirty()
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode.lock().mode()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Whether the enable switch should be offered
    pub fn can_enable_watch(&self) -> bool {
        let selected = self.entities.status.selected_monitor();
        can_enable_watch(self.mode(), selected.as_deref())
    }

    /// Whether the rescan button should be offered
    pub fn can_rescan(&self) -> bool {
        can_rescan(self.entities.status.is_watching())
    }

    /// Freshest configuration known: the last status batch, else the saved one
    pub fn latest_config(&self) -> Configuration {
        self.entities
            .status
            .config()
            .unwrap_or_else(|| self.entities.draft.saved())
    }

    // ==================== Draft Editing ====================

    pub fn update_field(&self, edit: ConfigEdit) {
        self.entities.draft.update_field(edit);
        self.emit_draft();
    }

    pub fn apply_preset(&self, preset: &ResolutionPreset) {
        self.entities.draft.apply_preset(preset);
        self.emit_draft();
    }

    /// Persist the draft
    pub async fn apply_config(&self) -> Result<()> {
        match self.entities.draft.commit(&*self.service).await {
            Ok(()) => {
                self.entities.status.set_config(self.entities.draft.saved());
                self.notify(NoticeLevel::Success, t(self.locale, "config-saved"));
                self.emit_draft();
                Ok(())
            }
            Err(e) => Err(self.fail("config-save-failed", e)),
        }
    }

    /// Drop unsaved edits
    pub fn discard_changes(&self) {
        self.entities.draft.discard();
        self.notify(NoticeLevel::Info, t(self.locale, "config-discarded"));
        self.emit_draft();
    }

    /// Reload from the service, replacing both snapshots
    pub async fn reload_config(&self) -> Result<Configuration> {
        match self.entities.draft.load(&*self.service).await {
            Ok(config) => {
                self.entities.status.set_config(config.clone());
                self.notify(NoticeLevel::Success, t(self.locale, "config-loaded"));
                self.emit_draft();
                Ok(config)
            }
            Err(e) => Err(self.fail("config-load-failed", e)),
        }
    }

    /// Ask the service to restore its defaults, then reload
    pub async fn reset_to_defaults(&self) -> Result<Configuration> {
        if let Err(e) = self.service.reset_configuration_to_defaults().await {
            return Err(self.fail("config-reset-failed", e));
        }
        match self.entities.draft.load(&*self.service).await {
            Ok(config) => {
                self.entities.status.set_config(config.clone());
                self.notify(NoticeLevel::Success, t(self.locale, "config-reset"));
                self.emit_draft();
                Ok(config)
            }
            Err(e) => Err(self.fail("config-load-failed", e)),
        }
    }

    // ==================== Status ====================

    /// User-requested refresh; errors are shown
    pub async fn refresh_status(&self) -> Result<TickOutcome> {
        match self.poller.refresh_now(Verbosity::Verbose).await {
            Ok(outcome) => {
                self.notify(NoticeLevel::Success, t(self.locale, "status-refreshed"));
                Ok(outcome)
            }
            Err(e) => Err(self.fail("status-refresh-failed", e)),
        }
    }

    // ==================== Mode & Watcher ====================

    /// Switch operating mode, running the first-entry monitor scan if needed
    pub async fn set_mode(&self, mode: OperatingMode) -> Result<ModeTransition> {
        let monitors = self.entities.status.monitors();
        let transition = self.mode.lock().set_mode(mode, &monitors);
        if transition.changed {
            let _ = self.events.send(PanelEvent::ModeChanged(mode));
        }

        if transition.scan_monitors {
            let scanned = self.rescan_monitors().await;
            self.mode.lock().scan_finished();
            scanned?;
        }
        Ok(transition)
    }

    /// Turn the watcher on or off
    ///
    /// The service only offers a toggle, so nothing is sent when the mirror
    /// already shows the requested state.
    pub async fn set_watching(&self, enable: bool) -> Result<bool> {
        let status = self.entities.status.snapshot();
        if status.watching == enable {
            debug!(enable, "Watcher already in requested state");
            let key = if enable {
                "watcher-already-on"
            } else {
                "watcher-already-off"
            };
            self.notify(NoticeLevel::Info, t(self.locale, key));
            return Ok(enable);
        }

        let allowed = self
            .mode
            .lock()
            .check_toggle(enable, status.selected_monitor.as_deref());
        if let Err(e) = allowed {
            return Err(self.fail("monitor-select-first", e));
        }

        match self.service.toggle_watching().await {
            Ok(watching) => {
                self.entities.status.set_watching(watching);
                let key = if watching {
                    "watcher-started"
                } else {
                    "watcher-stopped"
                };
                info!(watching, "Watcher toggled");
                self.notify(NoticeLevel::Success, t(self.locale, key));
                self.emit_status();
                let _ = self.poller.refresh_now(Verbosity::Silent).await;
                Ok(watching)
            }
            Err(e) => Err(self.fail("watcher-toggle-failed", e)),
        }
    }

    // ==================== Monitors ====================

    pub async fn rescan_monitors(&self) -> Result<RescanOutcome> {
        match self.monitors.rescan().await {
            Ok(outcome) => {
                self.notify(NoticeLevel::Success, t(self.locale, "monitors-refreshed"));
                if let Some(cleared) = &outcome.cleared_selection {
                    self.notify(
                        NoticeLevel::Warn,
                        t_detail(self.locale, "monitor-selection-cleared", cleared),
                    );
                }
                self.emit_status();
                Ok(outcome)
            }
            Err(e) => Err(self.fail("monitors-scan-failed", e)),
        }
    }

    pub async fn select_monitor(&self, name: &str) -> Result<()> {
        match self.monitors.select(name).await {
            Ok(true) => {
                self.notify(
                    NoticeLevel::Success,
                    t_detail(self.locale, "monitor-selected", name),
                );
                self.emit_status();
                Ok(())
            }
            Ok(false) => {
                self.notify(
                    NoticeLevel::Warn,
                    t_detail(self.locale, "monitor-selection-cleared", name),
                );
                self.emit_status();
                Ok(())
            }
            Err(e) if self.entities.status.is_watching() && e.is_precondition() => {
                Err(self.fail("monitor-locked", e))
            }
            Err(e) => Err(self.fail("monitor-select-failed", e)),
        }
    }

    // ==================== Game & Tools ====================

    pub async fn start_game(&self) -> Result<()> {
        if !self.latest_config().has_watcher_game_path() {
            return Err(self.fail(
                "game-path-required",
                Error::precondition("the watcher game path is not set"),
            ));
        }
        self.run_action(self.service.start_game(), "game-started", "game-start-failed")
            .await
    }

    /// Store a new watcher game path in the persisted configuration
    ///
    /// Loads the service's current value and saves it back with only the path
    /// changed. These are two separate calls and are not atomic.
    pub async fn set_watcher_game_path(&self, path: &str) -> Result<Configuration> {
        let path = path.trim();
        if path.is_empty() {
            return Err(self.fail(
                "game-path-set-failed",
                Error::precondition("the game path is empty"),
            ));
        }

        let mut current = match self.service.load_configuration().await {
            Ok(config) => config,
            Err(e) => return Err(self.fail("game-path-set-failed", e)),
        };
        current.watcher.game_path = path.to_string();
        if let Err(e) = self.service.save_configuration(current.clone()).await {
            return Err(self.fail("game-path-set-failed", e));
        }

        self.adopt_persisted(current.clone());
        self.notify(NoticeLevel::Success, t(self.locale, "game-path-set"));
        Ok(current)
    }

    /// Let the service locate the game; it writes the result into its config
    pub async fn scan_game_path(&self) -> Result<Configuration> {
        if let Err(e) = self.service.scan_game_path().await {
            return Err(self.fail("game-scan-failed", e));
        }
        match self.service.load_configuration().await {
            Ok(config) => {
                self.adopt_persisted(config.clone());
                self.notify(NoticeLevel::Success, t(self.locale, "game-scan-done"));
                Ok(config)
            }
            Err(e) => Err(self.fail("config-load-failed", e)),
        }
    }

    pub async fn create_preset_watcher(&self) -> Result<()> {
        self.require_install_path()?;
        self.run_action(
            self.service.create_preset_watcher(),
            "preset-watcher-created",
            "preset-watcher-failed",
        )
        .await
    }

    pub async fn modify_game_config_file(&self) -> Result<()> {
        self.require_install_path()?;
        self.run_action(
            self.service.modify_game_config_file(),
            "cfg-modified",
            "cfg-failed",
        )
        .await
    }

    pub async fn restore_file_permissions(&self) -> Result<()> {
        self.run_action(
            self.service.restore_file_permissions(),
            "permissions-restored",
            "permissions-failed",
        )
        .await
    }

    pub async fn hide_system_taskbar(&self) -> Result<()> {
        self.run_action(
            self.service.hide_system_taskbar(),
            "taskbar-hidden",
            "taskbar-failed",
        )
        .await
    }

    // ==================== Internals ====================

    fn require_install_path(&self) -> Result<()> {
        if self.latest_config().has_valorant_game_path() {
            return Ok(());
        }
        Err(self.fail(
            "install-path-required",
            Error::precondition("the game install path is not known"),
        ))
    }

    async fn run_action(
        &self,
        action: BoxFuture<'_, Result<()>>,
        success_key: &str,
        failure_key: &str,
    ) -> Result<()> {
        match action.await {
            Ok(()) => {
                self.notify(NoticeLevel::Success, t(self.locale, success_key));
                Ok(())
            }
            Err(e) => Err(self.fail(failure_key, e)),
        }
    }

    /// The service persisted a configuration on its own
    fn adopt_persisted(&self, config: Configuration) {
        self.entities.status.set_config(config.clone());
        if !self.entities.draft.rebase(config) {
            info!("Unsaved edits kept after external configuration change");
        }
        self.emit_draft();
        self.emit_status();
    }

    fn notify(&self, level: NoticeLevel, message: String) {
        let notice = self.entities.notices.lock().push(level, message);
        let _ = self.events.send(PanelEvent::Notice(notice));
    }

    /// Report `error` to the user and hand it back
    fn fail(&self, key: &str, error: Error) -> Error {
        warn!(error = %error, notice = key, "Panel action failed");
        self.notify(error.notice_level(), t_detail(self.locale, key, &error));
        error
    }

    fn emit_draft(&self) {
        let _ = self.events.send(PanelEvent::DraftChanged {
            dirty: self.entities.draft.is_dirty(),
        });
    }

    fn emit_status(&self) {
        let _ = self
            .events
            .send(PanelEvent::StatusChanged(self.entities.status.snapshot()));
    }
}

impl std::fmt::Debug for PanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelController")
            .field("mode", &self.mode())
            .field("dirty", &self.is_dirty())
            .field("poller", &self.poller)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GAME_PRESETS, MonitorsMap, ProfileKind, ResolutionField, ResolutionProfile};
    use crate::services::{GameInstall, ServiceOp, SimulatedService};

    fn settings() -> PanelSettings {
        PanelSettings {
            locale: Some("en".to_string()),
            ..Default::default()
        }
    }

    fn configured() -> Configuration {
        let mut config = Configuration {
            desktop: ResolutionProfile::new(1920, 1080, 144),
            game: ResolutionProfile::new(1568, 1080, 144),
            ..Default::default()
        };
        config.watcher.game_path = "C:/Riot Games/VALORANT/live/VALORANT.exe".to_string();
        config
    }

    fn single_monitor() -> MonitorsMap {
        [("DP-1", "NVIDIA RTX 3080")].into_iter().collect()
    }

    async fn ready(service: SimulatedService) -> (Arc<SimulatedService>, PanelController) {
        let service = Arc::new(service);
        let (controller, _rx) = PanelController::new(service.clone(), &settings());
        controller.initialize().await.expect("initialize");
        (service, controller)
    }

    fn last_notice(controller: &PanelController) -> (NoticeLevel, String) {
        let notice = controller
            .entities()
            .notices
            .lock()
            .last()
            .cloned()
            .expect("a notice");
        (notice.level, notice.message)
    }

    #[tokio::test]
    async fn initialize_loads_everything_and_starts_polling() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_elevated(true),
        )
        .await;

        assert_eq!(controller.saved(), configured());
        assert!(!controller.is_dirty());
        assert_eq!(controller.status().elevated, Some(true));
        assert_eq!(controller.status().config, Some(configured()));
        assert!(controller.poller().is_running());
        assert_eq!(service.calls(ServiceOp::IsElevated), 1);
        controller.teardown();
        assert!(!controller.poller().is_running());
    }

    #[tokio::test]
    async fn initialize_survives_a_failed_load() {
        let service = Arc::new(SimulatedService::new().with_config(configured()));
        service.fail(ServiceOp::LoadConfiguration);
        let (controller, _rx) = PanelController::new(service.clone(), &settings());

        let err = controller.initialize().await.expect_err("load fails");

        assert!(matches!(err, Error::Service { .. }));
        assert!(!controller.entities().draft.is_loaded());
        assert!(controller.poller().is_running());
        assert_eq!(service.calls(ServiceOp::IsElevated), 1);
        controller.teardown();
    }

    #[tokio::test]
    async fn multi_monitor_enable_without_selection_is_rejected_locally() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_attached_monitors(single_monitor()),
        )
        .await;
        controller
            .set_mode(OperatingMode::MultiMonitor)
            .await
            .expect("mode");

        let err = controller.set_watching(true).await.expect_err("no monitor");

        assert!(err.is_precondition());
        assert_eq!(service.calls(ServiceOp::ToggleWatching), 0);
        let (level, message) = last_notice(&controller);
        assert_eq!(level, NoticeLevel::Warn);
        assert!(message.starts_with("Select a monitor first"));
        controller.teardown();
    }

    #[tokio::test]
    async fn multi_monitor_enable_with_selection_reaches_service() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_attached_monitors(single_monitor()),
        )
        .await;
        controller
            .set_mode(OperatingMode::MultiMonitor)
            .await
            .expect("mode");
        controller.select_monitor("DP-1").await.expect("select");

        assert!(controller.set_watching(true).await.expect("enable"));

        assert_eq!(service.calls(ServiceOp::ToggleWatching), 1);
        assert!(service.is_watching());
        assert!(controller.status().watching);
        controller.teardown();
    }

    #[tokio::test]
    async fn default_mode_enable_has_no_local_precondition() {
        let (service, controller) = ready(SimulatedService::new().with_config(configured())).await;

        assert!(controller.can_enable_watch());
        assert!(controller.set_watching(true).await.expect("enable"));
        assert!(!controller.set_watching(false).await.expect("disable"));
        assert_eq!(service.calls(ServiceOp::ToggleWatching), 2);
        controller.teardown();
    }

    #[tokio::test]
    async fn requesting_current_state_issues_no_toggle() {
        let (service, controller) = ready(SimulatedService::new().with_config(configured())).await;

        assert!(!controller.set_watching(false).await.expect("already off"));
        assert_eq!(service.calls(ServiceOp::ToggleWatching), 0);
        assert_eq!(
            last_notice(&controller),
            (NoticeLevel::Info, "Watcher is already stopped".to_string())
        );
        controller.teardown();
    }

    #[tokio::test]
    async fn service_side_toggle_failure_is_surfaced() {
        let (service, controller) = ready(SimulatedService::new()).await;

        let err = controller.set_watching(true).await.expect_err("no game path");

        assert!(!err.is_precondition());
        assert_eq!(service.calls(ServiceOp::ToggleWatching), 1);
        assert!(!controller.status().watching);
        assert_eq!(last_notice(&controller).0, NoticeLevel::Error);
        controller.teardown();
    }

    #[tokio::test]
    async fn entering_multi_monitor_scans_exactly_once() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_attached_monitors(single_monitor()),
        )
        .await;

        let entered = controller
            .set_mode(OperatingMode::MultiMonitor)
            .await
            .expect("mode");
        assert!(entered.scan_monitors);
        assert_eq!(service.calls(ServiceOp::ScanMonitors), 1);
        assert_eq!(controller.status().monitors, single_monitor());

        let again = controller
            .set_mode(OperatingMode::MultiMonitor)
            .await
            .expect("mode");
        assert_eq!(again, ModeTransition::default());
        assert_eq!(service.calls(ServiceOp::ScanMonitors), 1);
        controller.teardown();
    }

    #[tokio::test]
    async fn select_while_watching_is_locked() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_attached_monitors(single_monitor()),
        )
        .await;
        controller.rescan_monitors().await.expect("rescan");
        controller.set_watching(true).await.expect("enable");

        let err = controller.select_monitor("DP-1").await.expect_err("locked");

        assert!(err.is_precondition());
        assert_eq!(service.calls(ServiceOp::SelectMonitor), 0);
        assert!(!controller.can_rescan());
        assert!(last_notice(&controller).1.starts_with("Stop the watcher"));
        controller.teardown();
    }

    #[tokio::test]
    async fn rescan_drops_vanished_selection() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_attached_monitors(single_monitor()),
        )
        .await;
        controller.rescan_monitors().await.expect("rescan");
        controller.select_monitor("DP-1").await.expect("select");

        service.set_attached_monitors([("DP-2", "NVIDIA RTX 3080")].into_iter().collect());
        controller.rescan_monitors().await.expect("rescan");

        assert_eq!(controller.status().selected_monitor, None);
        assert_eq!(last_notice(&controller).0, NoticeLevel::Warn);
        controller.teardown();
    }

    #[tokio::test]
    async fn apply_and_discard_round_trip() {
        let (service, controller) = ready(SimulatedService::new().with_config(configured())).await;

        controller.update_field(ConfigEdit::resolution(
            ProfileKind::Game,
            ResolutionField::Width,
            1440,
        ));
        assert!(controller.is_dirty());
        controller.discard_changes();
        assert!(!controller.is_dirty());

        controller.apply_preset(&GAME_PRESETS[1]);
        controller.apply_config().await.expect("apply");
        assert!(!controller.is_dirty());
        assert_eq!(service.config().game.height, 1024);
        assert_eq!(controller.status().config.map(|c| c.game.width), Some(1280));
        controller.teardown();
    }

    #[tokio::test]
    async fn failed_apply_keeps_draft_and_reports_error() {
        let (service, controller) = ready(SimulatedService::new().with_config(configured())).await;
        controller.update_field(ConfigEdit::Debug(true));
        service.fail(ServiceOp::SaveConfiguration);

        assert!(controller.apply_config().await.is_err());

        assert!(controller.is_dirty());
        assert!(!controller.saved().development.debug);
        assert_eq!(last_notice(&controller).0, NoticeLevel::Error);
        controller.teardown();
    }

    #[tokio::test]
    async fn start_game_requires_watcher_path() {
        let (service, controller) = ready(SimulatedService::new()).await;

        assert!(controller.start_game().await.is_err());
        assert_eq!(service.calls(ServiceOp::StartGame), 0);

        controller
            .set_watcher_game_path("C:/Games/game.exe")
            .await
            .expect("set path");
        controller.start_game().await.expect("start");
        assert_eq!(service.calls(ServiceOp::StartGame), 1);
        controller.teardown();
    }

    #[tokio::test]
    async fn external_path_change_keeps_dirty_draft() {
        let (service, controller) = ready(SimulatedService::new().with_config(configured())).await;
        controller.update_field(ConfigEdit::resolution(
            ProfileKind::Desktop,
            ResolutionField::RefreshRate,
            240,
        ));

        let persisted = controller
            .set_watcher_game_path("D:/Games/other.exe")
            .await
            .expect("set path");

        assert_eq!(service.config(), persisted);
        assert_eq!(controller.saved().watcher.game_path, "D:/Games/other.exe");
        assert_eq!(controller.draft().desktop.refresh_rate_hz, 240);
        assert!(controller.is_dirty());
        controller.teardown();
    }

    #[tokio::test]
    async fn scan_game_path_unlocks_install_tools() {
        let (service, controller) = ready(SimulatedService::new().with_game_install(GameInstall {
            game_path: "C:/Riot Games/VALORANT".to_string(),
            launcher_path: "C:/Riot Games/Riot Client/RiotClientServices.exe".to_string(),
        }))
        .await;

        assert!(controller.create_preset_watcher().await.is_err());
        assert!(controller.modify_game_config_file().await.is_err());
        assert_eq!(service.calls(ServiceOp::CreatePresetWatcher), 0);

        let config = controller.scan_game_path().await.expect("scan");
        assert_eq!(config.valorant.game_path, "C:/Riot Games/VALORANT");
        assert_eq!(controller.draft().valorant.game_path, "C:/Riot Games/VALORANT");

        controller.create_preset_watcher().await.expect("preset");
        controller.modify_game_config_file().await.expect("cfg");
        assert_eq!(service.calls(ServiceOp::CreatePresetWatcher), 1);
        controller.teardown();
    }

    #[tokio::test]
    async fn scan_adopts_external_changes_without_losing_edits() {
        let (service, controller) = ready(
            SimulatedService::new()
                .with_config(configured())
                .with_game_install(GameInstall {
                    game_path: "C:/Riot Games/VALORANT".to_string(),
                    launcher_path: "C:/Riot Games/Riot Client/RiotClientServices.exe"
                        .to_string(),
                }),
        )
        .await;
        controller.update_field(ConfigEdit::Debug(true));

        let mut external = configured();
        external.desktop = ResolutionProfile::new(2560, 1440, 165);
        service.replace_config(external);
        let config = controller.scan_game_path().await.expect("scan");

        assert_eq!(config.desktop.width, 2560);
        assert_eq!(controller.saved(), config);
        assert_eq!(controller.draft().desktop.width, 1920);
        assert!(controller.draft().development.debug);
        assert!(controller.is_dirty());
        controller.teardown();
    }

    #[tokio::test]
    async fn reset_to_defaults_reloads_both_snapshots() {
        let (service, controller) = ready(SimulatedService::new().with_config(configured())).await;
        controller.update_field(ConfigEdit::Debug(true));

        let config = controller.reset_to_defaults().await.expect("reset");

        assert_eq!(config, Configuration::default());
        assert_eq!(service.config(), Configuration::default());
        assert_eq!(controller.draft(), Configuration::default());
        assert!(!controller.is_dirty());
        controller.teardown();
    }

    #[tokio::test]
    async fn tools_without_preconditions_call_through() {
        let (service, controller) = ready(SimulatedService::new()).await;

        controller.hide_system_taskbar().await.expect("taskbar");
        controller.restore_file_permissions().await.expect("permissions");

        assert!(service.is_taskbar_hidden());
        assert_eq!(service.calls(ServiceOp::RestoreFilePermissions), 1);
        controller.teardown();
    }

    #[tokio::test]
    async fn events_reach_the_receiver() {
        let service = Arc::new(SimulatedService::new().with_config(configured()));
        let (controller, rx) = PanelController::new(service, &settings());
        controller.initialize().await.expect("initialize");

        controller.update_field(ConfigEdit::Debug(true));
        let kinds: Vec<&str> = rx.try_iter().map(|event| event.kind()).collect();

        assert!(kinds.contains(&"status"));
        assert_eq!(kinds.last(), Some(&"draft"));
        controller.teardown();
    }
}
