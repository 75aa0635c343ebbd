//! Application - Runtime Setup and Headless Session
//!
//! Builds the tokio runtime, wires a [`PanelController`] to a watcher service
//! and drives one session. Without a renderer attached, panel events are
//! drained into the log.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use tracing::{info, warn};

use crate::app::controller::PanelController;
use crate::domain::{GAME_PRESETS, MonitorsMap};
use crate::error::Result;
use crate::eventing::PanelEvent;
use crate::services::{GameInstall, ServiceClient, SimulatedService};
use crate::states::{NoticeLevel, OperatingMode, PanelSettings};

/// Run a panel session against the simulated watcher service
pub fn run_app(settings: PanelSettings) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let service: Arc<dyn ServiceClient> = Arc::new(demo_service());
    let (controller, events) = PanelController::new(service, &settings);
    let drain = spawn_event_drain(events);

    info!(
        locale = controller.locale().display_name(),
        interval_ms = controller.poller().period().as_millis() as u64,
        "Panel session starting"
    );
    rt.block_on(run_session(&controller));
    controller.teardown();

    let history = controller.entities().notice_history();
    let errors = history
        .iter()
        .filter(|notice| notice.level == NoticeLevel::Error)
        .count();
    info!(notices = history.len(), errors, "Panel session finished");

    // Closing the channel ends the drain thread
    drop(controller);
    rt.shutdown_timeout(Duration::from_secs(1));
    if drain.join().is_err() {
        warn!("Event drain thread panicked");
    }
    Ok(())
}

fn demo_service() -> SimulatedService {
    let monitors: MonitorsMap = [
        ("\\\\.\\DISPLAY1", "NVIDIA GeForce RTX 3080"),
        ("\\\\.\\DISPLAY2", "NVIDIA GeForce RTX 3080"),
    ]
    .into_iter()
    .collect();

    SimulatedService::new()
        .with_attached_monitors(monitors)
        .with_elevated(true)
        .with_game_install(GameInstall {
            game_path: "C:\\Riot Games\\VALORANT\\live".to_string(),
            launcher_path: "C:\\Riot Games\\Riot Client\\RiotClientServices.exe".to_string(),
        })
        .with_latency(Duration::from_millis(50))
}

/// A typical first-run walk through the panel
///
/// Every step reports its own outcome as a notice, so failures are only
/// logged here and the session carries on.
async fn run_session(controller: &PanelController) {
    if let Err(e) = controller.initialize().await {
        warn!(error = %e, "Initialization incomplete");
    }

    if let Err(e) = controller.scan_game_path().await {
        warn!(error = %e, "Game path scan failed");
    }
    if let Err(e) = controller
        .set_watcher_game_path("C:\\Riot Games\\VALORANT\\live\\VALORANT.exe")
        .await
    {
        warn!(error = %e, "Setting the watcher game path failed");
    }

    controller.apply_preset(&GAME_PRESETS[0]);
    if let Err(e) = controller.apply_config().await {
        warn!(error = %e, "Applying the preset failed");
    }

    if let Err(e) = controller.set_mode(OperatingMode::MultiMonitor).await {
        warn!(error = %e, "Monitor scan failed");
    }
    let first = controller
        .status()
        .monitors
        .sorted_names()
        .first()
        .map(|name| name.to_string());
    if let Some(name) = first {
        if let Err(e) = controller.select_monitor(&name).await {
            warn!(error = %e, "Monitor selection failed");
        }
    }

    if let Err(e) = controller.set_watching(true).await {
        warn!(error = %e, "Enabling the watcher failed");
    }
    if let Err(e) = controller.start_game().await {
        warn!(error = %e, "Starting the game failed");
    }

    // Let the poller run a few batches
    let period = controller.poller().period();
    tokio::time::sleep(period * 3 + period / 2).await;

    if let Err(e) = controller.set_watching(false).await {
        warn!(error = %e, "Disabling the watcher failed");
    }
}

fn spawn_event_drain(events: Receiver<PanelEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for event in events.iter() {
            match event {
                PanelEvent::Notice(notice) => info!(
                    level = notice.level.label(),
                    id = notice.id,
                    "{}",
                    notice.message
                ),
                PanelEvent::StatusChanged(status) => info!(
                    watching = status.watching,
                    gaming = status.gaming,
                    monitors = status.monitors.len(),
                    selected = ?status.selected_monitor,
                    "Status changed"
                ),
                PanelEvent::DraftChanged { dirty } => info!(dirty, "Draft changed"),
                PanelEvent::ModeChanged(mode) => info!(?mode, "Mode changed"),
            }
        }
    })
}
