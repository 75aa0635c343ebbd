//! Res Panel - Main Entry Point
//!
//! Headless panel session for the resolution watcher service

use anyhow::Context;
use res_panel::app::application::run_app;
use res_panel::constants::LOG_FILE_PREFIX;
use res_panel::helpers::{get_or_create_data_dir, is_development};
use res_panel::states::PanelSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> anyhow::Result<()> {
    let (settings, load_error) = match PanelSettings::try_load() {
        Ok(settings) => (settings, None),
        Err(e) => (PanelSettings::default(), Some(e)),
    };
    let _guard = init_tracing(&settings)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Res Panel...");
    if let Some(e) = load_error {
        tracing::error!(error = %e, "Failed to load settings, using defaults");
    }

    run_app(settings).context("panel session failed")?;
    Ok(())
}

/// Console logging, plus a daily rolling file when enabled in the settings
fn init_tracing(settings: &PanelSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let default_level = if is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::from_default_env().add_directive(default_level.into());

    let console = fmt::layer().with_timer(LocalTime::rfc_3339());

    let (file, guard) = if settings.log_to_file {
        let dir = get_or_create_data_dir().context("log directory unavailable")?;
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_timer(LocalTime::rfc_3339())
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();
    Ok(guard)
}
