//! Status Poller
//!
//! Refreshes the [`StatusMirror`] on a fixed interval.
//!
//! ## Pattern
//!
//! ```text
//! timer task ──tick──▶ spawn(batch) ──▶ guard taken? ──yes──▶ dropped
//!                                            │
//!                                            no
//!                                            ▼
//!                        join(watching, gaming, config) ──▶ mirror
//! ```
//!
//! Each batch runs in its own task, so [`StatusPoller::stop`] only ends the
//! recurrence. A batch that is already running finishes and is applied.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::eventing::PanelEvent;
use crate::services::ServiceClient;
use crate::states::{StatusBatch, StatusMirror};

/// How refresh failures are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Failures are logged only (background ticks)
    Silent,
    /// Failures are returned to the caller for display
    Verbose,
}

/// Result of one refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A batch ran; `failures` of its three fetches failed
    Completed { failures: usize },
    /// Another batch was still in flight, nothing was done
    Skipped,
}

struct PollerInner {
    service: Arc<dyn ServiceClient>,
    mirror: StatusMirror,
    events: Sender<PanelEvent>,
    period: Duration,
    in_flight: AtomicBool,
    timer: Mutex<Option<JoinHandle<()>>>,
    completed: AtomicU64,
    skipped: AtomicU64,
}

/// Held while a batch runs; releases the flag on drop
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PollerInner {
    async fn run_batch(&self, verbosity: Verbosity) -> Result<TickOutcome> {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            debug!("Previous status batch still in flight, skipping");
            return match verbosity {
                Verbosity::Silent => Ok(TickOutcome::Skipped),
                Verbosity::Verbose => Err(Error::RefreshInFlight),
            };
        };

        let (watching, gaming, config) = tokio::join!(
            self.service.get_watching_status(),
            self.service.get_gaming_status(),
            self.service.load_configuration(),
        );

        let mut report = self.mirror.apply_batch(StatusBatch {
            watching,
            gaming,
            config,
        });
        self.completed.fetch_add(1, Ordering::Relaxed);

        if report.changed {
            let _ = self
                .events
                .send(PanelEvent::StatusChanged(self.mirror.snapshot()));
        }

        let failures = report.errors.len();
        for error in &report.errors {
            warn!(error = %error, ?verbosity, "Status refresh fetch failed");
        }

        match verbosity {
            Verbosity::Verbose if failures > 0 => Err(report.errors.remove(0)),
            _ => Ok(TickOutcome::Completed { failures }),
        }
    }
}

impl Drop for PollerInner {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.abort();
        }
    }
}

/// Periodic status refresher, one per session
#[derive(Clone)]
pub struct StatusPoller {
    inner: Arc<PollerInner>,
}

impl StatusPoller {
    pub fn new(
        service: Arc<dyn ServiceClient>,
        mirror: StatusMirror,
        events: Sender<PanelEvent>,
        period: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                service,
                mirror,
                events,
                period,
                in_flight: AtomicBool::new(false),
                timer: Mutex::new(None),
                completed: AtomicU64::new(0),
                skipped: AtomicU64::new(0),
            }),
        }
    }

    /// Install the timer, replacing any existing one
    ///
    /// Must be called from within a tokio runtime. The first tick fires one
    /// period after this call.
    pub fn start(&self) -> Result<()> {
        let handle = Handle::try_current().map_err(|e| Error::Invalid {
            message: format!("status poller needs a tokio runtime: {e}"),
        })?;

        let mut timer = self.inner.timer.lock();
        if let Some(previous) = timer.take() {
            previous.abort();
            debug!("Replacing running status poller timer");
        }

        let period = self.inner.period;
        let weak: Weak<PollerInner> = Arc::downgrade(&self.inner);
        let spawner = handle.clone();
        *timer = Some(handle.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                spawner.spawn(async move {
                    // Silent batches never return an error
                    let _ = inner.run_batch(Verbosity::Silent).await;
                });
            }
        }));

        info!(interval_ms = period.as_millis() as u64, "Status polling started");
        Ok(())
    }

    /// Cancel the timer; an in-flight batch is left to finish
    pub fn stop(&self) {
        if let Some(timer) = self.inner.timer.lock().take() {
            timer.abort();
            info!("Status polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.timer.lock().is_some()
    }

    /// Run one batch now without touching the timer
    pub async fn refresh_now(&self, verbosity: Verbosity) -> Result<TickOutcome> {
        self.inner.run_batch(verbosity).await
    }

    /// The timer's unit of work
    pub async fn tick(&self) -> TickOutcome {
        self.inner
            .run_batch(Verbosity::Silent)
            .await
            .unwrap_or(TickOutcome::Completed { failures: 0 })
    }

    /// A batch is currently running
    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Batches that ran to completion
    pub fn completed_batches(&self) -> u64 {
        self.inner.completed.load(Ordering::Relaxed)
    }

    /// Ticks dropped by the re-entrancy guard
    pub fn skipped_ticks(&self) -> u64 {
        self.inner.skipped.load(Ordering::Relaxed)
    }

    pub fn period(&self) -> Duration {
        self.inner.period
    }

    pub fn mirror(&self) -> &StatusMirror {
        &self.inner.mirror
    }
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("period", &self.inner.period)
            .field("running", &self.is_running())
            .field("in_flight", &self.is_in_flight())
            .field("completed", &self.completed_batches())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ServiceOp, SimulatedService};
    use crossbeam_channel::{Receiver, unbounded};

    const PERIOD: Duration = Duration::from_millis(2000);

    fn poller_with(service: Arc<SimulatedService>) -> (StatusPoller, Receiver<PanelEvent>) {
        let (tx, rx) = unbounded();
        let poller = StatusPoller::new(service, StatusMirror::new(), tx, PERIOD);
        (poller, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_tick_is_a_no_op() {
        let service = Arc::new(SimulatedService::new().with_latency(Duration::from_millis(500)));
        let (poller, _rx) = poller_with(service.clone());

        let first = poller.tick();
        tokio::pin!(first);
        assert!(futures::poll!(&mut first).is_pending());
        assert!(poller.is_in_flight());

        assert_eq!(poller.tick().await, TickOutcome::Skipped);
        assert_eq!(service.calls(ServiceOp::GetWatchingStatus), 1);

        assert_eq!(first.await, TickOutcome::Completed { failures: 0 });
        assert!(!poller.is_in_flight());
        assert_eq!(poller.completed_batches(), 1);
        assert_eq!(poller.skipped_ticks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn verbose_refresh_reports_busy_poller() {
        let service = Arc::new(SimulatedService::new().with_latency(Duration::from_millis(500)));
        let (poller, _rx) = poller_with(service);

        let first = poller.tick();
        tokio::pin!(first);
        assert!(futures::poll!(&mut first).is_pending());

        let busy = poller.refresh_now(Verbosity::Verbose).await;
        assert!(matches!(busy, Err(Error::RefreshInFlight)));
        first.await;
    }

    #[tokio::test]
    async fn one_failed_fetch_does_not_block_the_others() {
        let service = Arc::new(SimulatedService::new());
        service.fail(ServiceOp::GetGamingStatus);
        let (poller, rx) = poller_with(service.clone());

        let outcome = poller.refresh_now(Verbosity::Silent).await.expect("silent");
        assert_eq!(outcome, TickOutcome::Completed { failures: 1 });
        assert!(poller.mirror().config().is_some());
        assert!(matches!(rx.try_recv(), Ok(PanelEvent::StatusChanged(_))));

        let err = poller
            .refresh_now(Verbosity::Verbose)
            .await
            .expect_err("verbose surfaces the failure");
        assert!(matches!(err, Error::Service { operation: "get_gaming_status", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_ticks_once_per_period() {
        let service = Arc::new(SimulatedService::new());
        let (poller, _rx) = poller_with(service.clone());

        poller.start().expect("start");
        tokio::time::sleep(PERIOD * 5 + Duration::from_millis(100)).await;

        assert_eq!(poller.completed_batches(), 5);
        assert_eq!(service.calls(ServiceOp::LoadConfiguration), 5);
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn restart_never_doubles_the_rate() {
        let service = Arc::new(SimulatedService::new());
        let (poller, _rx) = poller_with(service.clone());

        poller.start().expect("start");
        poller.start().expect("restart");
        poller.stop();
        poller.start().expect("start after stop");
        tokio::time::sleep(PERIOD * 3 + Duration::from_millis(100)).await;

        assert!(poller.is_running());
        assert_eq!(poller.completed_batches(), 3);
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticks_and_is_idempotent() {
        let service = Arc::new(SimulatedService::new());
        let (poller, _rx) = poller_with(service.clone());

        poller.start().expect("start");
        tokio::time::sleep(PERIOD + Duration::from_millis(100)).await;
        poller.stop();
        poller.stop();
        tokio::time::sleep(PERIOD * 3).await;

        assert!(!poller.is_running());
        assert_eq!(poller.completed_batches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_lets_in_flight_batch_finish() {
        let service = Arc::new(SimulatedService::new().with_latency(Duration::from_millis(500)));
        let (poller, _rx) = poller_with(service.clone());

        poller.start().expect("start");
        tokio::time::sleep(PERIOD + Duration::from_millis(100)).await;
        assert!(poller.is_in_flight());
        poller.stop();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(poller.completed_batches(), 1);
        assert!(poller.mirror().snapshot().refreshed_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_now_keeps_the_timer_cadence() {
        let service = Arc::new(SimulatedService::new());
        let (poller, _rx) = poller_with(service.clone());

        poller.start().expect("start");
        tokio::time::sleep(Duration::from_millis(1500)).await;
        poller.refresh_now(Verbosity::Silent).await.expect("refresh");
        assert_eq!(poller.completed_batches(), 1);

        // The timer still fires at 2000 ms, not 1500 ms + period
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(poller.completed_batches(), 2);
        poller.stop();
    }

    #[tokio::test]
    async fn detected_game_reaches_the_mirror() {
        let mut config = crate::domain::Configuration::default();
        config.watcher.game_path = "C:/Riot Games/VALORANT/live/VALORANT.exe".to_string();
        let service = Arc::new(SimulatedService::new().with_config(config));
        let (poller, _rx) = poller_with(service.clone());
        service.toggle_watching().await.expect("toggle");

        poller.refresh_now(Verbosity::Silent).await.expect("refresh");
        assert!(poller.mirror().snapshot().watching);
        assert!(!poller.mirror().snapshot().gaming);

        service.set_game_running(true);
        poller.refresh_now(Verbosity::Silent).await.expect("refresh");
        assert!(poller.mirror().snapshot().gaming);

        service.set_game_running(false);
        poller.refresh_now(Verbosity::Silent).await.expect("refresh");
        assert!(!poller.mirror().snapshot().gaming);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_service_drops_overlapping_timer_ticks() {
        let service = Arc::new(SimulatedService::new().with_latency(Duration::from_millis(3000)));
        let (poller, _rx) = poller_with(service.clone());

        poller.start().expect("start");
        // Ticks at 2s, 4s, 6s, 8s; batches take 3s, so 4s and 8s land mid-batch
        tokio::time::sleep(Duration::from_millis(9500)).await;
        poller.stop();

        assert_eq!(poller.skipped_ticks(), 2);
        assert_eq!(service.calls(ServiceOp::GetWatchingStatus), 2);
    }
}
