//! Monitoring controller
//!
//! Orchestrates the pipeline: on a fixed cadence it draws a mention from the
//! source, inserts it into the window, recomputes statistics, runs every
//! detector rule and routes the candidates through the alert manager.
//!
//! All pipeline state lives behind one mutex. `stop()` flips the state and
//! bumps a generation counter under that lock, and a tick only mutates state
//! after re-checking both under the same lock, so no tick can land after
//! `stop()` returns. Readers receive owned copies.

use crate::aggregator::{recompute_stats, MentionWindow, StatsSnapshot};
use crate::alerts::AlertManager;
use crate::config::Config;
use crate::error::MonitorError;
use crate::events::{Alert, Mention};
use crate::filter::MentionFilter;
use crate::sources::MentionSource;
use crate::triggers::AnomalyDetector;
use chrono::Utc;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Controller state
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonitorStatus {
    Stopped,
    Monitoring,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A mention was ingested and `admitted_alerts` alerts were added
    Ingested { admitted_alerts: usize },
    /// Monitoring is stopped, or was restarted since this tick was scheduled
    Stopped,
    /// The source failed; state was left untouched
    SourceFailed,
    /// Another tick was still in flight
    Busy,
}

/// Point-in-time copy of everything the display layer reads
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub status: MonitorStatus,
    pub mentions: Vec<Mention>,
    pub alerts: Vec<Alert>,
    pub stats: StatsSnapshot,
}

/// Mutable pipeline state, only advanced by ticks and commands
struct PipelineState {
    window: MentionWindow,
    stats: StatsSnapshot,
    alerts: AlertManager,
    status: MonitorStatus,
    /// Incremented on every start and stop so stale tickers can tell they were cancelled
    generation: u64,
    ticks: u64,
}

struct Pipeline {
    state: Mutex<PipelineState>,
    source: Mutex<Box<dyn MentionSource>>,
    detector: AnomalyDetector,
    /// Held for the whole tick so ticks never overlap
    in_flight: Mutex<()>,
}

/// Handle to the background ticker thread
struct Ticker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Pipeline {
    /// Run one tick; `generation` pins the tick to the monitoring session that scheduled it
    fn tick(&self, generation: Option<u64>) -> TickOutcome {
        let _in_flight = match self.in_flight.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                debug!("Previous tick still running, skipping");
                return TickOutcome::Busy;
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        if !Self::is_current(&lock(&self.state), generation) {
            return TickOutcome::Stopped;
        }

        let mention = match lock(&self.source).next_mention() {
            Ok(mention) => mention,
            Err(e) => {
                warn!("Skipping tick, failed to draw mention: {}", e);
                return TickOutcome::SourceFailed;
            }
        };

        let mut guard = lock(&self.state);
        let state = &mut *guard;
        if !Self::is_current(state, generation) {
            debug!("Monitoring stopped while drawing, discarding mention {}", mention.id());
            return TickOutcome::Stopped;
        }

        debug!(
            "Ingesting mention {} ({}, {}, {})",
            mention.id(),
            mention.platform(),
            mention.sentiment(),
            mention.topic()
        );
        state.window.push(mention);

        let mentions = state.window.as_slice();
        state.stats = recompute_stats(mentions);
        let candidates = self.detector.evaluate(mentions, Utc::now());

        let admitted_alerts = candidates
            .into_iter()
            .map(|candidate| state.alerts.admit(candidate))
            .filter(|admitted| *admitted)
            .count();
        state.ticks += 1;

        TickOutcome::Ingested { admitted_alerts }
    }

    fn is_current(state: &PipelineState, generation: Option<u64>) -> bool {
        state.status == MonitorStatus::Monitoring
            && generation.map_or(true, |g| g == state.generation)
    }
}

/// Top-level composition of source, window, aggregator, detector and alerts
///
/// Starts in the Stopped state. `start()` and `stop()` are idempotent and
/// each emits one `info` alert on an actual transition. The window and alert
/// list survive stop/start cycles.
pub struct MonitoringController {
    pipeline: Arc<Pipeline>,
    tick_interval: Duration,
    ticker: Mutex<Option<Ticker>>,
}

impl MonitoringController {
    /// Create a stopped controller and seed its window from the source
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `source` - Where mentions are drawn from
    pub fn new(config: &Config, mut source: Box<dyn MentionSource>) -> Self {
        let mut window = MentionWindow::new(config.monitoring.window_capacity);
        if config.monitoring.initial_batch > 0 {
            window.extend(source.initial_batch(config.monitoring.initial_batch));
        }
        let stats = recompute_stats(window.as_slice());
        info!(
            "Seeded window with {} mentions (capacity {})",
            window.len(),
            window.capacity()
        );

        let alerts = AlertManager::new(
            config.alerts.capacity,
            config.alerts.dedup_window(),
        );

        let detector = AnomalyDetector::from_config(&config.detector);
        info!(
            "Running {} detector rules: {}",
            detector.rule_count(),
            detector.rule_names().join(", ")
        );

        let pipeline = Pipeline {
            state: Mutex::new(PipelineState {
                window,
                stats,
                alerts,
                status: MonitorStatus::Stopped,
                generation: 0,
                ticks: 0,
            }),
            source: Mutex::new(source),
            detector,
            in_flight: Mutex::new(()),
        };

        Self {
            pipeline: Arc::new(pipeline),
            tick_interval: config.monitoring.tick_interval(),
            ticker: Mutex::new(None),
        }
    }

    /// Transition Stopped -> Monitoring and begin the tick cadence
    ///
    /// # Returns
    ///
    /// `Ok(true)` on a transition, `Ok(false)` if already monitoring
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::ThreadSpawn` if the ticker thread cannot be
    /// spawned; the controller stays stopped in that case.
    pub fn start(&self) -> Result<bool, MonitorError> {
        self.start_with(|body| {
            thread::Builder::new()
                .name("mention-ticker".to_string())
                .spawn(body)
        })
    }

    fn start_with<F>(&self, spawn: F) -> Result<bool, MonitorError>
    where
        F: FnOnce(Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>>,
    {
        let mut ticker = lock(&self.ticker);

        let generation = {
            let mut state = lock(&self.pipeline.state);
            if state.status == MonitorStatus::Monitoring {
                debug!("Already monitoring, ignoring start");
                return Ok(false);
            }
            state.status = MonitorStatus::Monitoring;
            state.generation += 1;
            state.generation
        };

        let (shutdown, shutdown_receiver) = mpsc::channel();
        let pipeline = Arc::clone(&self.pipeline);
        let interval = self.tick_interval;

        let spawned = spawn(Box::new(move || {
            info!("Ticker started with interval {:?}", interval);
            loop {
                match shutdown_receiver.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if pipeline.tick(Some(generation)) == TickOutcome::Stopped {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("Ticker stopped");
        }));

        let mut state = lock(&self.pipeline.state);
        match spawned {
            Ok(handle) => {
                state
                    .alerts
                    .admit(Alert::lifecycle("Monitoring started", Utc::now()));
                *ticker = Some(Ticker { shutdown, handle });
                info!("Monitoring started");
                Ok(true)
            }
            Err(e) => {
                error!("Failed to spawn ticker thread: {}", e);
                state.status = MonitorStatus::Stopped;
                state.generation += 1;
                Err(MonitorError::ThreadSpawn(e.to_string()))
            }
        }
    }

    /// Transition Monitoring -> Stopped and cancel the tick cadence
    ///
    /// No tick mutates state after this returns.
    ///
    /// # Returns
    ///
    /// `Ok(true)` on a transition, `Ok(false)` if already stopped
    pub fn stop(&self) -> Result<bool, MonitorError> {
        let mut ticker = lock(&self.ticker);

        {
            let mut state = lock(&self.pipeline.state);
            if state.status == MonitorStatus::Stopped {
                debug!("Already stopped, ignoring stop");
                return Ok(false);
            }
            state.status = MonitorStatus::Stopped;
            state.generation += 1;
            state
                .alerts
                .admit(Alert::lifecycle("Monitoring stopped", Utc::now()));
        }

        if let Some(ticker) = ticker.take() {
            Self::join_ticker(ticker)?;
        }
        info!("Monitoring stopped");
        Ok(true)
    }

    fn join_ticker(ticker: Ticker) -> Result<(), MonitorError> {
        // the thread may already have exited on its own
        let _ = ticker.shutdown.send(());
        ticker
            .handle
            .join()
            .map_err(|_| MonitorError::ThreadJoin("ticker thread panicked".to_string()))
    }

    /// Run one tick immediately
    ///
    /// Does nothing unless monitoring. Overlapping ticks are skipped.
    pub fn tick(&self) -> TickOutcome {
        self.pipeline.tick(None)
    }

    /// Remove an alert; unknown ids are ignored
    pub fn dismiss(&self, alert_id: &str) -> bool {
        lock(&self.pipeline.state).alerts.dismiss(alert_id)
    }

    /// Empty the window and reset statistics; alerts are kept
    pub fn clear_mentions(&self) {
        let mut state = lock(&self.pipeline.state);
        let cleared = state.window.len();
        state.window.clear();
        state.stats = recompute_stats(&[]);
        info!("Cleared {} mentions", cleared);
    }

    /// Newest-first copy of the window
    pub fn mentions(&self) -> Vec<Mention> {
        lock(&self.pipeline.state).window.to_vec()
    }

    /// Newest-first copy of the window, narrowed by `filter`
    pub fn filtered_mentions(&self, filter: &MentionFilter) -> Vec<Mention> {
        let state = lock(&self.pipeline.state);
        state
            .window
            .iter()
            .filter(|mention| filter.matches(mention))
            .cloned()
            .collect()
    }

    /// Newest-first copy of the retained alerts
    pub fn alerts(&self) -> Vec<Alert> {
        lock(&self.pipeline.state).alerts.alerts()
    }

    pub fn stats(&self) -> StatsSnapshot {
        lock(&self.pipeline.state).stats.clone()
    }

    pub fn is_monitoring(&self) -> bool {
        lock(&self.pipeline.state).status == MonitorStatus::Monitoring
    }

    /// Number of ticks that ingested a mention
    pub fn tick_count(&self) -> u64 {
        lock(&self.pipeline.state).ticks
    }

    /// Consistent copy of mentions, alerts, stats and status taken under one lock
    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = lock(&self.pipeline.state);
        MonitorSnapshot {
            status: state.status,
            mentions: state.window.to_vec(),
            alerts: state.alerts.alerts(),
            stats: state.stats.clone(),
        }
    }
}

impl Drop for MonitoringController {
    fn drop(&mut self) {
        {
            let mut state = lock(&self.pipeline.state);
            state.status = MonitorStatus::Stopped;
            state.generation += 1;
        }
        if let Some(ticker) = lock(&self.ticker).take() {
            if let Err(e) = Self::join_ticker(ticker) {
                error!("Failed to stop ticker on drop: {}", e);
            }
        }
    }
}
