//! The polling loop.
//!
//! ```text
//!             ┌──────────── interval elapsed ───────────┐
//!             ▼                                         │
//! start ──► POLLING ── run_once ── apply policy ── sleep ┘
//!             │                                   │
//!             └──────────── stop requested ───────┴──► STOPPED
//! ```
//!
//! The window only moves forward after a successful cycle. Every iteration
//! sleeps the full interval regardless of its outcome.

use crate::config::Config;
use crate::cycle::{CycleResult, Delivery, PollCycle};
use crate::error::Severity;
use crate::transport::{Notifier, StatusSource};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// PollWindow
// ---------------------------------------------------------------------------

/// Lower bound (seconds since epoch) for the next fetch. Never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollWindow(i64);

impl PollWindow {
    pub fn new(from: i64) -> Self {
        Self(from)
    }

    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Move to `to` if it is later. Returns whether the window changed.
    pub fn advance(&mut self, to: i64) -> bool {
        if to > self.0 {
            self.0 = to;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Shutdown
// ---------------------------------------------------------------------------

/// Create a connected stop handle and signal.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = mpsc::channel();
    (ShutdownHandle(tx), ShutdownSignal(rx))
}

#[derive(Debug, Clone)]
pub struct ShutdownHandle(mpsc::Sender<()>);

impl ShutdownHandle {
    pub fn trigger(&self) {
        // The supervisor may already be gone.
        let _ = self.0.send(());
    }
}

#[derive(Debug)]
pub struct ShutdownSignal(mpsc::Receiver<()>);

impl ShutdownSignal {
    fn requested(&self) -> bool {
        match self.0.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }

    /// Sleep for `interval`, waking early on a stop request.
    fn sleep(&self, interval: Duration) -> bool {
        match self.0.recv_timeout(interval) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            // Nobody can ask us to stop any more; keep the cadence.
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(interval);
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Supervisor
// ---------------------------------------------------------------------------

pub struct Supervisor<S, N> {
    cycle: PollCycle<S, N>,
    window: PollWindow,
    interval: Duration,
}

impl<S: StatusSource, N: Notifier> Supervisor<S, N> {
    pub fn new(config: &Config, source: S, notifier: N) -> Self {
        Self {
            cycle: PollCycle::new(source, notifier, config.verdicts.clone()),
            window: PollWindow::new(config.initial_window),
            interval: config.poll_interval(),
        }
    }

    pub fn with_window(mut self, window: PollWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn window(&self) -> PollWindow {
        self.window
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single cycle and apply its outcome to the window.
    pub fn tick(&mut self) -> CycleResult {
        let result = self.cycle.run_once(self.window.value());
        self.apply(&result);
        result
    }

    /// Poll until `shutdown` fires. Returns the number of completed cycles.
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> u64 {
        info!(
            window = self.window.value(),
            interval_secs = self.interval.as_secs(),
            "polling started"
        );
        let mut cycles = 0;
        loop {
            if shutdown.requested() {
                break;
            }
            self.tick();
            cycles += 1;
            if shutdown.sleep(self.interval) {
                break;
            }
        }
        info!(cycles, window = self.window.value(), "polling stopped");
        cycles
    }

    fn apply(&mut self, result: &CycleResult) {
        match result {
            CycleResult::Status {
                message,
                delivery,
                next_window,
            } => {
                match delivery {
                    Delivery::Sent => info!(%message, "review status changed"),
                    Delivery::Suppressed => debug!("review status unchanged"),
                    // Already logged where it failed.
                    Delivery::Failed(_) => {}
                }
                if !self.window.advance(*next_window) {
                    warn!(
                        window = self.window.value(),
                        server_timestamp = *next_window,
                        "server timestamp is not ahead of the window; keeping window"
                    );
                }
            }
            CycleResult::Unchanged => debug!(window = self.window.value(), "no new records"),
            CycleResult::Failed { outcome, .. } => match outcome.severity() {
                Severity::Alertable => error!(error = %outcome, "API contract violation"),
                Severity::Silent => warn!(error = %outcome, "poll failed, will retry"),
                // Startup-only; the loop never produces it.
                Severity::Fatal => error!(error = %outcome, "fatal outcome inside poll loop"),
            },
        }
    }
}
