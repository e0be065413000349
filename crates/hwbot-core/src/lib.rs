//! `hwbot-core` — watches one homework's review status and forwards changes.
//!
//! ```text
//! Supervisor ──► PollCycle ──► StatusSource::fetch
//!                    │
//!                    ├──► classify        (shape → record + server time)
//!                    ├──► VerdictTable    (record → message)
//!                    ├──► NotificationGate
//!                    └──► Notifier::send
//! ```
//!
//! Failures come back as [`Outcome`] values; their [`Severity`] decides whether
//! an operator is alerted.

pub mod classifier;
pub mod config;
pub mod cycle;
pub mod error;
pub mod gate;
pub mod supervisor;
pub mod transport;
pub mod verdict;

#[cfg(test)]
mod testing;

pub use config::{Config, Credentials, ResolvedCredentials};
pub use cycle::{CycleResult, Delivery, PollCycle};
pub use error::{ConfigError, DeliveryError, Outcome, Result, Severity, TransportError};
pub use gate::NotificationGate;
pub use supervisor::{shutdown_channel, PollWindow, ShutdownHandle, ShutdownSignal, Supervisor};
pub use transport::{Notifier, PracticumClient, StatusSource, TelegramNotifier};
pub use verdict::VerdictTable;
