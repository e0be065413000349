use crate::classifier::{classify, Classified};
use crate::error::Outcome;
use crate::gate::NotificationGate;
use crate::transport::{Notifier, StatusSource};
use crate::verdict::VerdictTable;
use tracing::{debug, error};

// ---------------------------------------------------------------------------
// CycleResult
// ---------------------------------------------------------------------------

/// What happened to a candidate notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent,
    /// Identical to the previous notification; nothing was sent.
    Suppressed,
    /// The channel failed with [`Outcome::NotificationDelivery`]. The text
    /// is still remembered by the gate.
    Failed(Outcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleResult {
    /// The latest record was interpreted into a status message.
    Status {
        message: String,
        delivery: Delivery,
        next_window: i64,
    },
    /// The server reported no records newer than the window.
    Unchanged,
    /// The cycle failed. `delivery` is set only for alertable outcomes.
    Failed {
        outcome: Outcome,
        delivery: Option<Delivery>,
    },
}

impl CycleResult {
    /// Window proposed for the next fetch, present only on success.
    pub fn next_window(&self) -> Option<i64> {
        match self {
            CycleResult::Status { next_window, .. } => Some(*next_window),
            _ => None,
        }
    }

    pub fn delivery(&self) -> Option<&Delivery> {
        match self {
            CycleResult::Status { delivery, .. } => Some(delivery),
            CycleResult::Failed { delivery, .. } => delivery.as_ref(),
            CycleResult::Unchanged => None,
        }
    }

    pub fn sent(&self) -> bool {
        matches!(self.delivery(), Some(Delivery::Sent))
    }
}

// ---------------------------------------------------------------------------
// PollCycle
// ---------------------------------------------------------------------------

/// One fetch → classify → interpret → notify pass, plus the gate it shares
/// across passes.
pub struct PollCycle<S, N> {
    source: S,
    notifier: N,
    verdicts: VerdictTable,
    gate: NotificationGate,
}

impl<S: StatusSource, N: Notifier> PollCycle<S, N> {
    pub fn new(source: S, notifier: N, verdicts: VerdictTable) -> Self {
        Self {
            source,
            notifier,
            verdicts,
            gate: NotificationGate::new(),
        }
    }

    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    pub fn run_once(&mut self, window: i64) -> CycleResult {
        match self.check(window) {
            Ok((message, next_window)) => {
                let delivery = self.notify(&message);
                CycleResult::Status {
                    message,
                    delivery,
                    next_window,
                }
            }
            Err(Outcome::NoNewRecords) => CycleResult::Unchanged,
            Err(outcome) if outcome.is_alertable() => {
                let delivery = self.notify(&outcome.alert_text());
                CycleResult::Failed {
                    outcome,
                    delivery: Some(delivery),
                }
            }
            Err(outcome) => CycleResult::Failed {
                outcome,
                delivery: None,
            },
        }
    }

    fn check(&self, window: i64) -> Result<(String, i64), Outcome> {
        let raw = self.source.fetch(window)?;
        let Classified {
            record,
            server_timestamp,
        } = classify(&raw)?;
        let message = self.verdicts.interpret(&record)?;
        Ok((message, server_timestamp))
    }

    /// Gate, send at most once, then remember the text.
    fn notify(&mut self, text: &str) -> Delivery {
        if !self.gate.should_send(text) {
            debug!("notification unchanged, not sending");
            return Delivery::Suppressed;
        }
        let delivery = match self.notifier.send(text) {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                let outcome = Outcome::from(e);
                error!(
                    error = %outcome,
                    severity = %outcome.severity(),
                    "notification delivery failed"
                );
                Delivery::Failed(outcome)
            }
        };
        self.gate.record(text);
        delivery
    }
}
