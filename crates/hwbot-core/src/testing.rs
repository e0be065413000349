//! In-memory collaborators for exercising the poll loop without a network.

use crate::error::{DeliveryError, TransportError};
use crate::supervisor::ShutdownHandle;
use crate::transport::{Notifier, StatusSource};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Replays queued responses in order, recording every `from_date` it sees.
#[derive(Default)]
pub struct ScriptedSource {
    responses: RefCell<VecDeque<Result<Value, TransportError>>>,
    calls: RefCell<Vec<i64>>,
    stop: RefCell<Option<(usize, ShutdownHandle)>>,
}

impl ScriptedSource {
    pub fn new(responses: impl IntoIterator<Item = Result<Value, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Trigger `handle` once the `n`-th fetch has been served.
    pub fn stop_after(self, n: usize, handle: ShutdownHandle) -> Self {
        *self.stop.borrow_mut() = Some((n, handle));
        self
    }

    pub fn calls(&self) -> Vec<i64> {
        self.calls.borrow().clone()
    }
}

impl StatusSource for ScriptedSource {
    fn fetch(&self, from_date: i64) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push(from_date);
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".into())));
        if let Some((n, handle)) = self.stop.borrow().as_ref() {
            if self.calls.borrow().len() >= *n {
                handle.trigger();
            }
        }
        next
    }
}

/// Records sent texts; can be switched into a failing channel.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<String>>,
    attempts: Cell<usize>,
    failing: Cell<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let n = Self::default();
        n.failing.set(true);
        n
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.failing.get() {
            return Err(DeliveryError("chat not found".into()));
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}
