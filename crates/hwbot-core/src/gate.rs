/// Suppresses a notification identical to the previous one.
///
/// Only the last considered text is remembered, so a status that flaps
/// A → B → A notifies on every change.
#[derive(Debug, Default, Clone)]
pub struct NotificationGate {
    last: Option<String>,
}

impl NotificationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_send(&self, candidate: &str) -> bool {
        self.last.as_deref() != Some(candidate)
    }

    /// Remember `candidate` whether or not its delivery succeeded.
    pub fn record(&mut self, candidate: &str) {
        self.last = Some(candidate.to_string());
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_always_passes() {
        assert!(NotificationGate::new().should_send("anything"));
    }

    #[test]
    fn should_send_is_idempotent() {
        let mut gate = NotificationGate::new();
        assert_eq!(gate.should_send("x"), gate.should_send("x"));
        gate.record("x");
        assert_eq!(gate.should_send("x"), gate.should_send("x"));
        assert!(!gate.should_send("x"));
    }

    #[test]
    fn recorded_text_is_suppressed_others_pass() {
        let mut gate = NotificationGate::new();
        gate.record("x");
        assert!(!gate.should_send("x"));
        assert!(gate.should_send("y"));
    }

    #[test]
    fn flapping_status_renotifies() {
        let mut gate = NotificationGate::new();
        for text in ["a", "b", "a"] {
            assert!(gate.should_send(text));
            gate.record(text);
        }
        assert_eq!(gate.last(), Some("a"));
    }
}
