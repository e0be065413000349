use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How the supervisor treats an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Logged only; the loop continues with the window unchanged.
    Silent,
    /// Logged and forwarded to the messaging channel through the gate.
    Alertable,
    /// Reported once before the loop starts; the process exits.
    Fatal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Silent => "silent",
            Severity::Alertable => "alertable",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure of the status fetch itself, before any payload is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to the status endpoint failed: {0}")]
    Connection(String),

    #[error("status endpoint answered with HTTP {0}")]
    Status(u16),

    #[error("status endpoint returned an empty or invalid JSON body: {0}")]
    Decode(String),
}

/// The messaging channel rejected the message or could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to deliver notification: {0}")]
pub struct DeliveryError(pub String);

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Every non-success result of a poll cycle, tagged with its handling policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Outcome {
    #[error("no new review records since the last poll")]
    NoNewRecords,

    #[error(transparent)]
    RetryableTransport(#[from] TransportError),

    #[error("API response must be a JSON object, got {found}")]
    MalformedResponse { found: &'static str },

    #[error("API response has no 'homeworks' key")]
    MissingRecordsKey,

    #[error("API response has no 'current_date' timestamp")]
    MissingTimestamp,

    #[error("API response 'current_date' must be an integer, got {found}")]
    InvalidTimestamp { found: &'static str },

    #[error("API response 'homeworks' must be a list, got {found}")]
    RecordsNotASequence { found: &'static str },

    #[error("homework record has no 'homework_name'")]
    MissingHomeworkName,

    #[error("homework record has no 'status'")]
    MissingStatusField,

    #[error("undocumented homework status: {0}")]
    UndocumentedStatus(String),

    #[error(transparent)]
    NotificationDelivery(#[from] DeliveryError),

    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
}

impl Outcome {
    pub fn severity(&self) -> Severity {
        match self {
            Outcome::NoNewRecords
            | Outcome::RetryableTransport(_)
            | Outcome::NotificationDelivery(_) => Severity::Silent,
            Outcome::MalformedResponse { .. }
            | Outcome::MissingRecordsKey
            | Outcome::MissingTimestamp
            | Outcome::InvalidTimestamp { .. }
            | Outcome::RecordsNotASequence { .. }
            | Outcome::MissingHomeworkName
            | Outcome::MissingStatusField
            | Outcome::UndocumentedStatus(_) => Severity::Alertable,
            Outcome::MissingCredentials(_) => Severity::Fatal,
        }
    }

    pub fn is_alertable(&self) -> bool {
        self.severity() == Severity::Alertable
    }

    /// Text forwarded to the messaging channel for an alertable outcome.
    pub fn alert_text(&self) -> String {
        format!("Program failure: {self}")
    }
}

/// JSON type name used in shape-violation messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
