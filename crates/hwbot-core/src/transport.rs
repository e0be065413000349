use crate::error::{ConfigError, DeliveryError, TransportError};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

/// Fetches the raw homework-status payload for records newer than `from_date`.
pub trait StatusSource {
    fn fetch(&self, from_date: i64) -> Result<Value, TransportError>;
}

/// Delivers one text message to the operator.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError>;
}

impl<T: StatusSource + ?Sized> StatusSource for &T {
    fn fetch(&self, from_date: i64) -> Result<Value, TransportError> {
        (**self).fetch(from_date)
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        (**self).send(text)
    }
}

fn http_client(timeout: Duration) -> Result<Client, ConfigError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ConfigError::Client(e.to_string()))
}

// ---------------------------------------------------------------------------
// PracticumClient
// ---------------------------------------------------------------------------

/// Blocking client for the homework status API.
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            http: http_client(timeout)?,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }
}

impl StatusSource for PracticumClient {
    fn fetch(&self, from_date: i64) -> Result<Value, TransportError> {
        debug!(from_date, "requesting homework statuses");
        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .map_err(|e| TransportError::Connection(e.without_url().to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .map_err(|e| TransportError::Decode(e.without_url().to_string()))
    }
}

// ---------------------------------------------------------------------------
// TelegramNotifier
// ---------------------------------------------------------------------------

/// Sends messages to one chat through the Telegram Bot API.
pub struct TelegramNotifier {
    http: Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        api_base: &str,
        token: &str,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            http: http_client(timeout)?,
            send_url: format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token),
            chat_id: chat_id.into(),
        })
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        // Errors are stripped of the URL: it embeds the bot token.
        let response = self
            .http
            .post(&self.send_url)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .map_err(|e| DeliveryError(e.without_url().to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| DeliveryError(format!("HTTP {status}: {}", e.without_url())))?;

        if !status.is_success() || body.get("ok") != Some(&Value::Bool(true)) {
            let description = body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            return Err(DeliveryError(format!("HTTP {status}: {description}")));
        }

        info!(chat_id = %self.chat_id, "notification sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
