use crate::error::{ConfigError, Outcome, Result};
use crate::verdict::VerdictTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pause between two poll cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Upper bound for a single fetch or send.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_telegram_api_base")]
    pub telegram_api_base: String,
    /// `from_date` used for the very first fetch.
    #[serde(default)]
    pub initial_window: i64,
    #[serde(default)]
    pub verdicts: VerdictTable,
}

fn default_poll_interval() -> u64 {
    600
}

fn default_request_timeout() -> u64 {
    30
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            endpoint: default_endpoint(),
            telegram_api_base: default_telegram_api_base(),
            initial_window: 0,
            verdicts: VerdictTable::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.poll_interval_secs == 0 {
            warnings.push(ConfigWarning::error("poll_interval_secs must be at least 1"));
        }

        // An unbounded fetch would stall the poll cadence.
        if self.request_timeout_secs == 0 {
            warnings.push(ConfigWarning::error(
                "request_timeout_secs must be at least 1",
            ));
        } else if self.poll_interval_secs > 0
            && self.request_timeout_secs >= self.poll_interval_secs
        {
            warnings.push(ConfigWarning::warning(format!(
                "request_timeout_secs={} is not shorter than poll_interval_secs={}",
                self.request_timeout_secs, self.poll_interval_secs
            )));
        }

        for (key, url) in [
            ("endpoint", &self.endpoint),
            ("telegram_api_base", &self.telegram_api_base),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(ConfigWarning::error(format!(
                    "{key} '{url}' is not an http(s) URL"
                )));
            }
        }

        if self.initial_window < 0 {
            warnings.push(ConfigWarning::error(format!(
                "initial_window={} is negative",
                self.initial_window
            )));
        }

        if self.verdicts.is_empty() {
            warnings.push(ConfigWarning::error(
                "verdicts is empty: every status would be undocumented",
            ));
        }
        for (code, text) in self.verdicts.iter() {
            if text.trim().is_empty() {
                warnings.push(ConfigWarning::error(format!(
                    "verdict for status '{code}' is blank"
                )));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Secrets read from the environment at startup.
#[derive(Clone, Default)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

/// Credentials that passed [`Credentials::check`].
#[derive(Clone)]
pub struct ResolvedCredentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        let var = |name| std::env::var(name).ok();
        Self {
            practicum_token: var(PRACTICUM_TOKEN_VAR),
            telegram_token: var(TELEGRAM_TOKEN_VAR),
            telegram_chat_id: var(TELEGRAM_CHAT_ID_VAR),
        }
    }

    /// Names of the variables that are unset or blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_VAR, &self.practicum_token),
            (TELEGRAM_TOKEN_VAR, &self.telegram_token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram_chat_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    /// The startup gate: every credential must be present before polling.
    pub fn check(self) -> std::result::Result<ResolvedCredentials, Outcome> {
        let missing = self.missing();
        match (self.practicum_token, self.telegram_token, self.telegram_chat_id) {
            (Some(practicum_token), Some(telegram_token), Some(telegram_chat_id))
                if missing.is_empty() =>
            {
                Ok(ResolvedCredentials {
                    practicum_token,
                    telegram_token,
                    telegram_chat_id,
                })
            }
            _ => Err(Outcome::MissingCredentials(missing)),
        }
    }
}

impl std::fmt::Debug for ResolvedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredentials")
            .field("practicum_token", &"***")
            .field("telegram_token", &"***")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("practicum_token", &mask(&self.practicum_token))
            .field("telegram_token", &mask(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
