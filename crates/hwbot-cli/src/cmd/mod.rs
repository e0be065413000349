pub mod check;
pub mod run;
pub mod verdicts;

use anyhow::Context;
use clap::Args;
use hwbot_core::config::{Config, Credentials};
use std::path::Path;

/// Secrets, normally taken from the environment.
#[derive(Args)]
pub struct CredentialArgs {
    /// Homework status API token
    #[arg(long, env = "PRACTICUM_TOKEN", hide_env_values = true)]
    practicum_token: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Telegram chat that receives notifications
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    telegram_chat_id: Option<String>,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials {
            practicum_token: args.practicum_token,
            telegram_token: args.telegram_token,
            telegram_chat_id: args.telegram_chat_id,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Config::load_or_default(path).with_context(|| match path {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "failed to load default config".to_string(),
    })
}
