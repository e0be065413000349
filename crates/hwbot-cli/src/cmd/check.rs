use super::{load_config, CredentialArgs};
use crate::output::print_json;
use clap::Args;
use hwbot_core::config::{Credentials, WarnLevel};
use std::path::Path;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    credentials: CredentialArgs,
}

pub fn run(config_path: Option<&Path>, args: CheckArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let warnings = config.validate();
    let missing = Credentials::from(args.credentials).missing();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
            "missing_credentials": missing,
        });
        print_json(&value)?;
    } else {
        if warnings.is_empty() {
            println!("Config is valid. No warnings.");
        }
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
        if missing.is_empty() {
            println!("All credentials are set.");
        } else {
            for name in &missing {
                println!("[error] {name} is not set");
            }
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors || !missing.is_empty() {
        anyhow::bail!("check found errors");
    }

    Ok(())
}
