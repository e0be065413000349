use super::{load_config, CredentialArgs};
use anyhow::{anyhow, Context};
use clap::Args;
use hwbot_core::config::{Credentials, WarnLevel};
use hwbot_core::{
    shutdown_channel, CycleResult, PollWindow, PracticumClient, ShutdownHandle, Supervisor,
    TelegramNotifier,
};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    credentials: CredentialArgs,

    /// Seconds between polls (overrides poll_interval_secs)
    #[arg(long, value_name = "SECS")]
    interval: Option<u64>,

    /// Only report changes made from now on instead of the configured window
    #[arg(long)]
    from_now: bool,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,
}

pub fn run(config_path: Option<&Path>, args: RunArgs) -> anyhow::Result<()> {
    let credentials = Credentials::from(args.credentials)
        .check()
        .map_err(|outcome| anyhow!(outcome))
        .context("cannot start polling")?;

    let config = load_config(config_path)?;
    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => warn!("config: {}", w.message),
            WarnLevel::Error => anyhow::bail!("invalid config: {}", w.message),
        }
    }

    let source = PracticumClient::new(
        config.endpoint.clone(),
        credentials.practicum_token,
        config.request_timeout(),
    )?;
    let notifier = TelegramNotifier::new(
        &config.telegram_api_base,
        &credentials.telegram_token,
        credentials.telegram_chat_id,
        config.request_timeout(),
    )?;

    let mut supervisor = Supervisor::new(&config, source, notifier);
    if let Some(secs) = args.interval {
        if secs == 0 {
            anyhow::bail!("--interval must be at least 1 second");
        }
        supervisor = supervisor.with_interval(Duration::from_secs(secs));
    }
    if args.from_now {
        supervisor = supervisor.with_window(PollWindow::now());
    }

    if args.once {
        let result = supervisor.tick();
        info!(
            window = supervisor.window().value(),
            sent = result.sent(),
            outcome = describe(&result),
            "single cycle finished"
        );
        return Ok(());
    }

    let (handle, signal) = shutdown_channel();
    watch_ctrl_c(handle)?;
    supervisor.run(&signal);
    Ok(())
}

fn describe(result: &CycleResult) -> &'static str {
    match result {
        CycleResult::Status { .. } => "status",
        CycleResult::Unchanged => "unchanged",
        CycleResult::Failed { outcome, .. } => outcome.severity().as_str(),
    }
}

/// Forward Ctrl-C to the supervisor from a helper thread.
fn watch_ctrl_c(handle: ShutdownHandle) -> anyhow::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            rt.block_on(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        info!("interrupt received, finishing current cycle");
                        handle.trigger();
                    }
                    Err(e) => {
                        warn!(error = %e, "cannot listen for Ctrl-C; stop the process externally");
                        // Holding the handle keeps the supervisor's cadence intact.
                        std::future::pending::<()>().await;
                    }
                }
            })
        })
        .context("failed to spawn signal thread")?;
    Ok(())
}
