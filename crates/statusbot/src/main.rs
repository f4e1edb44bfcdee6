use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use statusbot_core::{config::Config, poller::UpdateLoop};
use statusbot_gatus::GatusClient;
use statusbot_telegram::TelegramMessenger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let log_file = statusbot_core::config::log_file_from_env();
    statusbot_core::logging::init("statusbot", log_file.as_deref())
        .context("failed to initialize logging")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return Err(e).context("missing required configuration");
        }
    };

    let messenger = Arc::new(
        TelegramMessenger::connect(&cfg.telegram_bot_token, cfg.poll_timeout, cfg.send_timeout)
            .context("failed to build telegram client")?,
    );
    let status = Arc::new(
        GatusClient::new(&cfg.gatus_api_url, cfg.status_timeout)
            .context("failed to build gatus client")?,
    );
    info!(
        monitor = %cfg.monitor_name,
        statuses_url = status.statuses_url(),
        "status bot initialized"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    UpdateLoop::new(cfg, messenger, status).run(shutdown).await;
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown requested, stopping after the current cycle");
    shutdown.cancel();
}
