use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{errors::Error, Result};

/// Initialize logging/tracing for the bot.
///
/// Logs go to stdout and, when `log_file` is set, are also appended to that file.
pub fn init(service_name: &str, log_file: Option<&Path>) -> Result<()> {
    // Default: info for our crates and everything else.
    // Can be overridden with `RUST_LOG`.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "info,statusbot_core=info,{}=info",
            service_name.replace('-', "_")
        ))
    });

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_ansi(true))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::External(format!("logging init failed: {e}")))?;

    Ok(())
}
