use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_GATUS_API_URL: &str = "http://gatus:8080";
pub const DEFAULT_MONITOR_NAME: &str = "BCT Chain";

/// Telegram caps `getUpdates` batches at 100.
const MAX_POLL_LIMIT: u8 = 100;

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub telegram_chat_id: ChatId,
    pub gatus_api_url: String,
    pub monitor_name: String,

    // Update loop
    pub poll_timeout: Duration,
    pub poll_limit: u8,
    pub poll_interval: Duration,
    pub error_backoff: Duration,

    // Network timeouts
    pub send_timeout: Duration,
    pub status_timeout: Duration,

    // Telegram limits
    pub telegram_safe_limit: usize,

    // Logging
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment in production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        // Required
        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN").ok_or_else(|| {
            Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
        })?;
        let raw_chat_id = get("TELEGRAM_CHAT_ID").ok_or_else(|| {
            Error::Config("TELEGRAM_CHAT_ID environment variable is required".to_string())
        })?;
        let telegram_chat_id = raw_chat_id
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| {
                Error::Config(format!(
                    "TELEGRAM_CHAT_ID must be a numeric chat id, got {raw_chat_id:?}"
                ))
            })?;

        // Status source
        let gatus_api_url = get("GATUS_API_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GATUS_API_URL.to_string());
        let monitor_name = get("MONITOR_NAME")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_MONITOR_NAME.to_string());

        // Update loop
        let poll_timeout = Duration::from_secs(parse(&get, "POLL_TIMEOUT_SECS").unwrap_or(30));
        let poll_limit = parse(&get, "POLL_LIMIT")
            .unwrap_or(MAX_POLL_LIMIT)
            .clamp(1, MAX_POLL_LIMIT);
        let poll_interval =
            Duration::from_millis(parse(&get, "POLL_INTERVAL_MS").unwrap_or(1000));
        let error_backoff = Duration::from_secs(parse(&get, "ERROR_BACKOFF_SECS").unwrap_or(5));

        let send_timeout = Duration::from_secs(parse(&get, "SEND_TIMEOUT_SECS").unwrap_or(10));
        let status_timeout =
            Duration::from_secs(parse(&get, "STATUS_TIMEOUT_SECS").unwrap_or(10));

        let telegram_safe_limit = parse(&get, "TELEGRAM_SAFE_LIMIT").unwrap_or(4000);

        let log_file = get("LOG_FILE").map(PathBuf::from);

        Ok(Self {
            telegram_bot_token,
            telegram_chat_id,
            gatus_api_url,
            monitor_name,
            poll_timeout,
            poll_limit,
            poll_interval,
            error_backoff,
            send_timeout,
            status_timeout,
            telegram_safe_limit,
            log_file,
        })
    }
}

/// `LOG_FILE` as set in the environment (after `.env`), for logging setup
/// that has to happen before the full config is validated.
pub fn log_file_from_env() -> Option<PathBuf> {
    load_dotenv_if_present(Path::new(".env"));
    env::var("LOG_FILE").ok().and_then(non_empty).map(PathBuf::from)
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter(|(k, _)| !k.trim().is_empty())
        .map(|(k, v)| (k.trim().to_string(), unquote(v.trim()).to_string()))
        .collect()
}

fn unquote(val: &str) -> &str {
    let quoted = val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')));
    if quoted {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn parse<T: std::str::FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    get(key).and_then(|s| s.trim().parse::<T>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
