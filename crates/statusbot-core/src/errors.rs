/// Core error type for the status bot.
///
/// Adapter crates map their transport errors into `External` so the update loop
/// can treat every collaborator failure the same way (log it, carry on).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),

    #[error("timed out: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, Error>;
