use std::time::Duration;

use async_trait::async_trait;

use crate::{domain::ChatId, messaging::types::IncomingUpdate, Result};

/// Messaging gateway port.
///
/// Telegram is the only implementation; the loop and dispatcher talk to this
/// trait so they can be driven by in-memory fakes in tests.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;

    /// Long-poll for updates with id >= `offset`, waiting at most `wait` for
    /// the first one and returning at most `limit`.
    async fn fetch_updates(
        &self,
        offset: i64,
        wait: Duration,
        limit: u8,
    ) -> Result<Vec<IncomingUpdate>>;
}
