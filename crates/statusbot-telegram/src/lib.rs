//! Telegram adapter (teloxide).
//!
//! This crate implements the `statusbot-core` MessagingPort over the Telegram
//! Bot API: `sendMessage` for replies and `getUpdates` for long polling.

use std::time::Duration;

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{ParseMode, Update, UpdateKind},
};

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use statusbot_core::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{IncomingMessage, IncomingUpdate},
    },
    Result,
};

/// Extra room on the HTTP client so a long poll is never cut by its own client.
const LONG_POLL_SLACK: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    send_timeout: Duration,
}

impl TelegramMessenger {
    /// Build a bot whose HTTP client outlives `poll_wait`; sends are capped at `send_timeout`.
    pub fn connect(token: &str, poll_wait: Duration, send_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(send_timeout)
            .timeout(poll_wait + LONG_POLL_SLACK)
            .build()
            .map_err(|e| Error::External(format!("telegram client build error: {e}")))?;

        Ok(Self {
            bot: Bot::with_client(token, client),
            send_timeout,
        })
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        warn!(retry_after = ?d, "telegram rate limit hit, retrying");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// Map a Telegram update onto the gateway-agnostic model.
///
/// Only plain messages are kept; edits, callbacks and the like become
/// message-less updates so the cursor still moves past them.
pub fn to_incoming(update: Update) -> IncomingUpdate {
    let id = i64::from(update.id);
    let message = match update.kind {
        UpdateKind::Message(msg) => Some(IncomingMessage {
            chat_id: ChatId(msg.chat.id.0),
            text: msg.text().map(str::to_string),
        }),
        _ => None,
    };
    IncomingUpdate { id, message }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        let send = self.with_retry(|| {
            self.bot
                .send_message(Self::tg_chat(chat_id), html.to_string())
                .parse_mode(ParseMode::Html)
        });

        timeout(self.send_timeout, send)
            .await
            .map_err(|_| Error::Timeout(format!("sendMessage to {chat_id}")))??;
        Ok(())
    }

    async fn fetch_updates(
        &self,
        offset: i64,
        wait: Duration,
        limit: u8,
    ) -> Result<Vec<IncomingUpdate>> {
        let offset = i32::try_from(offset).unwrap_or(i32::MAX);
        let wait_secs = u32::try_from(wait.as_secs()).unwrap_or(u32::MAX);

        let updates = self
            .bot
            .get_updates()
            .offset(offset)
            .timeout(wait_secs)
            .limit(limit)
            .await
            .map_err(Self::map_err)?;

        if !updates.is_empty() {
            debug!(count = updates.len(), offset, "received telegram updates");
        }
        Ok(updates.into_iter().map(to_incoming).collect())
    }
}
