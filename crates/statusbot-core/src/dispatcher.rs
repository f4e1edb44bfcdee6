use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    commands::{self, Command, Parsed},
    config::Config,
    formatting::split_message,
    messaging::{port::MessagingPort, types::IncomingMessage},
    monitoring::{port::StatusSource, types::Snapshot},
    report::{self, ReportContext},
};

/// What the dispatcher did with a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Sender is not the configured chat; nothing was sent.
    Unauthorized,
    Command(Command),
    UnknownCommand(String),
    Onboarding,
}

/// Maps incoming messages to replies for the single configured chat.
pub struct Dispatcher {
    cfg: Arc<Config>,
    messenger: Arc<dyn MessagingPort>,
    status: Arc<dyn StatusSource>,
}

impl Dispatcher {
    pub fn new(
        cfg: Arc<Config>,
        messenger: Arc<dyn MessagingPort>,
        status: Arc<dyn StatusSource>,
    ) -> Self {
        Self {
            cfg,
            messenger,
            status,
        }
    }

    pub async fn handle(&self, msg: &IncomingMessage) -> Outcome {
        if msg.chat_id != self.cfg.telegram_chat_id {
            warn!(chat_id = %msg.chat_id, "received message from unauthorized chat");
            return Outcome::Unauthorized;
        }

        let text = msg.text.as_deref().unwrap_or_default().trim();
        info!(text, "processing message");

        let ctx = self.report_context();
        match commands::parse(text) {
            Parsed::Command(cmd) => {
                let snapshot = if cmd.needs_snapshot() {
                    self.fetch_snapshot().await
                } else {
                    None
                };
                self.reply(&report::render(cmd, snapshot.as_ref(), &ctx))
                    .await;
                Outcome::Command(cmd)
            }
            Parsed::Unknown(token) => {
                self.reply(&report::unknown_command(&token)).await;
                Outcome::UnknownCommand(token)
            }
            Parsed::Plain => {
                self.reply(&report::onboarding(&ctx)).await;
                Outcome::Onboarding
            }
        }
    }

    /// One-time notice sent when the bot comes online.
    pub async fn announce_startup(&self) {
        self.reply(&report::startup(&self.report_context())).await;
    }

    async fn fetch_snapshot(&self) -> Option<Snapshot> {
        match self.status.snapshot().await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!(error = %e, "failed to fetch monitoring data");
                None
            }
        }
    }

    /// Send `text` to the configured chat, split to fit the gateway limit.
    /// Failures are logged and dropped.
    async fn reply(&self, text: &str) {
        let chat_id = self.cfg.telegram_chat_id;
        for chunk in split_message(text, self.cfg.telegram_safe_limit) {
            if let Err(e) = self.messenger.send_html(chat_id, &chunk).await {
                error!(error = %e, %chat_id, "failed to send message");
            }
        }
    }

    fn report_context(&self) -> ReportContext {
        ReportContext::new(self.cfg.monitor_name.clone(), Utc::now())
    }
}
