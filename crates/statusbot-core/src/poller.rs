use std::{sync::Arc, time::Duration};

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::{
    config::Config,
    dispatcher::Dispatcher,
    domain::UpdateId,
    errors::Error,
    messaging::{port::MessagingPort, types::IncomingUpdate},
    monitoring::port::StatusSource,
    Result,
};

/// Slack on top of the long-poll wait before a fetch counts as hung.
const FETCH_GRACE: Duration = Duration::from_secs(5);

/// Long-polls the messaging gateway and feeds every message to the dispatcher.
///
/// The cursor lives here and nowhere else; it only moves forward, so an update
/// is handled at most once per process lifetime.
pub struct UpdateLoop {
    cfg: Arc<Config>,
    messenger: Arc<dyn MessagingPort>,
    dispatcher: Dispatcher,
    cursor: UpdateId,
}

impl UpdateLoop {
    pub fn new(
        cfg: Arc<Config>,
        messenger: Arc<dyn MessagingPort>,
        status: Arc<dyn StatusSource>,
    ) -> Self {
        let dispatcher = Dispatcher::new(cfg.clone(), messenger.clone(), status);
        Self {
            cfg,
            messenger,
            dispatcher,
            cursor: 0,
        }
    }

    /// Last consumed update id.
    pub fn cursor(&self) -> UpdateId {
        self.cursor
    }

    /// Announce startup, then poll until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between cycles; a long-poll in flight runs to completion.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(chat_id = %self.cfg.telegram_chat_id, "starting update loop");
        self.dispatcher.announce_startup().await;

        while !shutdown.is_cancelled() {
            let pause = match self.tick().await {
                Ok(_) => self.cfg.poll_interval,
                Err(e) => {
                    error!(error = %e, backoff = ?self.cfg.error_backoff, "error in update loop");
                    self.cfg.error_backoff
                }
            };

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(pause) => {}
            }
        }

        info!(cursor = self.cursor, "update loop stopped");
    }

    /// One poll cycle: fetch a batch, advance the cursor, dispatch messages.
    /// Returns the number of updates consumed.
    pub async fn tick(&mut self) -> Result<usize> {
        let batch = self.next_batch().await?;
        let count = batch.len();

        for update in batch {
            self.cursor = self.cursor.max(update.id);
            if let Some(msg) = update.message {
                self.dispatcher.handle(&msg).await;
            }
        }

        if count > 0 {
            debug!(count, cursor = self.cursor, "processed updates");
        }
        Ok(count)
    }

    /// Transport failures become an empty batch; only a fetch that outlives its
    /// deadline is reported as an error.
    async fn next_batch(&self) -> Result<Vec<IncomingUpdate>> {
        let wait = self.cfg.poll_timeout;
        let deadline = wait + FETCH_GRACE;
        let offset = self.cursor.saturating_add(1);

        let fetch = self
            .messenger
            .fetch_updates(offset, wait, self.cfg.poll_limit);
        match timeout(deadline, fetch).await {
            Ok(Ok(batch)) => Ok(batch),
            Ok(Err(e)) => {
                error!(error = %e, "failed to get updates");
                Ok(Vec::new())
            }
            Err(_) => Err(Error::Timeout(format!(
                "getUpdates gave no answer within {}s",
                deadline.as_secs()
            ))),
        }
    }
}
