//! In-memory fakes for the ports, shared by the dispatcher and poller tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

use crate::{
    config::Config,
    domain::ChatId,
    errors::Error,
    messaging::{port::MessagingPort, types::IncomingUpdate},
    monitoring::{port::StatusSource, types::Snapshot},
    Result,
};

pub(crate) const OWNER_CHAT: ChatId = ChatId(42);

pub(crate) fn test_config() -> Arc<Config> {
    let cfg = Config::from_lookup(|key| match key {
        "TELEGRAM_BOT_TOKEN" => Some("123:abc".to_string()),
        "TELEGRAM_CHAT_ID" => Some(OWNER_CHAT.0.to_string()),
        "TELEGRAM_SAFE_LIMIT" => Some("400".to_string()),
        _ => None,
    })
    .unwrap();
    Arc::new(cfg)
}

pub(crate) enum FetchStep {
    Batch(Vec<IncomingUpdate>),
    Fail,
    Hang,
}

#[derive(Default)]
pub(crate) struct FakeMessenger {
    pub sent: Mutex<Vec<(ChatId, String)>>,
    pub offsets: Mutex<Vec<i64>>,
    pub steps: Mutex<VecDeque<FetchStep>>,
    pub fail_sends: bool,
}

impl FakeMessenger {
    pub fn with_steps(steps: impl IntoIterator<Item = FetchStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(ChatId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn offsets(&self) -> Vec<i64> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, html.to_string()));
        if self.fail_sends {
            return Err(Error::External("send refused".to_string()));
        }
        Ok(())
    }

    async fn fetch_updates(
        &self,
        offset: i64,
        _wait: Duration,
        _limit: u8,
    ) -> Result<Vec<IncomingUpdate>> {
        self.offsets.lock().unwrap().push(offset);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(FetchStep::Batch(batch)) => Ok(batch),
            Some(FetchStep::Fail) => Err(Error::External("connection reset".to_string())),
            Some(FetchStep::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Status source returning a fixed snapshot, or failing when there is none.
#[derive(Default)]
pub(crate) struct FakeStatus {
    pub snapshot: Option<Snapshot>,
    pub calls: AtomicUsize,
}

impl FakeStatus {
    pub fn ok(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Default::default()
        }
    }

    pub fn down() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for FakeStatus {
    async fn snapshot(&self) -> Result<Snapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot
            .clone()
            .ok_or_else(|| Error::External("connection refused".to_string()))
    }
}

/// Counts WARN events seen by the current thread's subscriber.
#[derive(Clone, Default)]
pub(crate) struct WarnCounter(pub Arc<AtomicUsize>);

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
