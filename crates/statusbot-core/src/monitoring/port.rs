use async_trait::async_trait;

use crate::{monitoring::types::Snapshot, Result};

/// Port for the external monitoring API.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch a fresh snapshot of every monitored endpoint.
    async fn snapshot(&self) -> Result<Snapshot>;
}
