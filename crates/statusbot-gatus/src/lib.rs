//! Gatus adapter: reads endpoint statuses from `/api/v1/endpoints/statuses`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use statusbot_core::{
    errors::Error,
    monitoring::{port::StatusSource, types::Snapshot},
    Result,
};

const STATUSES_PATH: &str = "/api/v1/endpoints/statuses";

#[derive(Clone, Debug)]
pub struct GatusClient {
    statuses_url: String,
    http: reqwest::Client,
}

impl GatusClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("statusbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::External(format!("gatus client build error: {e}")))?;

        Ok(Self {
            statuses_url: statuses_url(base_url),
            http,
        })
    }

    pub fn statuses_url(&self) -> &str {
        &self.statuses_url
    }
}

fn statuses_url(base_url: &str) -> String {
    format!("{}{STATUSES_PATH}", base_url.trim().trim_end_matches('/'))
}

fn decode(body: &str) -> Result<Snapshot> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl StatusSource for GatusClient {
    async fn snapshot(&self) -> Result<Snapshot> {
        let resp = self
            .http
            .get(&self.statuses_url)
            .send()
            .await
            .map_err(|e| Error::External(format!("gatus request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::External(format!(
                "gatus returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::External(format!("gatus read error: {e}")))?;
        let snapshot = decode(&body)?;

        debug!(endpoints = snapshot.len(), "fetched gatus snapshot");
        Ok(snapshot)
    }
}
