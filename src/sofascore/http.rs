//! Paced, permit-gated HTTP access to the statistics API.
//!
//! Every gated request holds one permit from a shared [`PermitPool`] for its
//! duration, sleeps a random delay, then sends a GET with rotated browser
//! headers. Failures never propagate: they are logged and yield `None`.

use crate::cli::types::{EventId, SourcePlayerId, SourceTeamId};
use crate::config::{DelayRange, ScrapeConfig};
use crate::core::browser_headers;
use crate::error::Result;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error};

#[cfg(test)]
mod tests;

/// Bounded pool of request permits shared by every fetch in a run.
#[derive(Debug, Clone)]
pub struct PermitPool {
    semaphore: Arc<Semaphore>,
    size: usize,
}

impl PermitPool {
    pub fn new(size: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Wait for a free permit. The permit returns to the pool when dropped.
    pub async fn acquire(&self) -> std::result::Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.semaphore).acquire_owned().await
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base_url: String,
    pool: PermitPool,
    delay: DelayRange,
}

impl Fetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            pool: PermitPool::new(config.permits),
            delay: config.delay,
        })
    }

    pub fn pool(&self) -> &PermitPool {
        &self.pool
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch `url` while holding one permit from the pool.
    pub async fn fetch(&self, url: &str) -> Option<Value> {
        let _permit = match self.pool.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!(url, error = %e, "Permit pool closed");
                return None;
            }
        };
        self.fetch_ungated(url).await
    }

    /// Fetch `url` without taking a permit. For callers that already hold one.
    pub async fn fetch_ungated(&self, url: &str) -> Option<Value> {
        // ThreadRng is not Send; keep it out of the awaits below
        let (pause, headers) = {
            let mut rng = rand::thread_rng();
            (self.delay.sample(&mut rng), browser_headers(&mut rng))
        };
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }

        debug!(url, delay_ms = pause.as_millis() as u64, "GET");
        let response = match self.client.get(url).headers(headers).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(url, error = %e, "Request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(url, status = status.as_u16(), "Request rejected");
            return None;
        }

        match response.json::<Value>().await {
            Ok(body) => Some(body),
            Err(e) => {
                error!(url, error = %e, "Response body is not JSON");
                None
            }
        }
    }

    /// Gated fetch decoded into `T`.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let body = self.fetch(url).await?;
        decode(url, body)
    }

    /// Ungated fetch decoded into `T`.
    pub async fn get_ungated<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let body = self.fetch_ungated(url).await?;
        decode(url, body)
    }

    pub fn scheduled_events_url(&self, date: NaiveDate) -> String {
        format!(
            "{}/sport/football/scheduled-events/{}",
            self.base_url,
            date.format("%Y-%m-%d")
        )
    }

    /// Second listing for the same day, covering events the first one omits.
    pub fn scheduled_events_inverse_url(&self, date: NaiveDate) -> String {
        format!("{}/inverse", self.scheduled_events_url(date))
    }

    /// Past events of a team, newest page first (page 0).
    pub fn team_events_url(&self, team: SourceTeamId, page: u32) -> String {
        format!("{}/team/{}/events/last/{}", self.base_url, team, page)
    }

    pub fn lineups_url(&self, event: EventId) -> String {
        format!("{}/event/{}/lineups", self.base_url, event)
    }

    pub fn statistics_url(&self, event: EventId) -> String {
        format!("{}/event/{}/statistics", self.base_url, event)
    }

    pub fn player_url(&self, player: SourcePlayerId) -> String {
        format!("{}/player/{}", self.base_url, player)
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: Value) -> Option<T> {
    match serde_json::from_value(body) {
        Ok(v) => Some(v),
        Err(e) => {
            error!(url, error = %e, "Unexpected response shape");
            None
        }
    }
}
