//! HTTP client for the remote schedule feed.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

use super::parse::parse_feed_payload;
use crate::schedule::ScheduleItem;

pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the feed (e.g., "https://schedules.example.com")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: &str, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Fetches the current schedules.
    ///
    /// Never fails: a transport error, a non-2xx status or an unusable
    /// payload are logged and yield an empty list.
    pub async fn fetch_schedules(&self) -> Vec<ScheduleItem> {
        match self.try_fetch_schedules().await {
            Ok(schedules) => {
                info!("Fetched {} schedules from {}", schedules.len(), self.base_url);
                schedules
            }
            Err(e) => {
                error!("Failed to fetch schedules: {:#}", e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_schedules(&self) -> Result<Vec<ScheduleItem>> {
        let url = format!("{}/api/schedules", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to schedule feed")?;

        if !response.status().is_success() {
            bail!("Schedule feed responded with status: {}", response.status());
        }

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse schedule feed response")?;
        Ok(parse_feed_payload(&payload))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
