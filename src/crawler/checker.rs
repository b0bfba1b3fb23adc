//! Link status probing
//!
//! A probe asks the server for a link's status with HEAD first. Servers often
//! reject or mishandle HEAD, so any status >= 400 (405 included) is confirmed
//! with a GET before the link is reported. Transport failures yield no status.

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::fetcher::describe_error;

/// Reports the HTTP status of a link
#[async_trait]
pub trait StatusChecker: Send + Sync {
    /// Returns the final status code, or `None` if no response was obtained
    async fn check_status(&self, url: &str) -> Option<u16>;
}

/// Returns true if a probe outcome counts as healthy
///
/// Informational, success, and redirect codes are healthy. A missing status
/// (network failure) is broken.
pub fn is_ok_status(status: Option<u16>) -> bool {
    matches!(status, Some(code) if (100..400).contains(&code))
}

/// Status checker backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpStatusChecker {
    client: Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpStatusChecker {
    /// Creates a checker that makes a single attempt per link
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retries: 0,
            retry_delay: Duration::ZERO,
        }
    }

    /// Creates a checker using the retry settings of `[http]`
    pub fn from_config(client: Client, config: &HttpConfig) -> Self {
        Self::new(client).with_retries(
            config.probe_retries,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    /// Retries network failures up to `retries` extra times
    pub fn with_retries(mut self, retries: u32, delay: Duration) -> Self {
        self.retries = retries;
        self.retry_delay = delay;
        self
    }

    async fn probe(&self, url: &str) -> Result<StatusCode, reqwest::Error> {
        let status = self.client.head(url).send().await?.status();
        if !needs_confirmation(status) {
            return Ok(status);
        }

        debug!("HEAD {} returned {}, confirming with GET", url, status);
        let status = self.client.get(url).send().await?.status();
        Ok(status)
    }
}

#[async_trait]
impl StatusChecker for HttpStatusChecker {
    async fn check_status(&self, url: &str) -> Option<u16> {
        let mut attempt = 0;
        loop {
            match self.probe(url).await {
                Ok(status) => return Some(status.as_u16()),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    debug!(
                        "Probe of {} failed ({}), retry {}/{}",
                        url,
                        describe_error(&e),
                        attempt,
                        self.retries
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    debug!("Probe of {} failed: {}", url, describe_error(&e));
                    return None;
                }
            }
        }
    }
}

/// HEAD answers at or above 400 are not trusted on their own
fn needs_confirmation(status: StatusCode) -> bool {
    status.as_u16() >= 400
}
