use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const APP_USER_AGENT: &str = "neoforge-lock/0.1.0";

/// Retry/backoff applied to every request made by the updater.
///
/// Mirrors a urllib3-style `Retry(total, backoff_factor, status_forcelist)`:
/// after the n-th failed attempt the fetcher sleeps
/// `backoff_factor * 2^(n-1)`, capped at `max_backoff_ms`. A `Retry-After`
/// header on a 429 or 503 replaces the computed backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub retries: u32,
    pub backoff_factor_ms: u64,
    pub max_backoff_ms: u64,
    /// Statuses considered transient.
    pub status_forcelist: Vec<u16>,
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            backoff_factor_ms: 1_000,
            max_backoff_ms: 120_000,
            status_forcelist: vec![429, 500, 502, 503, 504],
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that fails on the first error. Used by tests and `--no-retry`.
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    pub fn is_transient_status(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Delay before retry number `retry` after a response with `status`.
    ///
    /// `retry_after` is the raw `Retry-After` header, if any. Only the
    /// delta-seconds form is understood.
    pub fn delay_for(
        &self,
        retry: u32,
        status: Option<u16>,
        retry_after: Option<&str>,
    ) -> Duration {
        let honoured = self.respect_retry_after && matches!(status, Some(429 | 503));
        match retry_after.and_then(|v| v.trim().parse::<u64>().ok()) {
            Some(secs) if honoured => {
                Duration::from_secs(secs).min(Duration::from_millis(self.max_backoff_ms))
            }
            _ => self.backoff(retry),
        }
    }

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 || self.backoff_factor_ms == 0 {
            return Duration::ZERO;
        }
        let exp = (retry - 1).min(32);
        let ms = self
            .backoff_factor_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(default_headers)
        .timeout(timeout)
        .build()
}
