use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::Fetcher;
use crate::core::error::{LockError, LockResult};
use crate::core::http::{build_http_client, RetryPolicy};

/// `reqwest`-backed fetcher with a bounded retry policy.
///
/// Requests are issued one at a time; there is no pooling of in-flight work.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn from_settings(
        user_agent: &str,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> LockResult<Self> {
        let client = build_http_client(user_agent, timeout)?;
        Ok(Self::new(client, policy))
    }

    /// Send a GET, retrying transient statuses and connection failures.
    async fn send(&self, url: &str) -> LockResult<Response> {
        let mut retry = 0u32;

        loop {
            let outcome = self.client.get(url).send().await;

            let retryable = match &outcome {
                Ok(response) => self.policy.is_transient_status(response.status().as_u16()),
                Err(e) => e.is_timeout() || e.is_connect(),
            };

            if retryable && retry < self.policy.retries {
                retry += 1;
                let delay = match &outcome {
                    Ok(response) => self.policy.delay_for(
                        retry,
                        Some(response.status().as_u16()),
                        response
                            .headers()
                            .get(RETRY_AFTER)
                            .and_then(|v| v.to_str().ok()),
                    ),
                    Err(_) => self.policy.backoff(retry),
                };
                match &outcome {
                    Ok(response) => warn!(
                        "GET {} returned {}, retry {}/{} in {:?}",
                        url,
                        response.status(),
                        retry,
                        self.policy.retries,
                        delay
                    ),
                    Err(e) => warn!(
                        "GET {} failed ({}), retry {}/{} in {:?}",
                        url, e, retry, self.policy.retries, delay
                    ),
                }
                tokio::time::sleep(delay).await;
                continue;
            }

            let response = outcome?;
            let status = response.status();
            if !status.is_success() {
                return Err(LockError::RequestFailed {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            debug!("GET {} -> {}", url, status);
            return Ok(response);
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> LockResult<String> {
        Ok(self.send(url).await?.text().await?)
    }

    async fn get_bytes(&self, url: &str) -> LockResult<Vec<u8>> {
        Ok(self.send(url).await?.bytes().await?.to_vec())
    }
}
