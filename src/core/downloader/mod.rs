mod checksum;
mod client;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::core::error::LockResult;

pub use checksum::{sha256_hex, ChecksumSource, DigestChecksum};
pub use client::HttpFetcher;

/// Read-only access to remote metadata.
///
/// The reconciler only ever talks to the network through this trait, so a
/// run can be driven entirely from memory in tests.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the body as text.
    async fn get_text(&self, url: &str) -> LockResult<String>;

    /// GET `url` and return the raw body.
    async fn get_bytes(&self, url: &str) -> LockResult<Vec<u8>>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for &T {
    async fn get_text(&self, url: &str) -> LockResult<String> {
        (**self).get_text(url).await
    }

    async fn get_bytes(&self, url: &str) -> LockResult<Vec<u8>> {
        (**self).get_bytes(url).await
    }
}

/// GET `url` and deserialize the body as JSON.
pub async fn fetch_json<T, F>(fetcher: &F, url: &str) -> LockResult<T>
where
    T: DeserializeOwned,
    F: Fetcher + ?Sized,
{
    let body = fetcher.get_text(url).await?;
    Ok(serde_json::from_str(&body)?)
}
