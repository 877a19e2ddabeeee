use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::Fetcher;
use crate::core::error::LockResult;

/// Produces the SHA-256 of a remote artifact.
#[async_trait]
pub trait ChecksumSource: Send + Sync {
    async fn sha256(&self, url: &str) -> LockResult<String>;
}

#[async_trait]
impl<T: ChecksumSource + ?Sized> ChecksumSource for &T {
    async fn sha256(&self, url: &str) -> LockResult<String> {
        (**self).sha256(url).await
    }
}

/// Downloads the artifact and hashes it in memory.
#[derive(Debug, Clone)]
pub struct DigestChecksum<F> {
    fetcher: F,
}

impl<F: Fetcher> DigestChecksum<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: Fetcher> ChecksumSource for DigestChecksum<F> {
    async fn sha256(&self, url: &str) -> LockResult<String> {
        let bytes = self.fetcher.get_bytes(url).await?;
        let digest = sha256_hex(&bytes);
        debug!("sha256 {} = {}", url, digest);
        Ok(digest)
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
