use std::collections::HashMap;

use tracing::debug;

use super::manifest::{GameVersionJson, VersionManifest};
use crate::core::downloader::{fetch_json, Fetcher};
use crate::core::error::{LockError, LockResult};

/// Process-lifetime cache of the game manifest and per-version server
/// mappings.
///
/// The manifest is fetched at most once. `manifest` being `Some` is the
/// initialized state, so a manifest that legitimately lists no versions is
/// not fetched again.
#[derive(Debug)]
pub struct MappingCache {
    manifest_url: String,
    manifest: Option<VersionManifest>,
    mappings: HashMap<String, serde_json::Value>,
}

impl MappingCache {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            manifest_url: manifest_url.into(),
            manifest: None,
            mappings: HashMap::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.manifest.is_some()
    }

    async fn manifest<F: Fetcher + ?Sized>(&mut self, fetcher: &F) -> LockResult<&VersionManifest> {
        if self.manifest.is_none() {
            let manifest = VersionManifest::fetch(fetcher, &self.manifest_url).await?;
            self.manifest = Some(manifest);
        }
        Ok(self.manifest.get_or_insert_with(VersionManifest::default))
    }

    /// The `server_mappings` download descriptor for `game_version`.
    pub async fn server_mappings<F: Fetcher + ?Sized>(
        &mut self,
        game_version: &str,
        fetcher: &F,
    ) -> LockResult<serde_json::Value> {
        if let Some(cached) = self.mappings.get(game_version) {
            return Ok(cached.clone());
        }

        let url = self
            .manifest(fetcher)
            .await?
            .find_version(game_version)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| LockError::GameVersionNotFound(game_version.to_string()))?;

        debug!("Fetching version JSON for {}", game_version);
        let version_json: GameVersionJson = fetch_json(fetcher, &url).await?;
        let mappings = version_json
            .downloads
            .server_mappings
            .ok_or_else(|| LockError::MissingServerMappings(game_version.to_string()))?;

        self.mappings
            .insert(game_version.to_string(), mappings.clone());
        Ok(mappings)
    }
}
