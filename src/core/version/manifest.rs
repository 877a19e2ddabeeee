// ─── Version Manifest ───
// Mojang version manifest v2 and the per-version JSON fields the lock needs.

use serde::Deserialize;
use tracing::info;

use crate::core::downloader::{fetch_json, Fetcher};
use crate::core::error::LockResult;

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Default, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    pub url: String,
}

impl VersionManifest {
    pub async fn fetch<F: Fetcher + ?Sized>(fetcher: &F, url: &str) -> LockResult<Self> {
        info!("Fetching Minecraft version manifest...");
        let manifest: VersionManifest = fetch_json(fetcher, url).await?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Find a specific version entry by ID (e.g. "1.21.1").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }
}

/// Subset of a Mojang version JSON.
#[derive(Debug, Deserialize)]
pub struct GameVersionJson {
    #[serde(default)]
    pub downloads: GameDownloads,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameDownloads {
    /// Kept opaque; copied verbatim into the lock.
    #[serde(default)]
    pub server_mappings: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_manifest_entry() {
        let json = r#"{
            "id": "1.21.1",
            "type": "release",
            "url": "https://example.com/1.21.1.json",
            "time": "2024-08-08T12:24:45+00:00",
            "releaseTime": "2024-08-08T12:24:45+00:00",
            "sha1": "abc123",
            "complianceLevel": 1
        }"#;
        let entry: VersionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "1.21.1");
        assert_eq!(entry.url, "https://example.com/1.21.1.json");
    }

    #[test]
    fn server_mappings_are_optional() {
        let with: GameVersionJson = serde_json::from_str(
            r#"{"downloads": {"server_mappings": {"sha1": "aa", "size": 7, "url": "https://m/x.txt"}}}"#,
        )
        .unwrap();
        assert_eq!(with.downloads.server_mappings.unwrap()["size"], 7);

        let without: GameVersionJson = serde_json::from_str(r#"{"id": "1.12"}"#).unwrap();
        assert!(without.downloads.server_mappings.is_none());
    }
}
