use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::downloader::{fetch_json, Fetcher};
use crate::core::error::{LockError, LockResult};

/// Release artifacts of `net.neoforged:neoforge`.
pub const NEOFORGE_RELEASES: &str = "https://maven.neoforged.net/releases/net/neoforged/neoforge";
/// Maven API listing every published NeoForge version.
pub const NEOFORGE_VERSIONS_API: &str =
    "https://maven.neoforged.net/api/maven/versions/releases/net/neoforged/neoforge";

/// Where the list of loader versions comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionSource {
    /// `GET {api}` → `{"versions": [...]}`
    #[default]
    Api,
    /// `GET {releases}/maven-metadata.xml`
    MavenMetadata,
}

/// URL layout of the NeoForge Maven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeoForgeEndpoints {
    pub releases: String,
    pub versions_api: String,
}

impl Default for NeoForgeEndpoints {
    fn default() -> Self {
        Self {
            releases: NEOFORGE_RELEASES.to_string(),
            versions_api: NEOFORGE_VERSIONS_API.to_string(),
        }
    }
}

impl NeoForgeEndpoints {
    fn artifact(&self, version: &str, classifier: &str) -> String {
        format!(
            "{}/{}/neoforge-{}-{}.jar",
            self.releases.trim_end_matches('/'),
            version,
            version,
            classifier
        )
    }

    pub fn installer_url(&self, version: &str) -> String {
        self.artifact(version, "installer")
    }

    pub fn installer_sha256_url(&self, version: &str) -> String {
        format!("{}.sha256", self.installer_url(version))
    }

    pub fn userdev_url(&self, version: &str) -> String {
        self.artifact(version, "userdev")
    }

    pub fn maven_metadata_url(&self) -> String {
        format!("{}/maven-metadata.xml", self.releases.trim_end_matches('/'))
    }

    /// Every published loader version, oldest first as the remote lists them.
    pub async fn fetch_versions<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        source: VersionSource,
    ) -> LockResult<Vec<String>> {
        info!("Fetching NeoForge versions");
        let versions = match source {
            VersionSource::Api => {
                let listing: VersionListing = fetch_json(fetcher, &self.versions_api).await?;
                listing.versions
            }
            VersionSource::MavenMetadata => {
                let xml = fetcher.get_text(&self.maven_metadata_url()).await?;
                let metadata: MavenMetadata = quick_xml::de::from_str(&xml)?;
                metadata.versioning.versions.version
            }
        };
        info!("Remote lists {} NeoForge versions", versions.len());
        Ok(versions)
    }

    /// Body of the published `.sha256` for the installer jar.
    pub async fn fetch_installer_sha256<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        version: &str,
    ) -> LockResult<String> {
        let body = fetcher
            .get_text(&self.installer_sha256_url(version))
            .await?;
        Ok(body.trim().to_string())
    }

    /// The userdev `config.json` for `version`, typed and raw.
    pub async fn fetch_userdev<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        version: &str,
    ) -> LockResult<UserdevDescriptor> {
        let jar = fetcher.get_bytes(&self.userdev_url(version)).await?;
        UserdevDescriptor::from_jar(version, &jar)
    }
}

/// Pre-release builds are published with a `-beta` suffix.
pub fn is_prerelease(version: &str) -> bool {
    version.contains("beta")
}

#[derive(Debug, Deserialize)]
struct VersionListing {
    #[serde(default)]
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MavenMetadata {
    versioning: MavenVersioning,
}

#[derive(Debug, Deserialize)]
struct MavenVersioning {
    versions: MavenVersions,
}

#[derive(Debug, Deserialize)]
struct MavenVersions {
    #[serde(rename = "version", default)]
    version: Vec<String>,
}

/// Subset of the userdev `config.json` shipped in `neoforge-<v>-userdev.jar`.
#[derive(Debug, Deserialize)]
pub struct UserdevConfig {
    #[serde(default)]
    pub runs: UserdevRuns,
    #[serde(default)]
    pub libraries: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserdevRuns {
    #[serde(default)]
    pub server: Option<UserdevRun>,
}

#[derive(Debug, Deserialize)]
pub struct UserdevRun {
    #[serde(default)]
    pub main: Option<String>,
}

#[derive(Debug)]
pub struct UserdevDescriptor {
    pub config: UserdevConfig,
    pub raw: serde_json::Value,
}

impl UserdevDescriptor {
    pub fn from_jar(version: &str, jar: &[u8]) -> LockResult<Self> {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(jar))?;
        let mut file = archive.by_name("config.json").map_err(|e| match e {
            zip::result::ZipError::FileNotFound => LockError::MissingDescriptorEntry {
                version: version.to_string(),
                entry: "config.json".to_string(),
            },
            other => LockError::Zip(other),
        })?;

        let mut raw = String::new();
        file.read_to_string(&mut raw).map_err(LockError::from)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> LockResult<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let config = UserdevConfig::deserialize(&value)?;
        Ok(Self { config, raw: value })
    }

    pub fn server_main(&self) -> Option<&str> {
        self.config.runs.server.as_ref()?.main.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{userdev_jar, FakeRemote};
    use serde_json::json;

    #[test]
    fn artifact_urls() {
        let endpoints = NeoForgeEndpoints::default();
        assert_eq!(
            endpoints.installer_url("21.1.172"),
            "https://maven.neoforged.net/releases/net/neoforged/neoforge/21.1.172/neoforge-21.1.172-installer.jar"
        );
        assert_eq!(
            endpoints.installer_sha256_url("21.1.172"),
            "https://maven.neoforged.net/releases/net/neoforged/neoforge/21.1.172/neoforge-21.1.172-installer.jar.sha256"
        );
        assert_eq!(
            endpoints.userdev_url("21.1.172"),
            "https://maven.neoforged.net/releases/net/neoforged/neoforge/21.1.172/neoforge-21.1.172-userdev.jar"
        );
    }

    #[test]
    fn beta_versions_are_prereleases() {
        assert!(is_prerelease("20.2.3-beta"));
        assert!(!is_prerelease("21.1.172"));
    }

    #[tokio::test]
    async fn versions_from_api() {
        let endpoints = NeoForgeEndpoints::default();
        let remote = FakeRemote::new().with_json(
            NEOFORGE_VERSIONS_API,
            json!({"isSnapshot": false, "versions": ["20.2.3-beta", "20.2.86", "21.1.172"]}),
        );
        let versions = endpoints
            .fetch_versions(&remote, VersionSource::Api)
            .await
            .unwrap();
        assert_eq!(versions, ["20.2.3-beta", "20.2.86", "21.1.172"]);
    }

    #[tokio::test]
    async fn versions_from_maven_metadata() {
        let endpoints = NeoForgeEndpoints::default();
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>net.neoforged</groupId>
  <artifactId>neoforge</artifactId>
  <versioning>
    <latest>21.1.172</latest>
    <release>21.1.172</release>
    <versions>
      <version>20.2.86</version>
      <version>21.1.172</version>
    </versions>
    <lastUpdated>20250101000000</lastUpdated>
  </versioning>
</metadata>"#;
        let remote = FakeRemote::new().with_body(&endpoints.maven_metadata_url(), xml);
        let versions = endpoints
            .fetch_versions(&remote, VersionSource::MavenMetadata)
            .await
            .unwrap();
        assert_eq!(versions, ["20.2.86", "21.1.172"]);
    }

    #[tokio::test]
    async fn installer_sha256_is_trimmed() {
        let endpoints = NeoForgeEndpoints::default();
        let remote = FakeRemote::new()
            .with_body(&endpoints.installer_sha256_url("21.1.172"), "deadbeef\n");
        let sum = endpoints
            .fetch_installer_sha256(&remote, "21.1.172")
            .await
            .unwrap();
        assert_eq!(sum, "deadbeef");
    }

    #[test]
    fn userdev_descriptor_from_jar() {
        let config = json!({
            "spec": 2,
            "runs": {"server": {"main": "net.neoforged.devlaunch.Main", "args": []}},
            "libraries": ["com.mojang:logging:1.2.7", "net.neoforged:bus:8.0.2"]
        });
        let descriptor = UserdevDescriptor::from_jar("21.1.172", &userdev_jar(&config)).unwrap();

        assert_eq!(descriptor.server_main(), Some("net.neoforged.devlaunch.Main"));
        assert_eq!(descriptor.config.libraries.len(), 2);
        assert_eq!(descriptor.raw, config);
    }

    #[test]
    fn userdev_without_server_run() {
        let descriptor = UserdevDescriptor::from_json(r#"{"libraries": []}"#).unwrap();
        assert_eq!(descriptor.server_main(), None);
    }

    #[test]
    fn jar_without_config_is_reported() {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer
            .start_file("other.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        let jar = writer.finish().unwrap().into_inner();

        let err = UserdevDescriptor::from_jar("21.1.172", &jar).unwrap_err();
        assert!(matches!(err, LockError::MissingDescriptorEntry { .. }));
    }
}
