use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::http::{RetryPolicy, APP_USER_AGENT};
use crate::core::loaders::neoforge::{
    NeoForgeEndpoints, VersionSource, NEOFORGE_RELEASES, NEOFORGE_VERSIONS_API,
};
use crate::core::maven::{RepositoryRouter, MOJANG_LIBRARIES, MOJANG_NAMESPACE, NEOFORGE_MAVEN};
use crate::core::version::VERSION_MANIFEST_URL;

/// Tunables for an update run. Every field has a default, so a settings
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterSettings {
    pub releases_endpoint: String,
    pub versions_api: String,
    pub manifest_url: String,
    pub version_source: VersionSource,
    pub include_prereleases: bool,
    pub repositories: RepositorySettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    pub primary: String,
    pub secondary: String,
    /// Group prefix routed to `secondary`.
    pub reserved_namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub retry: RetryPolicy,
}

impl Default for UpdaterSettings {
    fn default() -> Self {
        Self {
            releases_endpoint: NEOFORGE_RELEASES.to_string(),
            versions_api: NEOFORGE_VERSIONS_API.to_string(),
            manifest_url: VERSION_MANIFEST_URL.to_string(),
            version_source: VersionSource::default(),
            include_prereleases: false,
            repositories: RepositorySettings::default(),
            http: HttpSettings::default(),
        }
    }
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            primary: NEOFORGE_MAVEN.to_string(),
            secondary: MOJANG_LIBRARIES.to_string(),
            reserved_namespace: MOJANG_NAMESPACE.to_string(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: APP_USER_AGENT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl UpdaterSettings {
    /// Read settings from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("No settings at {:?} ({}), using defaults", path, e);
                return Self::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn endpoints(&self) -> NeoForgeEndpoints {
        NeoForgeEndpoints {
            releases: self.releases_endpoint.clone(),
            versions_api: self.versions_api.clone(),
        }
    }

    pub fn router(&self) -> RepositoryRouter {
        RepositoryRouter {
            primary: self.repositories.primary.clone(),
            secondary: self.repositories.secondary.clone(),
            reserved_namespace: self.repositories.reserved_namespace.clone(),
        }
    }
}
