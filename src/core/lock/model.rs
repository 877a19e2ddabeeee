use serde::{Deserialize, Deserializer, Serialize};

/// Installer jar pinned for one loader version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallerLock {
    pub url: String,
    pub sha256: String,
}

/// Lock entry for a single loader version. Written once, never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub installer: InstallerLock,
    /// Mojang `server_mappings` download for the matching game version.
    pub mappings: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
    /// The userdev descriptor the record was derived from.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub full: serde_json::Value,
}

/// Resolved download for a library coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sha256: String,
}

/// `null` reads as a blank field, which marks the record incomplete.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl LibraryRecord {
    /// A record with any blank field was interrupted or failed and must be
    /// resolved again.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty() && !self.sha256.is_empty()
    }
}
