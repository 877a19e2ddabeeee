use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::core::error::{LockError, LockResult};

/// Insertion-ordered map persisted as a pretty JSON object.
///
/// Keys keep the position of their first insertion, so rewriting a loaded
/// lockfile reproduces it byte for byte.
#[derive(Debug, Clone, PartialEq)]
pub struct LockStore<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
}

impl<T> Default for LockStore<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T> LockStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Insert or replace `key`. A replaced key keeps its original position.
    pub fn insert(&mut self, key: String, value: T) -> Option<T> {
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|v| (k.as_str(), v)))
    }
}

impl<T: Serialize + DeserializeOwned> LockStore<T> {
    /// Load a lockfile. A missing or blank file yields an empty store.
    pub async fn load(path: &Path) -> LockResult<Self> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No lockfile at {:?}, starting empty", path);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(LockError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(Self::new());
        }

        let store: Self = serde_json::from_str(&raw)?;
        debug!("Loaded {} entries from {:?}", store.len(), path);
        Ok(store)
    }

    /// Render as 2-space indented JSON with a trailing newline.
    pub fn to_json(&self) -> LockResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Overwrite `path` atomically: write a sibling temp file, then rename.
    pub async fn save(&self, path: &Path) -> LockResult<()> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LockError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let tmp = temp_path(path);
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| LockError::Io {
                path: tmp.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| LockError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!("Wrote {} entries to {:?}", self.len(), path);
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "lock.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

impl<T: Serialize> Serialize for LockStore<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

struct LockStoreVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for LockStoreVisitor<T> {
    type Value = LockStore<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object of lock entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut store = LockStore::new();
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            store.insert(key, value);
        }
        Ok(store)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for LockStore<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LockStoreVisitor(PhantomData))
    }
}
