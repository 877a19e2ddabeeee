use tracing::{debug, info};

use crate::core::downloader::ChecksumSource;
use crate::core::error::LockResult;
use crate::core::lock::{LibraryRecord, LockStore};
use crate::core::maven::{MavenArtifact, RepositoryRouter};

/// Resolved library downloads shared by every version record.
///
/// Backed by the library lockfile, so complete entries from earlier runs are
/// reused without touching the network.
#[derive(Debug)]
pub struct LibraryCache {
    store: LockStore<LibraryRecord>,
    router: RepositoryRouter,
    resolved: usize,
    reused: usize,
}

impl LibraryCache {
    pub fn new(store: LockStore<LibraryRecord>, router: RepositoryRouter) -> Self {
        Self {
            store,
            router,
            resolved: 0,
            reused: 0,
        }
    }

    pub fn store(&self) -> &LockStore<LibraryRecord> {
        &self.store
    }

    /// Coordinates resolved over the network during this run.
    pub fn resolved_count(&self) -> usize {
        self.resolved
    }

    /// Coordinates answered from the lockfile during this run.
    pub fn reused_count(&self) -> usize {
        self.reused
    }

    /// Make sure every coordinate has a complete record and return the
    /// coordinates in their original order.
    pub async fn resolve<C: ChecksumSource + ?Sized>(
        &mut self,
        coordinates: &[String],
        checksums: &C,
    ) -> LockResult<Vec<String>> {
        let mut names = Vec::with_capacity(coordinates.len());

        for coord in coordinates {
            let complete = self
                .store
                .get(coord)
                .is_some_and(LibraryRecord::is_complete);

            if complete {
                self.reused += 1;
            } else {
                let record = self.fetch(coord, checksums).await?;
                self.store.insert(coord.clone(), record);
                self.resolved += 1;
            }
            names.push(coord.clone());
        }

        Ok(names)
    }

    async fn fetch<C: ChecksumSource + ?Sized>(
        &self,
        coord: &str,
        checksums: &C,
    ) -> LockResult<LibraryRecord> {
        let artifact = MavenArtifact::parse(coord)?;
        let url = self.router.url_for(&artifact);
        info!("Resolving library {}", coord);
        let sha256 = checksums.sha256(&url).await?;
        debug!("{} -> {}", coord, url);

        Ok(LibraryRecord {
            name: coord.to_string(),
            url,
            sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LockError;
    use crate::core::testing::FakeChecksums;

    fn coords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn resolves_and_routes_by_namespace() {
        let checksums = FakeChecksums::default();
        let mut cache = LibraryCache::new(LockStore::new(), RepositoryRouter::default());

        let names = cache
            .resolve(
                &coords(&["net.neoforged:bus:8.0.2", "com.mojang:logging:1.2.7"]),
                &checksums,
            )
            .await
            .unwrap();

        assert_eq!(names, ["net.neoforged:bus:8.0.2", "com.mojang:logging:1.2.7"]);
        let bus = cache.store().get("net.neoforged:bus:8.0.2").unwrap();
        assert_eq!(
            bus.url,
            "https://maven.neoforged.net/releases/net/neoforged/bus/8.0.2/bus-8.0.2.jar"
        );
        assert_eq!(bus.sha256, "sha256-of-bus-8.0.2.jar");
        let logging = cache.store().get("com.mojang:logging:1.2.7").unwrap();
        assert_eq!(
            logging.url,
            "https://libraries.minecraft.net/com/mojang/logging/1.2.7/logging-1.2.7.jar"
        );
        assert_eq!(cache.resolved_count(), 2);
    }

    #[tokio::test]
    async fn complete_records_are_not_refetched() {
        let mut store = LockStore::new();
        store.insert(
            "net.neoforged:bus:8.0.2".to_string(),
            LibraryRecord {
                name: "net.neoforged:bus:8.0.2".into(),
                url: "https://pinned/bus.jar".into(),
                sha256: "pinned".into(),
            },
        );
        let checksums = FakeChecksums::default();
        let mut cache = LibraryCache::new(store, RepositoryRouter::default());

        let names = cache
            .resolve(&coords(&["net.neoforged:bus:8.0.2"]), &checksums)
            .await
            .unwrap();

        assert_eq!(names, ["net.neoforged:bus:8.0.2"]);
        assert!(checksums.calls().is_empty());
        assert_eq!(cache.store().get("net.neoforged:bus:8.0.2").unwrap().sha256, "pinned");
        assert_eq!(cache.reused_count(), 1);
    }

    #[tokio::test]
    async fn incomplete_records_are_refetched_in_place() {
        let mut store = LockStore::new();
        store.insert(
            "a:first:1".to_string(),
            LibraryRecord {
                name: "a:first:1".into(),
                url: "https://x".into(),
                sha256: String::new(),
            },
        );
        store.insert("b:second:1".to_string(), LibraryRecord::default());
        let checksums = FakeChecksums::default();
        let mut cache = LibraryCache::new(store, RepositoryRouter::default());

        cache
            .resolve(&coords(&["b:second:1", "a:first:1"]), &checksums)
            .await
            .unwrap();

        assert_eq!(checksums.calls().len(), 2);
        assert!(cache.store().iter().all(|(_, r)| r.is_complete()));
        assert_eq!(
            cache.store().keys().collect::<Vec<_>>(),
            ["a:first:1", "b:second:1"]
        );
    }

    #[tokio::test]
    async fn null_checksum_in_lockfile_is_refetched() {
        let store: LockStore<LibraryRecord> = serde_json::from_str(
            r#"{"a:b:1": {"name": "a:b:1", "url": "https://x/b-1.jar", "sha256": null}}"#,
        )
        .unwrap();
        let checksums = FakeChecksums::default();
        let mut cache = LibraryCache::new(store, RepositoryRouter::default());

        cache.resolve(&coords(&["a:b:1"]), &checksums).await.unwrap();

        assert_eq!(checksums.calls().len(), 1);
        let record = cache.store().get("a:b:1").unwrap();
        assert_eq!(record.sha256, "sha256-of-b-1.jar");
        assert_eq!(cache.resolved_count(), 1);
    }

    #[tokio::test]
    async fn shared_coordinates_resolve_once() {
        let checksums = FakeChecksums::default();
        let mut cache = LibraryCache::new(LockStore::new(), RepositoryRouter::default());
        let list = coords(&["net.neoforged:bus:8.0.2"]);

        cache.resolve(&list, &checksums).await.unwrap();
        cache.resolve(&list, &checksums).await.unwrap();

        assert_eq!(checksums.calls().len(), 1);
    }

    #[tokio::test]
    async fn malformed_coordinate_aborts() {
        let checksums = FakeChecksums::default();
        let mut cache = LibraryCache::new(LockStore::new(), RepositoryRouter::default());
        let err = cache
            .resolve(&coords(&["not-a-coordinate"]), &checksums)
            .await
            .unwrap_err();
        assert!(matches!(err, LockError::InvalidMavenCoordinate(_)));
    }
}
