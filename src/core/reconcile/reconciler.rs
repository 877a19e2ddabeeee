use tracing::{debug, info};

use super::shutdown::Shutdown;
use crate::core::downloader::{ChecksumSource, Fetcher};
use crate::core::error::LockResult;
use crate::core::libraries::LibraryCache;
use crate::core::loaders::neoforge::{is_prerelease, NeoForgeEndpoints, VersionSource};
use crate::core::lock::{InstallerLock, LockStore, VersionRecord};
use crate::core::version::{game_version_for, MappingCache};

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Versions inserted this run, in remote order.
    pub added: Vec<String>,
    /// Versions already present in the lock.
    pub skipped: usize,
    /// Pre-release versions ignored.
    pub filtered: usize,
    pub interrupted: bool,
}

/// Merges remote NeoForge versions into a version lock.
///
/// Existing records are never revisited: the first record written for a
/// version is the one that stays.
pub struct Reconciler<F, C> {
    fetcher: F,
    checksums: C,
    endpoints: NeoForgeEndpoints,
    include_prereleases: bool,
    libraries: LibraryCache,
    mappings: MappingCache,
}

impl<F: Fetcher, C: ChecksumSource> Reconciler<F, C> {
    pub fn new(
        fetcher: F,
        checksums: C,
        endpoints: NeoForgeEndpoints,
        libraries: LibraryCache,
        mappings: MappingCache,
    ) -> Self {
        Self {
            fetcher,
            checksums,
            endpoints,
            include_prereleases: false,
            libraries,
            mappings,
        }
    }

    pub fn with_prereleases(mut self, include: bool) -> Self {
        self.include_prereleases = include;
        self
    }

    pub fn libraries(&self) -> &LibraryCache {
        &self.libraries
    }

    pub fn into_libraries(self) -> LibraryCache {
        self.libraries
    }

    pub async fn remote_versions(&self, source: VersionSource) -> LockResult<Vec<String>> {
        self.endpoints.fetch_versions(&self.fetcher, source).await
    }

    /// Build the record for one loader version from its remote artifacts.
    pub async fn lock_version(&mut self, version: &str) -> LockResult<VersionRecord> {
        let game_version = game_version_for(version)?;
        info!("Locking NeoForge {} (Minecraft {})", version, game_version);

        let installer = InstallerLock {
            url: self.endpoints.installer_url(version),
            sha256: self
                .endpoints
                .fetch_installer_sha256(&self.fetcher, version)
                .await?,
        };

        let descriptor = self.endpoints.fetch_userdev(&self.fetcher, version).await?;
        let libraries = self
            .libraries
            .resolve(&descriptor.config.libraries, &self.checksums)
            .await?;
        let mappings = self
            .mappings
            .server_mappings(&game_version, &self.fetcher)
            .await?;

        Ok(VersionRecord {
            installer,
            mappings,
            main_class: descriptor.server_main().map(str::to_owned),
            libraries,
            full: descriptor.raw,
        })
    }

    /// Insert a record for every listed version missing from `lock`.
    ///
    /// Stops before the next version once `shutdown` fires; a version still
    /// being fetched at that moment is dropped. The first failing version
    /// aborts the pass, leaving everything inserted before it in `lock`.
    pub async fn reconcile(
        &mut self,
        lock: &mut LockStore<VersionRecord>,
        versions: &[String],
        shutdown: &Shutdown,
    ) -> LockResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for version in versions {
            if shutdown.is_triggered() {
                report.interrupted = true;
                break;
            }

            if !self.include_prereleases && is_prerelease(version) {
                report.filtered += 1;
                continue;
            }

            if lock.contains_key(version) {
                debug!("{} already locked", version);
                report.skipped += 1;
                continue;
            }

            let record = tokio::select! {
                biased;
                _ = shutdown.wait() => None,
                record = self.lock_version(version) => Some(record?),
            };

            let Some(record) = record else {
                report.interrupted = true;
                break;
            };

            lock.insert(version.clone(), record);
            report.added.push(version.clone());
        }

        Ok(report)
    }
}
