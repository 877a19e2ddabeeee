mod reconciler;
mod shutdown;

use std::path::PathBuf;

use tracing::{error, info, warn};

pub use reconciler::{ReconcileReport, Reconciler};
pub use shutdown::Shutdown;

use crate::core::downloader::{ChecksumSource, Fetcher};
use crate::core::error::LockResult;
use crate::core::libraries::LibraryCache;
use crate::core::lock::{LibraryRecord, LockStore, VersionRecord};
use crate::core::state::UpdaterSettings;
use crate::core::version::MappingCache;

/// Lockfiles read at the start of a run and rewritten at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockPaths {
    pub versions: PathBuf,
    pub libraries: PathBuf,
}

impl Default for LockPaths {
    fn default() -> Self {
        Self {
            versions: PathBuf::from("lock.json"),
            libraries: PathBuf::from("libraries.json"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub report: ReconcileReport,
    pub remote_versions: usize,
    pub locked_versions: usize,
    pub libraries_resolved: usize,
    pub libraries_reused: usize,
}

/// One full update: load both lockfiles, merge the remote state in and write
/// them back.
///
/// The lockfiles are rewritten whether the pass completed, was interrupted or
/// failed part way; a failure is returned after the write.
pub async fn update_locks<F, C>(
    settings: &UpdaterSettings,
    paths: &LockPaths,
    fetcher: F,
    checksums: C,
    shutdown: &Shutdown,
) -> LockResult<UpdateSummary>
where
    F: Fetcher,
    C: ChecksumSource,
{
    let mut lock = LockStore::<VersionRecord>::load(&paths.versions).await?;
    let libraries = LockStore::<LibraryRecord>::load(&paths.libraries).await?;
    info!(
        "Starting fetch ({} versions, {} libraries already locked)",
        lock.len(),
        libraries.len()
    );

    let mut reconciler = Reconciler::new(
        fetcher,
        checksums,
        settings.endpoints(),
        LibraryCache::new(libraries, settings.router()),
        MappingCache::new(settings.manifest_url.clone()),
    )
    .with_prereleases(settings.include_prereleases);

    let versions = tokio::select! {
        biased;
        _ = shutdown.wait() => None,
        versions = reconciler.remote_versions(settings.version_source) => Some(versions?),
    };

    let Some(versions) = versions else {
        warn!("Interrupted before the version list arrived; nothing to write");
        return Ok(UpdateSummary {
            report: ReconcileReport {
                interrupted: true,
                ..ReconcileReport::default()
            },
            locked_versions: lock.len(),
            ..UpdateSummary::default()
        });
    };

    let outcome = reconciler.reconcile(&mut lock, &versions, shutdown).await;
    let cache = reconciler.into_libraries();

    if let Err(e) = &outcome {
        error!("Update failed, saving progress before exiting: {}", e);
    }
    // Libraries first: a version record must never outlive its libraries.
    let saved = match cache.store().save(&paths.libraries).await {
        Ok(()) => lock.save(&paths.versions).await,
        Err(e) => Err(e),
    };

    let report = match (outcome, saved) {
        (Ok(report), Ok(())) => report,
        (Ok(_), Err(save_err)) => return Err(save_err),
        (Err(e), Ok(())) => return Err(e),
        (Err(e), Err(save_err)) => {
            error!("Could not save progress either: {}", save_err);
            return Err(e);
        }
    };
    if report.interrupted {
        warn!(
            "Interrupted after locking {} new versions; partial progress saved",
            report.added.len()
        );
    }
    info!(
        "Locked {} new versions ({} skipped, {} pre-releases ignored)",
        report.added.len(),
        report.skipped,
        report.filtered
    );

    Ok(UpdateSummary {
        remote_versions: versions.len(),
        locked_versions: lock.len(),
        libraries_resolved: cache.resolved_count(),
        libraries_reused: cache.reused_count(),
        report,
    })
}
