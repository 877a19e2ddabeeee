use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::core::downloader::{DigestChecksum, HttpFetcher};
use crate::core::error::LockResult;
use crate::core::http::RetryPolicy;
use crate::core::reconcile::{update_locks, LockPaths, Shutdown, UpdateSummary};
use crate::core::state::UpdaterSettings;

/// Refresh the NeoForge server lockfiles from the upstream Maven.
#[derive(Debug, Parser)]
#[command(name = "neoforge-lock", version)]
pub struct Cli {
    /// Version lockfile
    #[arg(long, value_name = "PATH", default_value = "lock.json")]
    pub lock: PathBuf,
    /// Library lockfile
    #[arg(long, value_name = "PATH", default_value = "libraries.json")]
    pub libraries: PathBuf,
    /// JSON settings file (missing file means defaults)
    #[arg(long, value_name = "PATH", default_value = "neoforge-lock.json")]
    pub config: PathBuf,
    /// Lock `-beta` builds too
    #[arg(long)]
    pub include_prereleases: bool,
    /// Fail on the first transient HTTP error instead of backing off
    #[arg(long)]
    pub no_retry: bool,
    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Settings from `--config`, with command-line flags applied on top.
    pub fn settings(&self) -> UpdaterSettings {
        let mut settings = UpdaterSettings::load(&self.config);
        if self.include_prereleases {
            settings.include_prereleases = true;
        }
        if self.no_retry {
            settings.http.retry = RetryPolicy::none();
        }
        settings
    }

    pub fn paths(&self) -> LockPaths {
        LockPaths {
            versions: self.lock.clone(),
            libraries: self.libraries.clone(),
        }
    }
}

/// Run one update against the live NeoForge and Mojang endpoints.
pub async fn update(cli: &Cli) -> LockResult<UpdateSummary> {
    let settings = cli.settings();
    let fetcher = HttpFetcher::from_settings(
        &settings.http.user_agent,
        settings.http.timeout(),
        settings.http.retry.clone(),
    )?;
    let checksums = DigestChecksum::new(fetcher.clone());

    let shutdown = Shutdown::new();
    shutdown.listen_for_ctrl_c();

    let summary = update_locks(&settings, &cli.paths(), fetcher, checksums, &shutdown).await?;
    info!(
        "{} of {} remote versions locked; libraries: {} resolved, {} reused",
        summary.locked_versions,
        summary.remote_versions,
        summary.libraries_resolved,
        summary.libraries_reused
    );
    Ok(summary)
}
