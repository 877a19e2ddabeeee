// ─── neoforge-lock core ───
// Keeps the NeoForge server lockfiles in step with the upstream Maven.
//
// Architecture:
//   core/
//     downloader/  Fetcher capability, retrying HTTP client, SHA-256 checksums
//     loaders/     NeoForge Maven layout, version listing, userdev descriptor
//     maven/       Coordinate parser and repository routing
//     version/     Mojang manifest, game-version derivation, mappings cache
//     lock/        Ordered lock store and record types
//     libraries    Library lock cache
//     reconcile/   Reconciler, interrupt handling, update run
//     state/       Updater settings

pub mod downloader;
pub mod error;
pub mod http;
pub mod libraries;
pub mod loaders;
pub mod lock;
pub mod maven;
pub mod reconcile;
pub mod state;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;
