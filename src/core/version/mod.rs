pub mod game_version;
pub mod manifest;
pub mod mappings;

pub use game_version::game_version_for;
pub use manifest::{GameVersionJson, VersionEntry, VersionManifest, VERSION_MANIFEST_URL};
pub use mappings::MappingCache;
