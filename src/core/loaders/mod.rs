pub mod neoforge;

pub use neoforge::{NeoForgeEndpoints, UserdevDescriptor, VersionSource};
