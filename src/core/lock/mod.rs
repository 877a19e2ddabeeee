mod model;
mod store;

pub use model::{InstallerLock, LibraryRecord, VersionRecord};
pub use store::LockStore;
