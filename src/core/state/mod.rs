mod settings;

pub use settings::{HttpSettings, RepositorySettings, UpdaterSettings};
