use crate::core::error::{LockError, LockResult};

/// Derive the Minecraft release a NeoForge version targets.
///
/// NeoForge drops the leading `1.` from the game version: `21.1.172` builds
/// against `1.21.1`, and a `0` minor means the bare release (`20.0.5` →
/// `1.20`).
pub fn game_version_for(loader_version: &str) -> LockResult<String> {
    let mut parts = loader_version.split('.');
    let (major, minor) = match (parts.next(), parts.next()) {
        (Some(major), Some(minor)) if !major.is_empty() && !minor.is_empty() => (major, minor),
        _ => return Err(LockError::InvalidLoaderVersion(loader_version.to_string())),
    };

    if minor == "0" {
        Ok(format!("1.{}", major))
    } else {
        Ok(format!("1.{}.{}", major, minor))
    }
}
