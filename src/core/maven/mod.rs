mod artifact;
mod repository;

pub use artifact::MavenArtifact;
pub use repository::RepositoryRouter;

/// Well-known Maven repositories used by the NeoForge toolchain.
pub const MOJANG_LIBRARIES: &str = "https://libraries.minecraft.net";
pub const NEOFORGE_MAVEN: &str = "https://maven.neoforged.net/releases";

/// Group namespace served by `MOJANG_LIBRARIES` rather than the NeoForge Maven.
pub const MOJANG_NAMESPACE: &str = "com.mojang";
