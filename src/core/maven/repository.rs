use super::artifact::MavenArtifact;
use super::{MOJANG_LIBRARIES, MOJANG_NAMESPACE, NEOFORGE_MAVEN};

/// Picks the repository an artifact is downloaded from.
///
/// Artifacts whose group starts with `reserved_namespace` live on
/// `secondary`; everything else resolves against `primary`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRouter {
    pub primary: String,
    pub secondary: String,
    pub reserved_namespace: String,
}

impl Default for RepositoryRouter {
    fn default() -> Self {
        Self {
            primary: NEOFORGE_MAVEN.to_string(),
            secondary: MOJANG_LIBRARIES.to_string(),
            reserved_namespace: MOJANG_NAMESPACE.to_string(),
        }
    }
}

impl RepositoryRouter {
    pub fn base_for(&self, artifact: &MavenArtifact) -> &str {
        if artifact.in_namespace(&self.reserved_namespace) {
            &self.secondary
        } else {
            &self.primary
        }
    }

    pub fn url_for(&self, artifact: &MavenArtifact) -> String {
        artifact.url(self.base_for(artifact))
    }
}
