use serde::{Deserialize, Serialize};

/// The governance artifacts a guide can cross-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Convention,
    Adr,
    Feature,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Convention => "convention",
            Self::Adr => "adr",
            Self::Feature => "feature",
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only summary of a convention, ADR or feature manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub kind: ArtifactKind,
    pub id: String,
    pub title: String,
    /// Repository-relative path of the backing file.
    pub path: String,
    pub summary: String,
    #[serde(default)]
    pub topics: Vec<String>,
    pub status: String,
}
