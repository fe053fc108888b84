//! The machine-readable catalog written to `.knowledge/index.yaml`.

use std::path::Path;

use knowledge_core::layout;
use knowledge_core::model::{ArtifactRecord, KnowledgeGuide, StaleDetail};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::freshness::CheckedGuide;
use crate::scan::ScanResults;

const HEADER: &str = "# Generated by `knowledge-system refresh`. Do not edit by hand.\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedGuide {
    #[serde(flatten)]
    pub guide: KnowledgeGuide,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stale_details: Vec<StaleDetail>,
}

impl From<CheckedGuide> for IndexedGuide {
    fn from(checked: CheckedGuide) -> Self {
        Self {
            guide: checked.guide,
            stale_details: checked.freshness.details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeIndex {
    pub generated: String,
    #[serde(default)]
    pub guides: Vec<IndexedGuide>,
    #[serde(default)]
    pub conventions: Vec<ArtifactRecord>,
    #[serde(default)]
    pub adrs: Vec<ArtifactRecord>,
    #[serde(default)]
    pub features: Vec<ArtifactRecord>,
}

impl KnowledgeIndex {
    /// Assemble the index from checked guides and the scanned artifacts.
    /// The guides in `scan` are ignored in favor of `guides`.
    pub fn build(generated: String, guides: Vec<CheckedGuide>, scan: ScanResults) -> Self {
        Self {
            generated,
            guides: guides.into_iter().map(IndexedGuide::from).collect(),
            conventions: scan.conventions,
            adrs: scan.adrs,
            features: scan.features,
        }
    }

    pub fn to_yaml(&self) -> Result<String, QueryError> {
        let body = serde_yaml_ng::to_string(self)?;
        Ok(format!("{HEADER}{body}"))
    }

    pub fn write(&self, project_root: &Path) -> Result<(), QueryError> {
        let path = layout::index_path(project_root);
        std::fs::write(&path, self.to_yaml()?)?;
        tracing::info!(
            guides = self.guides.len(),
            conventions = self.conventions.len(),
            adrs = self.adrs.len(),
            features = self.features.len(),
            "Wrote {}",
            path.display()
        );
        Ok(())
    }

    pub fn load(project_root: &Path) -> Result<Self, QueryError> {
        let content = std::fs::read_to_string(layout::index_path(project_root))?;
        Ok(serde_yaml_ng::from_str(&content)?)
    }
}
