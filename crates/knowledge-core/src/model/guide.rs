use serde::{Deserialize, Serialize};

use super::freshness::FreshnessStatus;

/// Weak cross-references from a guide to governance artifacts, by id.
///
/// Nothing guarantees the referenced artifact still exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct References {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conventions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adrs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl References {
    pub fn is_empty(&self) -> bool {
        self.conventions.is_empty() && self.adrs.is_empty() && self.features.is_empty()
    }
}

/// A knowledge guide under `.knowledge/guides/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeGuide {
    pub id: String,
    pub title: String,
    /// Repository-relative path of the guide file.
    pub path: String,
    pub summary: String,
    #[serde(default)]
    pub topics: Vec<String>,
    /// Always `Unknown` when scanned; set once freshness has been checked.
    pub status: FreshnessStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<String>,
    #[serde(default)]
    pub watched_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "References::is_empty")]
    pub references: References,
}
