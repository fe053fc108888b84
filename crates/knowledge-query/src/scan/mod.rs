//! Collectors that normalize guides and governance artifacts into records.
//!
//! Scanning never fails: a missing or untracked root yields no records and an
//! unreadable entry is logged and skipped.

pub mod adrs;
pub mod conventions;
pub mod features;
pub mod guides;

use std::path::{Path, PathBuf};

use knowledge_core::config::ProjectConfig;
use knowledge_core::model::{ArtifactRecord, KnowledgeGuide};

pub use adrs::AdrScanner;
pub use conventions::ConventionScanner;
pub use features::FeatureScanner;
pub use guides::GuideScanner;

/// One kind of scannable artifact.
pub trait Scanner {
    type Record;

    /// Directory holding the artifacts, `None` when the kind is not tracked.
    fn root(&self, project_root: &Path, config: &ProjectConfig) -> Option<PathBuf>;

    /// Candidate entries under `root`, in a stable order.
    fn entries(&self, root: &Path) -> Vec<PathBuf>;

    /// Parse one entry; `None` skips it.
    fn parse(&self, project_root: &Path, entry: &Path) -> Option<Self::Record>;

    /// Post-process the parsed records.
    fn finish(&self, records: Vec<Self::Record>) -> Vec<Self::Record> {
        records
    }
}

/// Run a scanner over the project.
pub fn scan<S: Scanner>(scanner: &S, project_root: &Path, config: &ProjectConfig) -> Vec<S::Record> {
    let Some(root) = scanner.root(project_root, config) else {
        return Vec::new();
    };
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "Scan root missing, nothing to scan");
        return Vec::new();
    }

    let records = scanner
        .entries(&root)
        .iter()
        .filter_map(|entry| scanner.parse(project_root, entry))
        .collect();
    scanner.finish(records)
}

/// Everything the knowledge system indexes.
#[derive(Debug, Clone, Default)]
pub struct ScanResults {
    pub guides: Vec<KnowledgeGuide>,
    pub conventions: Vec<ArtifactRecord>,
    pub adrs: Vec<ArtifactRecord>,
    pub features: Vec<ArtifactRecord>,
}

pub fn scan_all(project_root: &Path, config: &ProjectConfig) -> ScanResults {
    ScanResults {
        guides: scan(&GuideScanner, project_root, config),
        conventions: scan(&ConventionScanner, project_root, config),
        adrs: scan(&AdrScanner, project_root, config),
        features: scan(&FeatureScanner, project_root, config),
    }
}

/// Immediate children of `dir`, sorted by file name.
pub(crate) fn list_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot list {}: {e}", dir.display());
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    paths
}

pub(crate) fn read_entry(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!("Skipping unreadable {}: {e}", path.display());
            None
        }
    }
}

pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

pub(crate) fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// Lowercased title words longer than two characters, split on whitespace
/// and `,` `-` `_` `/`.
pub fn title_keywords(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | '_' | '/'))
        .filter(|word| word.chars().count() > 2)
        .map(str::to_string)
        .collect()
}
