use std::collections::HashSet;
use std::path::{Path, PathBuf};

use knowledge_core::config::ProjectConfig;
use knowledge_core::frontmatter::{extract_summary, extract_title, Frontmatter};
use knowledge_core::layout;
use knowledge_core::model::{ArtifactKind, ArtifactRecord};
use walkdir::WalkDir;

use super::{file_name, has_extension, read_entry, title_keywords, Scanner};

/// Scope tiers in priority order: on duplicate ids the earlier tier wins.
const SCOPE_TIERS: &[&str] = &["global", "domain", "local"];
const EXCLUDED_FILES: &[&str] = &["template.md", "index.md", "README.md"];

/// Architecture decision records under the ADR directory's scope tiers.
pub struct AdrScanner;

impl Scanner for AdrScanner {
    type Record = ArtifactRecord;

    fn root(&self, project_root: &Path, config: &ProjectConfig) -> Option<PathBuf> {
        config.adr_root(project_root)
    }

    fn entries(&self, root: &Path) -> Vec<PathBuf> {
        SCOPE_TIERS
            .iter()
            .map(|tier| root.join(tier))
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| {
                WalkDir::new(dir)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|entry| match entry {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            tracing::warn!("Skipping unreadable ADR entry: {e}");
                            None
                        }
                    })
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_extension(path, "md") && !EXCLUDED_FILES.contains(&file_name(path)))
            .collect()
    }

    fn parse(&self, project_root: &Path, entry: &Path) -> Option<ArtifactRecord> {
        let content = read_entry(entry)?;
        let Some(fm) = Frontmatter::parse(&content) else {
            tracing::debug!("Skipping ADR without metadata block: {}", entry.display());
            return None;
        };

        let id = fm.id.unwrap_or_else(|| {
            let name = file_name(entry);
            name.strip_suffix(".md").unwrap_or(name).to_string()
        });
        let title = fm
            .title
            .or_else(|| extract_title(&content))
            .unwrap_or_else(|| id.clone());
        let topics = if fm.tags.is_empty() {
            title_keywords(&title)
        } else {
            fm.tags
        };

        Some(ArtifactRecord {
            kind: ArtifactKind::Adr,
            path: layout::relative_path(project_root, entry),
            summary: extract_summary(&content),
            status: fm.status.unwrap_or_else(|| "unknown".into()),
            id,
            title,
            topics,
        })
    }

    /// Keep the first record per id.
    fn finish(&self, records: Vec<ArtifactRecord>) -> Vec<ArtifactRecord> {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .filter(|record| seen.insert(record.id.clone()))
            .collect()
    }
}
