use std::path::{Path, PathBuf};

use knowledge_core::config::ProjectConfig;
use knowledge_core::frontmatter::{extract_summary, Frontmatter};
use knowledge_core::layout;
use knowledge_core::model::{FreshnessStatus, KnowledgeGuide};

use super::{file_name, has_extension, list_dir, read_entry, Scanner};

/// Markdown guides directly under `.knowledge/guides/`.
pub struct GuideScanner;

impl Scanner for GuideScanner {
    type Record = KnowledgeGuide;

    fn root(&self, project_root: &Path, _config: &ProjectConfig) -> Option<PathBuf> {
        Some(layout::guides_dir(project_root))
    }

    fn entries(&self, root: &Path) -> Vec<PathBuf> {
        list_dir(root)
            .into_iter()
            .filter(|path| path.is_file() && has_extension(path, "md"))
            .collect()
    }

    fn parse(&self, project_root: &Path, entry: &Path) -> Option<KnowledgeGuide> {
        let content = read_entry(entry)?;
        let Some(fm) = Frontmatter::parse(&content) else {
            tracing::debug!("Skipping guide without metadata block: {}", entry.display());
            return None;
        };

        let id = fm.id.unwrap_or_else(|| {
            let name = file_name(entry);
            name.strip_suffix(".md").unwrap_or(name).to_string()
        });
        let title = fm.title.unwrap_or_else(|| id.clone());

        Some(KnowledgeGuide {
            summary: extract_summary(&content),
            path: layout::relative_path(project_root, entry),
            id,
            title,
            topics: fm.topics,
            status: FreshnessStatus::Unknown,
            last_verified: fm.last_verified,
            watched_paths: fm.watched_paths,
            references: fm.references,
        })
    }
}
