use std::path::{Path, PathBuf};

use knowledge_core::config::ProjectConfig;
use knowledge_core::frontmatter::MetadataBlock;
use knowledge_core::layout;
use knowledge_core::model::{ArtifactKind, ArtifactRecord};

use super::{file_name, has_extension, list_dir, read_entry, title_keywords, Scanner};

const EXCLUDED_FILES: &[&str] = &["config.yaml", "index.yaml"];

/// Feature manifests (`*.yaml`) directly under the features directory.
pub struct FeatureScanner;

impl Scanner for FeatureScanner {
    type Record = ArtifactRecord;

    fn root(&self, project_root: &Path, config: &ProjectConfig) -> Option<PathBuf> {
        config.features_root(project_root)
    }

    fn entries(&self, root: &Path) -> Vec<PathBuf> {
        list_dir(root)
            .into_iter()
            .filter(|path| {
                path.is_file()
                    && has_extension(path, "yaml")
                    && !EXCLUDED_FILES.contains(&file_name(path))
            })
            .collect()
    }

    fn parse(&self, project_root: &Path, entry: &Path) -> Option<ArtifactRecord> {
        let content = read_entry(entry)?;
        let block = MetadataBlock::new(&content);

        // No filename fallback: a manifest must declare its id.
        let Some(id) = block.scalar("feature_id") else {
            tracing::debug!("Skipping feature without feature_id: {}", entry.display());
            return None;
        };
        let title = block.scalar("title").unwrap_or_else(|| id.clone());
        // `stage` usually sits under a `lifecycle:` block.
        let stage = block
            .scalar_at_any_depth("stage")
            .unwrap_or_else(|| "unknown".into());

        let tags = block.inline_array("tags");
        let topics = if tags.is_empty() {
            title_keywords(&title)
        } else {
            tags
        };

        Some(ArtifactRecord {
            kind: ArtifactKind::Feature,
            path: layout::relative_path(project_root, entry),
            summary: format!("Feature {id}: {title} ({stage})"),
            id,
            title,
            topics,
            status: stage,
        })
    }
}
