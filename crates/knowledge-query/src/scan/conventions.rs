use std::path::{Path, PathBuf};

use knowledge_core::config::ProjectConfig;
use knowledge_core::frontmatter::{truncate, MetadataBlock, SUMMARY_MAX_CHARS};
use knowledge_core::layout;
use knowledge_core::model::{ArtifactKind, ArtifactRecord};

use super::{file_name, list_dir, read_entry, title_keywords, Scanner};

const CONVENTION_PREFIX: &str = "conv-";
const RETIRED_STATUSES: &[&str] = &["deprecated", "superseded"];
const STOP_WORDS: &[&str] = &["with", "the", "and", "for"];

/// `conv-*` folders in the agreements directory, each with an `agreement.yaml`.
pub struct ConventionScanner;

impl Scanner for ConventionScanner {
    type Record = ArtifactRecord;

    fn root(&self, project_root: &Path, config: &ProjectConfig) -> Option<PathBuf> {
        config.agreements_root(project_root)
    }

    fn entries(&self, root: &Path) -> Vec<PathBuf> {
        list_dir(root)
            .into_iter()
            .filter(|path| file_name(path).starts_with(CONVENTION_PREFIX) && path.is_dir())
            .map(|dir| dir.join(layout::CONVENTION_FILE))
            .filter(|file| file.is_file())
            .collect()
    }

    fn parse(&self, project_root: &Path, entry: &Path) -> Option<ArtifactRecord> {
        let id = entry.parent().map(file_name)?.to_string();
        let content = read_entry(entry)?;
        let block = MetadataBlock::new(&content);

        let status = block.scalar("status").unwrap_or_else(|| "unknown".into());
        if RETIRED_STATUSES.contains(&status.as_str()) {
            tracing::debug!(id = %id, status = %status, "Skipping retired convention");
            return None;
        }

        let title = block.scalar("title").unwrap_or_else(|| id.clone());
        let intent = block
            .literal("intent")
            .and_then(|text| text.lines().next().map(|line| line.trim().to_string()))
            .unwrap_or_default();

        let tags = block.array("tags");
        let topics = if tags.is_empty() {
            convention_keywords(&title)
        } else {
            tags
        };

        Some(ArtifactRecord {
            kind: ArtifactKind::Convention,
            path: layout::relative_path(project_root, entry),
            summary: truncate(&intent, SUMMARY_MAX_CHARS),
            id,
            title,
            topics,
            status,
        })
    }
}

/// Title keywords without the `Convention:` prefix and common filler words.
fn convention_keywords(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase().replacen("convention:", "", 1);
    title_keywords(&lowered)
        .into_iter()
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan;
    use std::fs;
    use tempfile::TempDir;

    fn write_convention(root: &Path, dir: &str, content: &str) {
        let path = root.join(".agreements").join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("agreement.yaml"), content).unwrap();
    }

    #[test]
    fn test_scan_conventions() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write_convention(
            root,
            "conv-001-error-handling",
            "title: \"Convention: Error handling with thiserror\"\nstatus: active\nintent: |\n  Libraries return typed errors.\n  Binaries wrap them with context.\nrules:\n  - no unwrap\n",
        );
        write_convention(root, "conv-002-old", "title: Old rule\nstatus: deprecated\n");
        write_convention(root, "conv-003-gone", "title: Gone rule\nstatus: superseded\n");
        write_convention(root, "other-004", "title: Not a convention\n");
        fs::create_dir_all(root.join(".agreements/conv-005-empty")).unwrap();

        let records = scan(&ConventionScanner, root, &ProjectConfig::default());
        assert_eq!(records.len(), 1);

        let conv = &records[0];
        assert_eq!(conv.kind, ArtifactKind::Convention);
        assert_eq!(conv.id, "conv-001-error-handling");
        assert_eq!(conv.title, "Convention: Error handling with thiserror");
        assert_eq!(conv.path, ".agreements/conv-001-error-handling/agreement.yaml");
        assert_eq!(conv.summary, "Libraries return typed errors.");
        assert_eq!(conv.status, "active");
        assert_eq!(conv.topics, vec!["error", "handling", "thiserror"]);
    }

    #[test]
    fn test_explicit_tags_win_and_missing_fields_default() {
        let tmp = TempDir::new().unwrap();
        write_convention(tmp.path(), "conv-010", "tags: [api, naming]\n");

        let records = scan(&ConventionScanner, tmp.path(), &ProjectConfig::default());
        assert_eq!(records[0].title, "conv-010");
        assert_eq!(records[0].status, "unknown");
        assert_eq!(records[0].summary, "");
        assert_eq!(records[0].topics, vec!["api", "naming"]);
    }

    #[test]
    fn test_untracked_agreements() {
        let tmp = TempDir::new().unwrap();
        write_convention(tmp.path(), "conv-001", "title: Rule\n");
        let config = ProjectConfig::parse("sources:\n  agreements_dir: null\n");
        assert!(scan(&ConventionScanner, tmp.path(), &config).is_empty());
    }
}
