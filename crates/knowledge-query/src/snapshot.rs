//! The human-readable overview written to `.knowledge/snapshot.md`.

use std::fmt::Write as _;
use std::path::Path;

use knowledge_core::config::{ProjectConfig, SnapshotOptions};
use knowledge_core::detect::{detect_tech_stack, StackEntry};
use knowledge_core::frontmatter::first_paragraph;
use knowledge_core::layout;
use knowledge_core::model::ArtifactRecord;

use crate::error::QueryError;
use crate::freshness::CheckedGuide;
use crate::scan::ScanResults;

/// Everything that goes into one rendering of `snapshot.md`.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub generated: &'a str,
    pub architecture: Option<String>,
    pub guides: &'a [CheckedGuide],
    pub scan: &'a ScanResults,
    pub tech_stack: Vec<StackEntry>,
    pub options: &'a SnapshotOptions,
}

impl<'a> Snapshot<'a> {
    /// Gather the parts read from disk: the architecture overview and, when
    /// enabled, the tech stack.
    pub fn collect(
        project_root: &Path,
        config: &'a ProjectConfig,
        generated: &'a str,
        guides: &'a [CheckedGuide],
        scan: &'a ScanResults,
    ) -> Self {
        let tech_stack = if config.snapshot.include_tech_stack {
            detect_tech_stack(project_root)
        } else {
            Vec::new()
        };
        Self {
            generated,
            architecture: architecture_overview(project_root),
            guides,
            scan,
            tech_stack,
            options: &config.snapshot,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# Project Snapshot\n");
        let _ = writeln!(
            out,
            "> Generated by `knowledge-system refresh` at {}. Do not edit by hand.\n",
            self.generated
        );

        out.push_str("## Architecture\n\n");
        match &self.architecture {
            Some(overview) => {
                let _ = writeln!(out, "{overview}\n");
            }
            None => out.push_str(
                "_No overview yet. Describe the system in `.knowledge/architecture.md`._\n\n",
            ),
        }

        self.render_guides(&mut out);

        if self.options.include_conventions {
            render_artifacts(&mut out, "Conventions", &self.scan.conventions);
        }
        if self.options.include_adrs {
            render_artifacts(&mut out, "Architecture Decisions", &self.scan.adrs);
        }
        if self.options.include_features {
            render_artifacts(&mut out, "Features", &self.scan.features);
        }
        if self.options.include_tech_stack {
            self.render_tech_stack(&mut out);
        }

        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }

    pub fn write(&self, project_root: &Path) -> Result<(), QueryError> {
        let path = layout::snapshot_path(project_root);
        std::fs::write(&path, self.render())?;
        tracing::info!("Wrote {}", path.display());
        Ok(())
    }

    fn render_guides(&self, out: &mut String) {
        out.push_str("## Knowledge Guides\n\n");
        if self.guides.is_empty() {
            out.push_str("_No guides yet. Create one with `/knowledge.create`._\n\n");
            return;
        }
        out.push_str("| Guide | Status | Topics |\n");
        out.push_str("|-------|--------|--------|\n");
        for checked in self.guides {
            let guide = &checked.guide;
            let link = guide
                .path
                .strip_prefix(layout::KNOWLEDGE_DIR)
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(&guide.path);
            let _ = writeln!(
                out,
                "| [{}]({}) | {} | {} |",
                cell(&guide.title),
                link,
                checked.freshness.status,
                cell(&guide.topics.join(", "))
            );
        }
        out.push('\n');
    }

    fn render_tech_stack(&self, out: &mut String) {
        out.push_str("## Tech Stack\n\n");
        if self.tech_stack.is_empty() {
            out.push_str("_No known manifest files found._\n\n");
            return;
        }
        for entry in &self.tech_stack {
            let _ = writeln!(out, "- {} (`{}`)", entry.name, entry.manifest);
        }
        out.push('\n');
    }
}

fn render_artifacts(out: &mut String, heading: &str, records: &[ArtifactRecord]) {
    let _ = writeln!(out, "## {heading}\n");
    if records.is_empty() {
        out.push_str("_None found._\n\n");
        return;
    }
    for record in records {
        let _ = write!(out, "- **{}** {} ({})", record.id, record.title, record.status);
        if !record.summary.is_empty() && record.summary != record.title {
            let _ = write!(out, ": {}", record.summary);
        }
        out.push('\n');
    }
    out.push('\n');
}

/// First paragraph of `architecture.md`, if it has one.
fn architecture_overview(project_root: &Path) -> Option<String> {
    let path = layout::architecture_path(project_root);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("No architecture overview at {}: {e}", path.display());
            return None;
        }
    };
    let overview = first_paragraph(&content);
    (!overview.is_empty()).then_some(overview)
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}
