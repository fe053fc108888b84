//! Regenerates `.knowledge/index.yaml` and `.knowledge/snapshot.md`.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use knowledge_core::config::ProjectConfig;
use knowledge_core::history::ChangeHistory;
use knowledge_core::layout;
use serde::Serialize;

use crate::error::QueryError;
use crate::freshness::{check_guides, FreshnessChecker, FreshnessSummary};
use crate::index::KnowledgeIndex;
use crate::scan::scan_all;
use crate::snapshot::Snapshot;

/// What a refresh wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub generated: String,
    pub summary: FreshnessSummary,
    pub conventions: usize,
    pub adrs: usize,
    pub features: usize,
}

impl RefreshReport {
    pub fn guides(&self) -> usize {
        self.summary.verified + self.summary.stale + self.summary.unknown
    }
}

/// Scan the project, resolve guide freshness and rewrite both generated files.
pub fn refresh(
    project_root: &Path,
    config: &ProjectConfig,
    history: &dyn ChangeHistory,
    now: DateTime<Utc>,
) -> Result<RefreshReport, QueryError> {
    layout::ensure_initialized(project_root)?;

    let generated = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let mut scan = scan_all(project_root, config);

    let checker = FreshnessChecker::new(project_root, config, history);
    let guides = check_guides(&checker, std::mem::take(&mut scan.guides));
    let summary = FreshnessSummary::tally(&guides);

    Snapshot::collect(project_root, config, &generated, &guides, &scan).write(project_root)?;

    let report = RefreshReport {
        generated: generated.clone(),
        summary,
        conventions: scan.conventions.len(),
        adrs: scan.adrs.len(),
        features: scan.features.len(),
    };
    KnowledgeIndex::build(generated, guides, scan).write(project_root)?;

    tracing::info!(
        guides = report.guides(),
        stale = report.summary.stale,
        "Refreshed knowledge index"
    );
    Ok(report)
}
