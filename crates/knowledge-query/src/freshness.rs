//! Guide freshness: compares a guide's watched paths and references against
//! the filesystem and version-control history.
//!
//! Existence checks always run. Modification checks depend on the optional
//! [`ChangeHistory`] collaborator and are skipped when it has no answer, so a
//! missing Git setup can hide staleness but never invents it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use knowledge_core::config::ProjectConfig;
use knowledge_core::history::ChangeHistory;
use knowledge_core::layout;
use knowledge_core::model::{FreshnessResult, FreshnessStatus, KnowledgeGuide, StaleDetail};
use serde::Serialize;

/// Classifies guides as verified, stale or unknown.
pub struct FreshnessChecker<'a> {
    project_root: &'a Path,
    agreements_root: PathBuf,
    history: &'a dyn ChangeHistory,
}

impl<'a> FreshnessChecker<'a> {
    pub fn new(
        project_root: &'a Path,
        config: &ProjectConfig,
        history: &'a dyn ChangeHistory,
    ) -> Self {
        // Convention references are checked at the conventional location even
        // when agreements are not tracked.
        let agreements_root = config
            .agreements_root(project_root)
            .unwrap_or_else(|| project_root.join(layout::DEFAULT_AGREEMENTS_DIR));
        Self {
            project_root,
            agreements_root,
            history,
        }
    }

    pub fn check(&self, guide: &KnowledgeGuide) -> FreshnessResult {
        if guide.watched_paths.is_empty() {
            return FreshnessResult::unknown();
        }
        let Some(last_verified) = guide.last_verified.as_deref() else {
            return FreshnessResult::unknown();
        };

        let baseline = parse_timestamp(last_verified);
        if baseline.is_none() {
            tracing::debug!(
                guide = %guide.id,
                last_verified,
                "Unparseable last_verified, modification checks skipped"
            );
        }

        let mut details = Vec::new();

        for watched in &guide.watched_paths {
            if !self.project_root.join(watched).exists() {
                details.push(StaleDetail::deleted(watched.as_str()));
                continue;
            }

            let Some(baseline) = baseline else {
                continue;
            };
            if let Some(changed) = self.history.last_change(watched) {
                if changed > baseline {
                    details.push(StaleDetail::modified(
                        watched.as_str(),
                        changed.format("%Y-%m-%d").to_string(),
                    ));
                }
            }
        }

        for convention in &guide.references.conventions {
            let backing = self
                .agreements_root
                .join(convention)
                .join(layout::CONVENTION_FILE);
            if !backing.exists() {
                details.push(StaleDetail::orphaned(convention.as_str()));
            }
        }

        for adr in &guide.references.adrs {
            check_adr_reference(adr);
        }

        let result = FreshnessResult::from_details(details);
        tracing::debug!(guide = %guide.id, status = %result.status, "Checked freshness");
        result
    }
}

/// ADR lifecycle validation belongs to the refresh workflow; the freshness
/// check accepts every ADR reference.
fn check_adr_reference(_adr_id: &str) {}

/// `YYYY-MM-DD` (UTC midnight), a naive `YYYY-MM-DDTHH:MM:SS` (UTC) or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc().fixed_offset())
}

/// A guide together with its freshness; `guide.status` is already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckedGuide {
    pub guide: KnowledgeGuide,
    pub freshness: FreshnessResult,
}

/// Check every guide, keeping scan order.
pub fn check_guides(
    checker: &FreshnessChecker<'_>,
    guides: Vec<KnowledgeGuide>,
) -> Vec<CheckedGuide> {
    guides
        .into_iter()
        .map(|mut guide| {
            let freshness = checker.check(&guide);
            guide.status = freshness.status;
            CheckedGuide { guide, freshness }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FreshnessSummary {
    pub verified: usize,
    pub stale: usize,
    pub unknown: usize,
}

impl FreshnessSummary {
    pub fn tally(checked: &[CheckedGuide]) -> Self {
        checked.iter().fold(Self::default(), |mut summary, c| {
            match c.freshness.status {
                FreshnessStatus::Verified => summary.verified += 1,
                FreshnessStatus::Stale => summary.stale += 1,
                FreshnessStatus::Unknown => summary.unknown += 1,
            }
            summary
        })
    }

    pub fn has_stale(&self) -> bool {
        self.stale > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knowledge_core::history::NoHistory;
    use knowledge_core::model::{References, StaleReason};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// History answering from a fixed table.
    struct FakeHistory(HashMap<String, DateTime<FixedOffset>>);

    impl FakeHistory {
        fn with(path: &str, ts: &str) -> Self {
            let mut map = HashMap::new();
            map.insert(path.to_string(), DateTime::parse_from_rfc3339(ts).unwrap());
            Self(map)
        }
    }

    impl ChangeHistory for FakeHistory {
        fn last_change(&self, path: &str) -> Option<DateTime<FixedOffset>> {
            self.0.get(path).copied()
        }
    }

    fn guide(watched: &[&str], last_verified: Option<&str>) -> KnowledgeGuide {
        KnowledgeGuide {
            id: "guide".into(),
            title: "Guide".into(),
            path: ".knowledge/guides/guide.md".into(),
            summary: String::new(),
            topics: vec![],
            status: FreshnessStatus::Unknown,
            last_verified: last_verified.map(String::from),
            watched_paths: watched.iter().map(|p| p.to_string()).collect(),
            references: References::default(),
        }
    }

    fn project_with(files: &[&str]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        for file in files {
            let path = tmp.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
        tmp
    }

    #[test]
    fn test_no_watched_paths_is_unknown() {
        let tmp = project_with(&[]);
        let config = ProjectConfig::default();
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        let mut g = guide(&[], Some("2024-01-01"));
        g.references.conventions = vec!["conv-missing".into()];
        assert_eq!(checker.check(&g), FreshnessResult::unknown());
    }

    #[test]
    fn test_no_last_verified_is_unknown() {
        let tmp = project_with(&[]);
        let config = ProjectConfig::default();
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        // Even a deleted watched path does not matter without a baseline.
        assert_eq!(
            checker.check(&guide(&["src/gone.js"], None)),
            FreshnessResult::unknown()
        );
    }

    #[test]
    fn test_deleted_path_is_stale() {
        let tmp = project_with(&[]);
        let config = ProjectConfig::default();
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        let result = checker.check(&guide(&["src/a.js"], Some("2024-01-01")));
        assert_eq!(result.status, FreshnessStatus::Stale);
        assert_eq!(result.details, vec![StaleDetail::deleted("src/a.js")]);
    }

    #[test]
    fn test_modified_path_is_stale_with_date() {
        let tmp = project_with(&["src/a.js"]);
        let config = ProjectConfig::default();
        let history = FakeHistory::with("src/a.js", "2024-06-01T00:00:00Z");
        let checker = FreshnessChecker::new(tmp.path(), &config, &history);
        let result = checker.check(&guide(&["src/a.js"], Some("2024-01-01")));
        assert_eq!(result.status, FreshnessStatus::Stale);
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].reason, StaleReason::Modified);
        assert_eq!(result.details[0].date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn test_modification_compares_instants_across_offsets() {
        let tmp = project_with(&["src/a.js", "src/b.js"]);
        let config = ProjectConfig::default();
        let mut history = FakeHistory::with("src/a.js", "2024-01-01T00:00:00Z");
        history.0.insert(
            "src/b.js".into(),
            DateTime::parse_from_rfc3339("2023-12-31T23:00:00-05:00").unwrap(),
        );
        let checker = FreshnessChecker::new(tmp.path(), &config, &history);
        let result = checker.check(&guide(&["src/a.js", "src/b.js"], Some("2024-01-01")));
        // b.js changed at 2024-01-01T04:00Z, after midnight UTC.
        assert_eq!(result.status, FreshnessStatus::Stale);
        assert_eq!(result.details[0].path, "src/b.js");
        assert_eq!(result.details[0].date.as_deref(), Some("2023-12-31"));
    }

    #[test]
    fn test_clean_guide_is_verified() {
        let tmp = project_with(&["src/a.js", ".agreements/conv-x/agreement.yaml"]);
        let config = ProjectConfig::default();
        let history = FakeHistory::with("src/a.js", "2023-06-01T00:00:00Z");
        let checker = FreshnessChecker::new(tmp.path(), &config, &history);
        let mut g = guide(&["src/a.js"], Some("2024-01-01"));
        g.references.conventions = vec!["conv-x".into()];
        g.references.adrs = vec!["adr-does-not-exist".into()];
        let result = checker.check(&g);
        assert_eq!(result.status, FreshnessStatus::Verified);
        assert!(result.details.is_empty());
    }

    #[test]
    fn test_orphaned_convention_reference() {
        let tmp = project_with(&["src/a.js"]);
        let config = ProjectConfig::default();
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        let mut g = guide(&["src/a.js"], Some("2024-01-01"));
        g.references.conventions = vec!["conv-x".into()];
        let result = checker.check(&g);
        assert_eq!(result.status, FreshnessStatus::Stale);
        assert_eq!(result.details, vec![StaleDetail::orphaned("conv-x")]);
        assert_eq!(result.details[0].reason.to_string(), "orphaned reference");
    }

    #[test]
    fn test_orphan_check_uses_configured_agreements_dir() {
        let tmp = project_with(&["src/a.js", "governance/conv-x/agreement.yaml"]);
        let config = ProjectConfig::parse("sources:\n  agreements_dir: governance\n");
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        let mut g = guide(&["src/a.js"], Some("2024-01-01"));
        g.references.conventions = vec!["conv-x".into()];
        assert_eq!(checker.check(&g).status, FreshnessStatus::Verified);
    }

    #[test]
    fn test_missing_history_is_not_staleness() {
        let tmp = project_with(&["src/a.js"]);
        let config = ProjectConfig::default();
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        let result = checker.check(&guide(&["src/a.js"], Some("2024-01-01")));
        assert_eq!(result.status, FreshnessStatus::Verified);
    }

    #[test]
    fn test_unparseable_baseline_still_detects_deletions() {
        let tmp = project_with(&["src/a.js"]);
        let config = ProjectConfig::default();
        let history = FakeHistory::with("src/a.js", "2030-01-01T00:00:00Z");
        let checker = FreshnessChecker::new(tmp.path(), &config, &history);
        let result = checker.check(&guide(&["src/a.js", "src/gone.js"], Some("last week")));
        assert_eq!(result.details, vec![StaleDetail::deleted("src/gone.js")]);
    }

    #[test]
    fn test_check_is_idempotent() {
        let tmp = project_with(&["src/a.js"]);
        let config = ProjectConfig::default();
        let history = FakeHistory::with("src/a.js", "2024-06-01T00:00:00Z");
        let checker = FreshnessChecker::new(tmp.path(), &config, &history);
        let g = guide(&["src/a.js", "src/b.js"], Some("2024-01-01"));
        assert_eq!(checker.check(&g), checker.check(&g));
    }

    #[test]
    fn test_check_guides_and_tally() {
        let tmp = project_with(&["src/a.js"]);
        let config = ProjectConfig::default();
        let checker = FreshnessChecker::new(tmp.path(), &config, &NoHistory);
        let checked = check_guides(
            &checker,
            vec![
                guide(&["src/a.js"], Some("2024-01-01")),
                guide(&["src/gone.js"], Some("2024-01-01")),
                guide(&[], None),
            ],
        );
        assert_eq!(checked[0].guide.status, FreshnessStatus::Verified);
        assert_eq!(checked[1].guide.status, FreshnessStatus::Stale);
        assert_eq!(checked[2].guide.status, FreshnessStatus::Unknown);

        let summary = FreshnessSummary::tally(&checked);
        assert_eq!(
            summary,
            FreshnessSummary {
                verified: 1,
                stale: 1,
                unknown: 1
            }
        );
        assert!(summary.has_stale());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert_eq!(
            parse_timestamp("2024-01-01").unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert_eq!(
            parse_timestamp("2024-01-01T08:30:00").unwrap().to_rfc3339(),
            "2024-01-01T08:30:00+00:00"
        );
        assert_eq!(
            parse_timestamp("2024-01-01T08:30:00+02:00").unwrap().to_rfc3339(),
            "2024-01-01T08:30:00+02:00"
        );
        assert!(parse_timestamp("soon").is_none());
    }
}
