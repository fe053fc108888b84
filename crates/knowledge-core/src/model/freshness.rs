use serde::{Deserialize, Serialize};

/// Freshness classification of a guide. There is no error state: every
/// failure path degrades to one of these three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    Verified,
    Stale,
    #[default]
    Unknown,
}

impl FreshnessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Stale => "stale",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FreshnessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a guide was classified stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// A watched path no longer exists on disk.
    Deleted,
    /// A watched path changed after `last_verified`.
    Modified,
    /// A referenced convention has no backing file.
    OrphanedReference,
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Deleted => "deleted",
            Self::Modified => "modified",
            Self::OrphanedReference => "orphaned reference",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleDetail {
    /// The watched path, or the referenced id for orphaned references.
    pub path: String,
    pub reason: StaleReason,
    /// Calendar date (`YYYY-MM-DD`) of the change, for `Modified` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl StaleDetail {
    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: StaleReason::Deleted,
            date: None,
        }
    }

    pub fn modified(path: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: StaleReason::Modified,
            date: Some(date.into()),
        }
    }

    pub fn orphaned(id: impl Into<String>) -> Self {
        Self {
            path: id.into(),
            reason: StaleReason::OrphanedReference,
            date: None,
        }
    }
}

/// Outcome of checking one guide. Computed on demand, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessResult {
    pub status: FreshnessStatus,
    #[serde(default)]
    pub details: Vec<StaleDetail>,
}

impl FreshnessResult {
    pub fn unknown() -> Self {
        Self {
            status: FreshnessStatus::Unknown,
            details: Vec::new(),
        }
    }

    /// `Stale` with the details when there are any, `Verified` otherwise.
    pub fn from_details(details: Vec<StaleDetail>) -> Self {
        let status = if details.is_empty() {
            FreshnessStatus::Verified
        } else {
            FreshnessStatus::Stale
        };
        Self { status, details }
    }

    pub fn is_stale(&self) -> bool {
        self.status == FreshnessStatus::Stale
    }
}
