pub mod error;
pub mod freshness;
pub mod index;
pub mod refresh;
pub mod scan;
pub mod snapshot;

pub use error::QueryError;
pub use freshness::{check_guides, CheckedGuide, FreshnessChecker, FreshnessSummary};
pub use index::KnowledgeIndex;
pub use refresh::{refresh, RefreshReport};
pub use scan::{scan_all, ScanResults, Scanner};
