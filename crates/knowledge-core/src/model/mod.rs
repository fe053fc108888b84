pub mod artifact;
pub mod freshness;
pub mod guide;

pub use artifact::{ArtifactKind, ArtifactRecord};
pub use freshness::{FreshnessResult, FreshnessStatus, StaleDetail, StaleReason};
pub use guide::{KnowledgeGuide, References};
