pub mod settings;

pub use settings::{ProjectConfig, SnapshotOptions, SourceDirs};
