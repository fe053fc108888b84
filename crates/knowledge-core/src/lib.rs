pub mod config;
pub mod detect;
pub mod error;
pub mod frontmatter;
pub mod history;
pub mod layout;
pub mod model;
pub mod scaffold;

pub use config::ProjectConfig;
pub use detect::Environment;
pub use error::CoreError;
pub use frontmatter::{Frontmatter, MetadataBlock};
pub use history::{ChangeHistory, GitHistory, NoHistory};
