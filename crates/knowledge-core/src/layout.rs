//! Fixed locations inside a project using the knowledge system.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

pub const KNOWLEDGE_DIR: &str = ".knowledge";
pub const GUIDES_DIR: &str = "guides";
pub const TEMPLATES_DIR: &str = "_templates";
pub const CONFIG_FILE: &str = "config.yaml";
pub const INDEX_FILE: &str = "index.yaml";
pub const SNAPSHOT_FILE: &str = "snapshot.md";
pub const ARCHITECTURE_FILE: &str = "architecture.md";
pub const GUIDE_TEMPLATE_FILE: &str = "guide.tpl.md";
pub const AGENT_COMMANDS_DIR: &str = ".claude/commands";

/// File every convention folder must contain.
pub const CONVENTION_FILE: &str = "agreement.yaml";
/// Default location of convention folders.
pub const DEFAULT_AGREEMENTS_DIR: &str = ".agreements";
pub const DEFAULT_ADR_DIR: &str = ".adr";
pub const DEFAULT_FEATURES_DIR: &str = ".features";
pub const DEFAULT_SPECS_DIR: &str = "specs";

pub fn knowledge_dir(project_root: &Path) -> PathBuf {
    project_root.join(KNOWLEDGE_DIR)
}

pub fn guides_dir(project_root: &Path) -> PathBuf {
    knowledge_dir(project_root).join(GUIDES_DIR)
}

pub fn config_path(project_root: &Path) -> PathBuf {
    knowledge_dir(project_root).join(CONFIG_FILE)
}

pub fn index_path(project_root: &Path) -> PathBuf {
    knowledge_dir(project_root).join(INDEX_FILE)
}

pub fn snapshot_path(project_root: &Path) -> PathBuf {
    knowledge_dir(project_root).join(SNAPSHOT_FILE)
}

pub fn architecture_path(project_root: &Path) -> PathBuf {
    knowledge_dir(project_root).join(ARCHITECTURE_FILE)
}

pub fn guide_template_path(project_root: &Path) -> PathBuf {
    knowledge_dir(project_root)
        .join(TEMPLATES_DIR)
        .join(GUIDE_TEMPLATE_FILE)
}

/// Fail with `NotInitialized` unless `.knowledge/` exists.
pub fn ensure_initialized(project_root: &Path) -> Result<(), CoreError> {
    if knowledge_dir(project_root).is_dir() {
        Ok(())
    } else {
        Err(CoreError::NotInitialized)
    }
}

/// `path` relative to `project_root`, with `/` separators.
pub fn relative_path(project_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(project_root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
