use std::path::{Path, PathBuf};

use crate::detect::Environment;
use crate::error::CoreError;
use crate::frontmatter::MetadataBlock;
use crate::layout;
use crate::scaffold::CONFIG_TEMPLATE;

const DEFAULT_FRESHNESS_THRESHOLD_DAYS: u32 = 30;
const UNTRACKED: &str = "null";

/// Directories of sibling tooling. `None` means the tool is not tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDirs {
    pub agreements_dir: Option<String>,
    pub adr_dir: Option<String>,
    pub features_dir: Option<String>,
    pub specs_dir: Option<String>,
}

impl Default for SourceDirs {
    fn default() -> Self {
        Self {
            agreements_dir: Some(layout::DEFAULT_AGREEMENTS_DIR.to_string()),
            adr_dir: Some(layout::DEFAULT_ADR_DIR.to_string()),
            features_dir: Some(layout::DEFAULT_FEATURES_DIR.to_string()),
            specs_dir: Some(layout::DEFAULT_SPECS_DIR.to_string()),
        }
    }
}

/// Which sections `refresh` puts into `snapshot.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOptions {
    pub include_conventions: bool,
    pub include_adrs: bool,
    pub include_features: bool,
    pub include_tech_stack: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            include_conventions: true,
            include_adrs: true,
            include_features: true,
            include_tech_stack: true,
        }
    }
}

/// Contents of `.knowledge/config.yaml`, read once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub version: Option<String>,
    /// Advisory only; the freshness check itself compares against Git history.
    pub freshness_threshold_days: u32,
    pub sources: SourceDirs,
    pub snapshot: SnapshotOptions,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            version: None,
            freshness_threshold_days: DEFAULT_FRESHNESS_THRESHOLD_DAYS,
            sources: SourceDirs::default(),
            snapshot: SnapshotOptions::default(),
        }
    }
}

impl ProjectConfig {
    /// Read `.knowledge/config.yaml` under the project root.
    pub fn load(project_root: &Path) -> Result<Self, CoreError> {
        let path = layout::config_path(project_root);
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Self::parse(&content))
    }

    /// Parse config text. Unknown keys are ignored and missing keys take defaults.
    pub fn parse(content: &str) -> Self {
        let block = MetadataBlock::new(content);

        let freshness_threshold_days = block
            .scalar("freshness_threshold_days")
            .and_then(|raw| leading_number(&raw))
            .unwrap_or(DEFAULT_FRESHNESS_THRESHOLD_DAYS);

        Self {
            version: block.scalar("version"),
            freshness_threshold_days,
            sources: SourceDirs {
                agreements_dir: source_dir(&block, "agreements_dir", layout::DEFAULT_AGREEMENTS_DIR),
                adr_dir: source_dir(&block, "adr_dir", layout::DEFAULT_ADR_DIR),
                features_dir: source_dir(&block, "features_dir", layout::DEFAULT_FEATURES_DIR),
                specs_dir: source_dir(&block, "specs_dir", layout::DEFAULT_SPECS_DIR),
            },
            snapshot: SnapshotOptions {
                include_conventions: toggle(&block, "include_conventions"),
                include_adrs: toggle(&block, "include_adrs"),
                include_features: toggle(&block, "include_features"),
                include_tech_stack: toggle(&block, "include_tech_stack"),
            },
        }
    }

    /// Render the initial config for `init`, tracking only detected tools.
    pub fn render_initial(env: &Environment) -> String {
        let dir = |present: bool, default: &str| {
            if present {
                default.to_string()
            } else {
                UNTRACKED.to_string()
            }
        };
        CONFIG_TEMPLATE
            .replace(
                "{{agreements_dir}}",
                &dir(env.has_agreements, layout::DEFAULT_AGREEMENTS_DIR),
            )
            .replace("{{adr_dir}}", &dir(env.has_adr, layout::DEFAULT_ADR_DIR))
            .replace(
                "{{features_dir}}",
                &dir(env.has_features, layout::DEFAULT_FEATURES_DIR),
            )
            .replace("{{specs_dir}}", &dir(env.has_speckit, layout::DEFAULT_SPECS_DIR))
    }

    pub fn agreements_root(&self, project_root: &Path) -> Option<PathBuf> {
        resolve(project_root, self.sources.agreements_dir.as_deref())
    }

    pub fn adr_root(&self, project_root: &Path) -> Option<PathBuf> {
        resolve(project_root, self.sources.adr_dir.as_deref())
    }

    pub fn features_root(&self, project_root: &Path) -> Option<PathBuf> {
        resolve(project_root, self.sources.features_dir.as_deref())
    }
}

fn resolve(project_root: &Path, dir: Option<&str>) -> Option<PathBuf> {
    dir.map(|d| project_root.join(d))
}

/// Absent key: the conventional default. Literal `null`: not tracked.
fn source_dir(block: &MetadataBlock<'_>, key: &str, default: &str) -> Option<String> {
    match block.nested_scalar("sources", key) {
        Some(value) if value == UNTRACKED || value == "~" => None,
        Some(value) => Some(value),
        None => Some(default.to_string()),
    }
}

/// Enabled unless literally `false`.
fn toggle(block: &MetadataBlock<'_>, key: &str) -> bool {
    block.nested_scalar("snapshot", key).as_deref() != Some("false")
}

fn leading_number(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = "\
version: \"1.0\"
freshness_threshold_days: 45
sources:
  agreements_dir: .agreements
  adr_dir: docs/adr
  features_dir: null
  specs_dir: specs
snapshot:
  include_conventions: true
  include_adrs: false
  include_features: \"false\"
  include_tech_stack: yes
";

    #[test]
    fn test_parse_full_config() {
        let config = ProjectConfig::parse(FULL);
        assert_eq!(config.version.as_deref(), Some("1.0"));
        assert_eq!(config.freshness_threshold_days, 45);
        assert_eq!(config.sources.agreements_dir.as_deref(), Some(".agreements"));
        assert_eq!(config.sources.adr_dir.as_deref(), Some("docs/adr"));
        assert_eq!(config.sources.features_dir, None);
        assert!(config.snapshot.include_conventions);
        assert!(!config.snapshot.include_adrs);
        assert!(!config.snapshot.include_features);
        assert!(config.snapshot.include_tech_stack);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = ProjectConfig::parse("");
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.freshness_threshold_days, 30);
    }

    #[test]
    fn test_bad_threshold_defaults() {
        let config = ProjectConfig::parse("freshness_threshold_days: soon\n");
        assert_eq!(config.freshness_threshold_days, 30);
        let config = ProjectConfig::parse("freshness_threshold_days: 14 days\n");
        assert_eq!(config.freshness_threshold_days, 14);
    }

    #[test]
    fn test_load_missing_config() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            ProjectConfig::load(tmp.path()),
            Err(CoreError::ConfigNotFound)
        ));
    }

    #[test]
    fn test_render_initial_roundtrips_through_parse() {
        let env = Environment {
            has_agreements: true,
            has_adr: false,
            has_features: true,
            has_speckit: false,
            ..Default::default()
        };
        let config = ProjectConfig::parse(&ProjectConfig::render_initial(&env));
        assert_eq!(config.sources.agreements_dir.as_deref(), Some(".agreements"));
        assert_eq!(config.sources.adr_dir, None);
        assert_eq!(config.sources.features_dir.as_deref(), Some(".features"));
        assert_eq!(config.sources.specs_dir, None);
        assert_eq!(config.freshness_threshold_days, 30);
        assert!(config.snapshot.include_tech_stack);
    }

    #[test]
    fn test_roots_resolve_against_project() {
        let config = ProjectConfig::parse("sources:\n  adr_dir: null\n");
        let root = Path::new("/repo");
        assert_eq!(config.adr_root(root), None);
        assert_eq!(
            config.agreements_root(root),
            Some(PathBuf::from("/repo/.agreements"))
        );
    }
}
