use std::path::Path;

use git2::Config;

use crate::layout;

/// Sibling tooling found next to the knowledge system in a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// `_bmad` or `.bmad`, when present.
    pub bmad_dir: Option<String>,
    pub has_speckit: bool,
    pub has_agreements: bool,
    pub has_adr: bool,
    pub has_features: bool,
    pub has_knowledge: bool,
    pub has_agent_commands: bool,
    pub git_user_name: Option<String>,
}

impl Environment {
    /// Probe the project root. Never fails; anything missing reads as absent.
    pub fn detect(project_root: &Path) -> Self {
        let exists = |rel: &str| project_root.join(rel).exists();

        let bmad_dir = ["_bmad", ".bmad"]
            .into_iter()
            .find(|dir| exists(dir))
            .map(String::from);

        let env = Self {
            bmad_dir,
            has_speckit: exists(".specify"),
            has_agreements: exists(layout::DEFAULT_AGREEMENTS_DIR),
            has_adr: exists(layout::DEFAULT_ADR_DIR),
            has_features: exists(layout::DEFAULT_FEATURES_DIR),
            has_knowledge: exists(layout::KNOWLEDGE_DIR),
            has_agent_commands: exists(layout::AGENT_COMMANDS_DIR),
            git_user_name: git_user_name(project_root),
        };
        tracing::debug!(?env, "Detected environment");
        env
    }

    pub fn has_bmad(&self) -> bool {
        self.bmad_dir.is_some()
    }
}

/// `user.name` from the repository config, falling back to the global config.
fn git_user_name(project_root: &Path) -> Option<String> {
    let config = match git2::Repository::discover(project_root) {
        Ok(repo) => repo.config(),
        Err(_) => Config::open_default(),
    };
    config
        .ok()
        .and_then(|c| c.get_string("user.name").ok())
        .filter(|name| !name.trim().is_empty())
}

/// Manifest files at the project root and the stack each one implies.
const STACK_MARKERS: &[(&str, &str)] = &[
    ("Cargo.toml", "Rust"),
    ("package.json", "Node.js"),
    ("tsconfig.json", "TypeScript"),
    ("go.mod", "Go"),
    ("pyproject.toml", "Python"),
    ("requirements.txt", "Python"),
    ("Gemfile", "Ruby"),
    ("pom.xml", "Java (Maven)"),
    ("build.gradle", "JVM (Gradle)"),
    ("build.gradle.kts", "JVM (Gradle)"),
    ("composer.json", "PHP"),
    ("mix.exs", "Elixir"),
    ("Dockerfile", "Docker"),
];

/// A technology detected from a manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub name: &'static str,
    pub manifest: &'static str,
}

/// Stack entries for the manifests present at the project root, in marker
/// order. A name is reported once, with the first manifest that implied it.
pub fn detect_tech_stack(project_root: &Path) -> Vec<StackEntry> {
    let mut stack: Vec<StackEntry> = Vec::new();
    for &(manifest, name) in STACK_MARKERS {
        if !project_root.join(manifest).is_file() {
            continue;
        }
        if stack.iter().any(|entry| entry.name == name) {
            continue;
        }
        stack.push(StackEntry { name, manifest });
    }
    stack
}
