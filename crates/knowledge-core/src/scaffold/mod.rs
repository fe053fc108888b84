//! Scaffolding of `.knowledge/` and the agent command files.
//!
//! Templates are embedded at build time, so the binary needs no asset
//! directory next to it.

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::ProjectConfig;
use crate::detect::Environment;
use crate::error::CoreError;
use crate::layout;

pub const CONFIG_TEMPLATE: &str = include_str!("templates/config.yaml");
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.yaml");
pub const ARCHITECTURE_TEMPLATE: &str = include_str!("templates/architecture.md");
pub const GUIDE_TEMPLATE: &str = include_str!("templates/guide.tpl.md");

const EMPTY_SNAPSHOT: &str = "# Project Snapshot\n\n> Run `/knowledge.refresh` to populate.\n";

/// A slash-command file installed for coding agents.
#[derive(Debug, Clone, Copy)]
pub struct AgentCommand {
    pub file_name: &'static str,
    pub contents: &'static str,
}

pub const AGENT_COMMANDS: &[AgentCommand] = &[
    AgentCommand {
        file_name: "k.md",
        contents: include_str!("templates/commands/k.md"),
    },
    AgentCommand {
        file_name: "knowledge.refresh.md",
        contents: include_str!("templates/commands/knowledge.refresh.md"),
    },
    AgentCommand {
        file_name: "knowledge.check.md",
        contents: include_str!("templates/commands/knowledge.check.md"),
    },
    AgentCommand {
        file_name: "knowledge.create.md",
        contents: include_str!("templates/commands/knowledge.create.md"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Write,
    Update,
    Skip,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Write => "write",
            Self::Update => "update",
            Self::Skip => "skip",
        })
    }
}

/// One file operation performed (or skipped) while scaffolding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    pub path: String,
    pub note: Option<&'static str>,
}

impl Step {
    fn new(action: Action, path: impl Into<String>) -> Self {
        Self {
            action,
            path: path.into(),
            note: None,
        }
    }

    fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action, self.path)?;
        if let Some(note) = self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Create `.knowledge/` and its files. Existing user content is kept; only
/// the guide template is always rewritten.
pub fn install_core(
    project_root: &Path,
    env: &Environment,
    now: DateTime<Utc>,
) -> Result<Vec<Step>, CoreError> {
    let mut steps = Vec::new();

    let guides_dir = layout::guides_dir(project_root);
    if !guides_dir.is_dir() {
        fs::create_dir_all(&guides_dir)?;
        steps.push(Step::new(Action::Create, display_dir(project_root, &guides_dir)));
    }

    let config_path = layout::config_path(project_root);
    if config_path.exists() {
        steps.push(
            Step::new(Action::Skip, display(project_root, &config_path))
                .with_note("already configured"),
        );
    } else {
        fs::write(&config_path, ProjectConfig::render_initial(env))?;
        steps.push(
            Step::new(Action::Write, display(project_root, &config_path))
                .with_note("paths auto-detected"),
        );
    }

    let index_path = layout::index_path(project_root);
    if index_path.exists() {
        steps.push(
            Step::new(Action::Skip, display(project_root, &index_path))
                .with_note("already exists"),
        );
    } else {
        let generated = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        fs::write(&index_path, INDEX_TEMPLATE.replace("{{generated}}", &generated))?;
        steps.push(Step::new(Action::Write, display(project_root, &index_path)));
    }

    let architecture_path = layout::architecture_path(project_root);
    if architecture_path.exists() {
        steps.push(
            Step::new(Action::Skip, display(project_root, &architecture_path))
                .with_note("already exists"),
        );
    } else {
        fs::write(&architecture_path, ARCHITECTURE_TEMPLATE)?;
        steps.push(
            Step::new(Action::Write, display(project_root, &architecture_path))
                .with_note("scaffold"),
        );
    }

    steps.push(write_guide_template(project_root, Action::Write)?);

    let snapshot_path = layout::snapshot_path(project_root);
    if !snapshot_path.exists() {
        fs::write(&snapshot_path, EMPTY_SNAPSHOT)?;
        steps.push(Step::new(Action::Write, display(project_root, &snapshot_path)).with_note("empty"));
    }

    Ok(steps)
}

/// Install the agent command files into `.claude/commands/`.
pub fn install_commands(project_root: &Path, env: &Environment) -> Result<Vec<Step>, CoreError> {
    let mut steps = Vec::new();
    let commands_dir = project_root.join(layout::AGENT_COMMANDS_DIR);
    if !env.has_agent_commands && !commands_dir.is_dir() {
        fs::create_dir_all(&commands_dir)?;
        steps.push(Step::new(Action::Create, display_dir(project_root, &commands_dir)));
    }
    steps.extend(write_commands(project_root, Action::Write)?);
    Ok(steps)
}

/// Refresh the guide template. Guides, config, index and architecture are
/// never touched.
pub fn update_templates(project_root: &Path) -> Result<Vec<Step>, CoreError> {
    layout::ensure_initialized(project_root)?;
    Ok(vec![write_guide_template(project_root, Action::Update)?])
}

/// Overwrite the agent command files with the bundled versions.
pub fn update_commands(project_root: &Path) -> Result<Vec<Step>, CoreError> {
    layout::ensure_initialized(project_root)?;
    write_commands(project_root, Action::Update)
}

fn write_guide_template(project_root: &Path, action: Action) -> Result<Step, CoreError> {
    let path = layout::guide_template_path(project_root);
    write_file(&path, GUIDE_TEMPLATE)?;
    Ok(Step::new(action, display(project_root, &path)))
}

fn write_commands(project_root: &Path, action: Action) -> Result<Vec<Step>, CoreError> {
    let commands_dir = project_root.join(layout::AGENT_COMMANDS_DIR);
    AGENT_COMMANDS
        .iter()
        .map(|command| {
            let path = commands_dir.join(command.file_name);
            write_file(&path, command.contents)?;
            Ok(Step::new(action, display(project_root, &path)))
        })
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn display(project_root: &Path, path: &Path) -> String {
    layout::relative_path(project_root, path)
}

fn display_dir(project_root: &Path, path: &Path) -> String {
    format!("{}/", display(project_root, path))
}
