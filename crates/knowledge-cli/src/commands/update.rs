use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use knowledge_core::layout;
use knowledge_core::scaffold;

use crate::output::format::format_steps;

pub fn run(project_root: &Path) -> Result<ExitCode> {
    println!("\n  knowledge-system update\n");
    layout::ensure_initialized(project_root)?;

    println!("  Updating templates...");
    let steps = scaffold::update_templates(project_root).context("Failed to update templates")?;
    print!("{}", format_steps(&steps));

    println!("  Updating agent commands...");
    let steps =
        scaffold::update_commands(project_root).context("Failed to update agent commands")?;
    print!("{}", format_steps(&steps));

    println!();
    println!("  Done! Commands and templates updated.");
    println!("  Your existing guides, architecture.md, config, and index are untouched.\n");
    Ok(ExitCode::SUCCESS)
}
