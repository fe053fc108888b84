use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use knowledge_core::detect::Environment;
use knowledge_core::scaffold;

use crate::output::format::{format_environment, format_steps};

#[derive(Args)]
pub struct InitArgs {
    /// Skip BMAD integration even if detected
    #[arg(long)]
    pub skip_bmad: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(project_root: &Path, args: &InitArgs) -> Result<ExitCode> {
    println!("\n  knowledge-system v{}\n", env!("CARGO_PKG_VERSION"));

    let env = Environment::detect(project_root);
    println!("{}", format_environment(&env));

    if env.has_knowledge && !args.yes {
        let answer = ask("  .knowledge/ already exists. Overwrite templates? (y/N) ")?;
        if !confirmed(&answer) {
            println!("  Skipping. Use 'knowledge-system update' to update commands only.\n");
            return Ok(ExitCode::SUCCESS);
        }
    }

    println!("  [1/3] Installing core...");
    let steps = scaffold::install_core(project_root, &env, Utc::now())
        .context("Failed to scaffold .knowledge/")?;
    print!("{}", format_steps(&steps));

    println!("  [2/3] Installing agent commands...");
    let steps = scaffold::install_commands(project_root, &env)
        .context("Failed to install agent commands")?;
    print!("{}", format_steps(&steps));

    println!("  {}", bmad_phase(&env, args.skip_bmad));

    println!();
    println!("  Done! Knowledge System installed.");
    println!("  Config: .knowledge/config.yaml (edit to customize paths)");
    println!();
    println!("  Next steps:");
    println!("    1. Edit .knowledge/architecture.md with your project overview");
    println!("    2. Run /knowledge.refresh to populate snapshot and index");
    println!("    3. Use /k <question> to query the knowledge base");
    println!();
    Ok(ExitCode::SUCCESS)
}

fn ask(question: &str) -> Result<String> {
    print!("{question}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer)
}

fn confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn bmad_phase(env: &Environment, skip_bmad: bool) -> String {
    match (&env.bmad_dir, skip_bmad) {
        (Some(dir), false) => format!("[3/3] BMAD detected ({dir}/), no integration needed."),
        (Some(_), true) => "[3/3] BMAD integration skipped (--skip-bmad).".to_string(),
        (None, _) => "[3/3] No BMAD detected, skipping integration.".to_string(),
    }
}
