use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use knowledge_core::config::ProjectConfig;
use knowledge_core::history::open_history;
use knowledge_core::layout;

use crate::output::format::format_refresh_report;
use crate::output::OutputFormat;

pub fn run(project_root: &Path, format: OutputFormat) -> Result<ExitCode> {
    layout::ensure_initialized(project_root)?;
    let config = ProjectConfig::load(project_root)?;
    let history = open_history(project_root);

    let report = knowledge_query::refresh(project_root, &config, history.as_ref(), Utc::now())
        .context("Failed to refresh the knowledge index")?;

    println!("{}", format_refresh_report(&report, format));
    Ok(ExitCode::SUCCESS)
}
