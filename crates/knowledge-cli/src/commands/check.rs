use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use knowledge_core::config::ProjectConfig;
use knowledge_core::history::open_history;
use knowledge_core::layout;
use knowledge_query::scan::{scan, GuideScanner};
use knowledge_query::{check_guides, FreshnessChecker, FreshnessSummary};

use crate::output::format::{format_check_report, format_no_guides};
use crate::output::OutputFormat;

pub fn run(project_root: &Path, format: OutputFormat) -> Result<ExitCode> {
    layout::ensure_initialized(project_root)?;
    let config = ProjectConfig::load(project_root)?;

    let guides = scan(&GuideScanner, project_root, &config);
    if guides.is_empty() {
        println!("{}", format_no_guides(format));
        return Ok(ExitCode::SUCCESS);
    }

    let history = open_history(project_root);
    let checker = FreshnessChecker::new(project_root, &config, history.as_ref());
    let checked = check_guides(&checker, guides);
    let summary = FreshnessSummary::tally(&checked);

    println!("{}", format_check_report(&checked, &summary, format));

    if summary.has_stale() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
