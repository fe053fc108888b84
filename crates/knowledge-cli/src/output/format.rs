use knowledge_core::detect::Environment;
use knowledge_core::model::{FreshnessStatus, StaleDetail, StaleReason};
use knowledge_core::scaffold::Step;
use knowledge_query::{CheckedGuide, FreshnessSummary, RefreshReport};

use super::OutputFormat;

const ID_WIDTH: usize = 24;
/// Continuation indent for stale details: label column plus padded id.
const DETAIL_INDENT: &str = "                                 ";

const REPORT_HEADER: &str = "\n  Knowledge Freshness Report\n  ==========================\n";

pub fn format_check_report(
    checked: &[CheckedGuide],
    summary: &FreshnessSummary,
    fmt: OutputFormat,
) -> String {
    match fmt {
        OutputFormat::Json => format_check_report_json(checked, summary),
        OutputFormat::Text => format_check_report_text(checked, summary),
    }
}

fn format_check_report_text(checked: &[CheckedGuide], summary: &FreshnessSummary) -> String {
    let mut out = String::from(REPORT_HEADER);
    out.push('\n');

    for c in checked {
        let id = format!("{:<ID_WIDTH$}", c.guide.id);
        match c.freshness.status {
            FreshnessStatus::Verified => {
                let last_verified = c.guide.last_verified.as_deref().unwrap_or_default();
                out.push_str(&format!(
                    "  VERIFIED  {id} (last verified: {last_verified})\n"
                ));
            }
            FreshnessStatus::Stale => {
                out.push_str(&format!("  STALE     {id} watched_paths changed:\n"));
                for detail in &c.freshness.details {
                    out.push_str(&format!("{DETAIL_INDENT}- {}\n", format_detail(detail)));
                }
            }
            FreshnessStatus::Unknown => {
                out.push_str(&format!("  UNKNOWN   {id} (no watched_paths defined)\n"));
            }
        }
    }

    out.push_str(&format!(
        "\n  Summary: {} verified, {} stale, {} unknown\n",
        summary.verified, summary.stale, summary.unknown
    ));
    out
}

fn format_detail(detail: &StaleDetail) -> String {
    match (detail.reason, detail.date.as_deref()) {
        (StaleReason::Modified, Some(date)) => format!("{} ({date})", detail.path),
        (reason, _) => format!("{} ({reason})", detail.path),
    }
}

fn format_check_report_json(checked: &[CheckedGuide], summary: &FreshnessSummary) -> String {
    let json = serde_json::json!({
        "guides": checked.iter().map(|c| {
            serde_json::json!({
                "id": c.guide.id,
                "title": c.guide.title,
                "path": c.guide.path,
                "last_verified": c.guide.last_verified,
                "status": c.freshness.status,
                "details": c.freshness.details,
            })
        }).collect::<Vec<_>>(),
        "summary": summary,
    });
    serde_json::to_string_pretty(&json).unwrap_or_default()
}

/// Shown instead of a report when the project has no guides.
pub fn format_no_guides(fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => format_check_report_json(&[], &FreshnessSummary::default()),
        OutputFormat::Text => format!(
            "{REPORT_HEADER}\n  No guides found in .knowledge/guides/\n  Use /knowledge.create to add guides.\n"
        ),
    }
}

pub fn format_refresh_report(report: &RefreshReport, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
        OutputFormat::Text => {
            let s = &report.summary;
            let mut out = String::new();
            out.push_str("\n  Knowledge refreshed.\n\n");
            out.push_str(&format!(
                "    guides       {} ({} verified, {} stale, {} unknown)\n",
                report.guides(),
                s.verified,
                s.stale,
                s.unknown
            ));
            out.push_str(&format!("    conventions  {}\n", report.conventions));
            out.push_str(&format!("    adrs         {}\n", report.adrs));
            out.push_str(&format!("    features     {}\n", report.features));
            out.push_str("\n  write .knowledge/index.yaml\n  write .knowledge/snapshot.md\n");
            if s.stale > 0 {
                out.push_str("\n  Run `knowledge-system check` for stale details.\n");
            }
            out
        }
    }
}

pub fn format_environment(env: &Environment) -> String {
    let yes_no = |present: bool| if present { "yes" } else { "no" };
    let bmad = match &env.bmad_dir {
        Some(dir) => format!("yes ({dir}/)"),
        None => "no".to_string(),
    };

    let mut out = String::from("  Environment detected:\n");
    out.push_str(&format!("    BMAD:            {bmad}\n"));
    out.push_str(&format!("    Spec Kit:        {}\n", yes_no(env.has_speckit)));
    out.push_str(&format!("    Agreements:      {}\n", yes_no(env.has_agreements)));
    out.push_str(&format!("    ADR:             {}\n", yes_no(env.has_adr)));
    out.push_str(&format!("    Features:        {}\n", yes_no(env.has_features)));
    out.push_str(&format!("    Agent commands:  {}\n", yes_no(env.has_agent_commands)));
    if let Some(name) = &env.git_user_name {
        out.push_str(&format!("    Git user:        {name}\n"));
    }
    out
}

pub fn format_steps(steps: &[Step]) -> String {
    steps.iter().map(|step| format!("    {step}\n")).collect()
}
