use crate::config::ProjectLayout;
use crate::report::{ItemReport, Outcome, RunReport, Summary};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    command: &'a str,
    dry_run: bool,
    #[serde(flatten)]
    report: &'a RunReport,
    summary: Summary,
}

/// Print a run report: pretty JSON on stdout, or a per-group listing on stderr
pub fn print_report(
    command: &str,
    report: &RunReport,
    layout: &ProjectLayout,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let out = JsonReport {
            command,
            dry_run,
            report,
            summary: report.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for group in &report.groups {
        if group.items.is_empty() {
            continue;
        }
        eprintln!("{}:", group.name);
        for item in &group.items {
            eprintln!("  {}", item_line(item, layout));
        }
    }
    eprintln!();
    let prefix = if dry_run { "[DRY RUN] " } else { "" };
    eprintln!("{}{}: {}", prefix, command, report.summary());
    Ok(())
}

fn item_line(item: &ItemReport, layout: &ProjectLayout) -> String {
    let label = match &item.method {
        Some(method) => format!("{} ({})", item.item, method),
        None => item.item.clone(),
    };
    match &item.outcome {
        Outcome::Written { path } => format!("{label}: wrote {}", layout.display_path(path)),
        Outcome::Locked { path } => {
            format!("{label}: locked, kept {}", layout.display_path(path))
        }
        Outcome::DryRun { path } => {
            format!("{label}: would write {}", layout.display_path(path))
        }
        Outcome::Applied => format!("{label}: applied"),
        Outcome::Skipped { reason } => format!("{label}: skipped ({reason})"),
        Outcome::Failed { error } => format!("{label}: FAILED: {error}"),
    }
}
