use super::{load_config, output};
use crate::check::{check_connectivity, CheckOptions};
use crate::config::ProjectLayout;
use crate::process::SystemRunner;

pub fn run(
    layout: &ProjectLayout,
    database: Option<String>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(layout)?;
    let runner = SystemRunner::new();
    let options = CheckOptions { dry_run, database };

    let report = check_connectivity(&config, &runner, &options)?;
    output::print_report("check", &report, layout, dry_run, json)
}
