use super::{load_config, output};
use crate::config::ProjectLayout;
use crate::extract::{extract_schemas, DdlOptions};
use crate::ordering::PrefixAllocator;
use crate::process::SystemRunner;

pub fn run(
    layout: &ProjectLayout,
    database: Option<String>,
    dry_run: bool,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(layout)?;
    let runner = SystemRunner::new();
    let allocator = PrefixAllocator::new();
    let options = DdlOptions {
        force,
        dry_run,
        database,
    };

    let run = extract_schemas(&config, layout, &runner, &allocator, &options)?;
    if !json {
        for package in &run.requirements.required_packages {
            eprintln!("Requires package: {}", package);
        }
    }
    output::print_report("ddl", &run.report, layout, dry_run, json)
}
