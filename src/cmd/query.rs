use super::glob_util::expand_template_arg;
use super::{load_config, output};
use crate::config::ProjectLayout;
use crate::extract::{extract_queries, list_templates, QueryOptions};
use crate::process::SystemRunner;

pub fn run(
    layout: &ProjectLayout,
    file: Option<String>,
    dry_run: bool,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(layout)?;
    let dir = layout.queries_dir();
    if !dir.is_dir() {
        anyhow::bail!("queries directory not found: {}", dir.display());
    }

    let templates = match file.as_deref() {
        Some(arg) => expand_template_arg(&dir, arg)?.files,
        None => list_templates(&dir)?,
    };
    if templates.is_empty() {
        eprintln!("No query files found to process.");
        return Ok(());
    }

    let runner = SystemRunner::new();
    let options = QueryOptions { force, dry_run };
    let report = extract_queries(&config, layout, &runner, &templates, &options);
    output::print_report("query", &report, layout, dry_run, json)
}
