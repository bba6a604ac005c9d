use super::output;
use crate::config::ProjectLayout;
use crate::process::SystemRunner;
use crate::sync::{sync_artifacts, sync_files, SyncOptions};

pub fn run(
    layout: &ProjectLayout,
    username: Option<String>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let dir = layout.artifact_dir();
    if !dir.is_dir() {
        anyhow::bail!("artifact directory not found: {}", dir.display());
    }
    let files = sync_files(&dir)?;
    if files.is_empty() {
        eprintln!("No query artifacts found to sync.");
        return Ok(());
    }

    // Local replay never uses the remote credentials file
    let runner = SystemRunner::without_credentials();
    let options = SyncOptions { dry_run, username };
    let report = sync_artifacts(layout, &runner, &files, &options);
    output::print_report("sync", &report, layout, dry_run, json)
}
