use crate::config::{ProjectLayout, TuskConfig};
use crate::report::Outcome;
use crate::scaffold::{scaffold_faker, scaffold_query};
use std::path::PathBuf;
use tracing::warn;

pub fn run_faker(
    layout: &ProjectLayout,
    table: &str,
    output: Option<PathBuf>,
    dry_run: bool,
    force: bool,
) -> anyhow::Result<()> {
    let outcome = scaffold_faker(layout, table, output.as_deref(), force, dry_run)?;
    report(layout, &outcome);
    Ok(())
}

pub fn run_query(
    layout: &ProjectLayout,
    table: &str,
    dry_run: bool,
    force: bool,
) -> anyhow::Result<()> {
    let config_path = layout.config_path();
    let config = if config_path.exists() {
        match TuskConfig::load(&config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring {}: {}", layout.display_path(&config_path), e);
                None
            }
        }
    } else {
        None
    };

    let outcome = scaffold_query(config.as_ref(), layout, table, force, dry_run)?;
    report(layout, &outcome);
    Ok(())
}

fn report(layout: &ProjectLayout, outcome: &Outcome) {
    if let Outcome::Locked { path } = outcome {
        eprintln!(
            "{} is locked; use --force to overwrite",
            layout.display_path(path)
        );
    }
}
