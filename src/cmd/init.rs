use super::load_config;
use crate::config::ProjectLayout;
use crate::init_sql::write_init_sql;
use crate::report::Outcome;

pub fn run(layout: &ProjectLayout, dry_run: bool, force: bool) -> anyhow::Result<()> {
    let config = load_config(layout)?;
    match write_init_sql(&config, layout, force, dry_run)? {
        Outcome::Written { path } => eprintln!("Wrote {}", layout.display_path(&path)),
        Outcome::Locked { path } => eprintln!(
            "{} is locked; use --force to regenerate",
            layout.display_path(&path)
        ),
        Outcome::DryRun { path } => {
            eprintln!("[DRY RUN] Would write {}", layout.display_path(&path))
        }
        _ => {}
    }
    Ok(())
}
