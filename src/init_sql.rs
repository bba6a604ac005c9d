//! Database initialization script (`000_init.sql`).
//!
//! Sorts before every artifact and creates each local target database
//! that does not exist yet. The script carries the lock marker itself, so
//! it is written once and only regenerated with `--force`.

use crate::config::{ProjectLayout, TuskConfig};
use crate::literal::quote_string;
use crate::report::Outcome;
use crate::writer::{safe_write, LOCK_MARKER};
use tracing::info;

/// Script text for `names`
pub fn render_init_sql<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut sql = format!("-- {}\n-- Generated Database Initialization\n\n", LOCK_MARKER);
    for name in names {
        sql.push_str(&format!(
            "SELECT {} WHERE NOT EXISTS (SELECT FROM pg_database WHERE datname = {}) \\gexec\n",
            quote_string(&format!("CREATE DATABASE {}", name)),
            quote_string(name)
        ));
    }
    sql
}

/// Write `000_init.sql` for every distinct local target
pub fn write_init_sql(
    config: &TuskConfig,
    layout: &ProjectLayout,
    force: bool,
    dry_run: bool,
) -> std::io::Result<Outcome> {
    let path = layout.init_sql_path();
    if dry_run {
        info!(
            "[DRY RUN] Would write database initialization SQL to {}",
            layout.display_path(&path)
        );
        return Ok(Outcome::DryRun { path });
    }

    let sql = render_init_sql(config.local_targets());
    if safe_write(&path, &sql, force)? {
        info!("Successfully generated: {}", layout.display_path(&path));
        Ok(Outcome::Written { path })
    } else {
        Ok(Outcome::Locked { path })
    }
}
