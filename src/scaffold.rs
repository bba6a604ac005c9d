//! Starter files for generator definitions and query templates.

use crate::artifact::sanitize_identifier;
use crate::config::{split_qualified, DatabaseMapping, ProjectLayout, TuskConfig};
use crate::extract::template;
use crate::generator::default_scaffold;
use crate::report::Outcome;
use crate::writer::safe_write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Database header used when no mapping declares the table
pub const DEFAULT_TEMPLATE_DATABASE: &str = "local_db";

/// Default location of a table's generator definition
pub fn faker_definition_path(layout: &ProjectLayout, table: &str) -> PathBuf {
    layout
        .faker_dir()
        .join(format!("{}.yaml", sanitize_identifier(table)))
}

/// Location of a table's query template, as read by the `query` seed method
pub fn query_template_path(layout: &ProjectLayout, table: &str) -> PathBuf {
    layout
        .queries_dir()
        .join(format!("{}.sql", sanitize_identifier(table)))
}

/// First mapping with a directive for `table` (bare or schema-qualified)
pub fn database_for_table<'a>(config: &'a TuskConfig, table: &str) -> Option<&'a DatabaseMapping> {
    let (schema, bare) = split_qualified(table);
    let schema = table.contains('.').then_some(schema);
    config
        .databases
        .iter()
        .find(|db| db.seed_tables.iter().any(|d| d.targets(schema, bare)))
}

/// Write the default generator definition for `table`
pub fn scaffold_faker(
    layout: &ProjectLayout,
    table: &str,
    output: Option<&Path>,
    force: bool,
    dry_run: bool,
) -> std::io::Result<Outcome> {
    let path = match output {
        Some(p) => layout.resolve(p),
        None => faker_definition_path(layout, table),
    };
    write_starter(layout, &path, &default_scaffold(table), force, dry_run, "Faker scaffold")
}

/// Write a query template for `table`, addressed to the database that seeds it
pub fn scaffold_query(
    config: Option<&TuskConfig>,
    layout: &ProjectLayout,
    table: &str,
    force: bool,
    dry_run: bool,
) -> std::io::Result<Outcome> {
    let database = config
        .and_then(|c| database_for_table(c, table))
        .map(|db| db.local_target_name.as_str())
        .unwrap_or(DEFAULT_TEMPLATE_DATABASE);
    let (schema, bare) = split_qualified(table);
    let content = template::scaffold(database, schema, bare);
    let path = query_template_path(layout, table);
    write_starter(layout, &path, &content, force, dry_run, "query scaffold")
}

fn write_starter(
    layout: &ProjectLayout,
    path: &Path,
    content: &str,
    force: bool,
    dry_run: bool,
    what: &str,
) -> std::io::Result<Outcome> {
    if dry_run {
        info!("[DRY RUN] Would write {} to {}", what, layout.display_path(path));
        return Ok(Outcome::DryRun {
            path: path.to_path_buf(),
        });
    }
    if safe_write(path, content, force)? {
        info!("Successfully generated {}: {}", what, layout.display_path(path));
        Ok(Outcome::Written {
            path: path.to_path_buf(),
        })
    } else {
        Ok(Outcome::Locked {
            path: path.to_path_buf(),
        })
    }
}
