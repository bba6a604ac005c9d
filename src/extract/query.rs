//! Query extraction.
//!
//! Runs each query template against its remote database and turns the
//! result rows into INSERT statements for the local copy. Rows come back
//! as JSON (`row_to_json`), so values with commas, quotes or newlines
//! survive the trip without a CSV parser.

use super::template::{query_body, TemplateHeaders};
use crate::artifact::{Artifact, Persisted};
use crate::config::{ProjectLayout, TuskConfig};
use crate::error::StepError;
use crate::literal::{format_value, SqlValue};
use crate::ordering::{extraction_slot, Bucket};
use crate::process::CommandRunner;
use crate::report::{GroupReport, ItemReport, Outcome, RunReport};
use crate::seeder::with_replica_role;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub force: bool,
    pub dry_run: bool,
}

/// Every `*.sql` template in `dir`, sorted
pub fn list_templates(dir: &Path) -> Result<Vec<PathBuf>, glob::PatternError> {
    let pattern = dir.join("*.sql");
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// `psql` arguments that print one JSON object per result row
pub fn json_query_args(connection: &str, sql: &str) -> Vec<String> {
    vec![
        "--dbname".to_string(),
        connection.to_string(),
        "--tuples-only".to_string(),
        "--no-align".to_string(),
        "--command".to_string(),
        format!("SELECT row_to_json(t) FROM ({}) t", sql),
    ]
}

/// Quote an identifier, doubling embedded double quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Turn one JSON row into an INSERT statement, keeping the column order of the row.
///
/// Returns `None` if the line is not a JSON object.
pub fn row_to_insert(schema: &str, table: &str, line: &str) -> Option<String> {
    let row: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line).ok()?;
    let columns: Vec<String> = row.keys().map(|c| quote_ident(c)).collect();
    let values: Vec<String> = row
        .into_iter()
        .map(|(_, v)| format_value(&SqlValue::from(v)))
        .collect();
    Some(format!(
        "INSERT INTO {}.{} ({}) VALUES ({});",
        schema,
        quote_ident(table),
        columns.join(", "),
        values.join(", ")
    ))
}

/// Run every template and write one artifact per template with rows
pub fn extract_queries(
    config: &TuskConfig,
    layout: &ProjectLayout,
    runner: &dyn CommandRunner,
    templates: &[PathBuf],
    options: &QueryOptions,
) -> RunReport {
    let mut unmatched = 0u32;
    let mut items = Vec::with_capacity(templates.len());

    for path in templates {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Processing query: {}", name);

        let outcome = match extract_one(config, layout, runner, path, &name, options, &mut unmatched) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Remote query failed for {}: {}", name, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        if let Outcome::Skipped { reason } = &outcome {
            warn!("[SKIP] {}: {}", name, reason);
        }
        items.push(ItemReport::new(name, outcome).with_method("query"));
    }

    let mut report = RunReport::default();
    report.push(GroupReport::new("queries", items));
    report
}

fn extract_one(
    config: &TuskConfig,
    layout: &ProjectLayout,
    runner: &dyn CommandRunner,
    path: &Path,
    name: &str,
    options: &QueryOptions,
    unmatched: &mut u32,
) -> Result<Outcome, StepError> {
    let content = fs::read_to_string(path).map_err(|e| StepError::io(path, e))?;
    let headers = TemplateHeaders::parse(&content);

    let (Some(database), Some(table)) = (headers.database.as_deref(), headers.table.as_deref()) else {
        return Ok(Outcome::Skipped {
            reason: "missing -- @database or -- @table header".to_string(),
        });
    };
    let Some(db) = config.find_database(database) else {
        return Ok(Outcome::Skipped {
            reason: format!("no database configuration found for \"{}\" in tusk.yaml", database),
        });
    };
    let schema = headers.schema.as_str();

    info!("  Target Host: {}", db.host);
    info!("  Source DB:   {}", db.source_name);
    info!("  Local DB:    {}", db.local_target_name);
    info!("  Target Tab:  {}.{}", schema, table);

    let slot = extraction_slot(config, &format!("{}.{}", schema, table), unmatched);
    let prefix = Bucket::Query.prefix_for(slot);
    let dir = layout.artifact_dir();

    if options.dry_run {
        let path = Artifact::new(prefix, &db.host, &db.local_target_name, table, String::new()).path_in(&dir);
        info!(
            "[DRY RUN] Would execute query on {} and save to {}",
            db.host,
            layout.display_path(&path)
        );
        return Ok(Outcome::DryRun { path });
    }

    let sql = query_body(&content);
    debug!(sql = %sql, "template query");
    let output = runner.run("psql", &json_query_args(&db.connection_string(), &sql), &[])?;
    if !output.stderr.is_empty() {
        debug!(stderr = %output.stderr, "psql stderr");
    }

    let body = match render_rows(schema, table, &output.stdout) {
        Some(inserts) => script(name, table, &inserts),
        None => {
            warn!("Query {} returned no data", name);
            return Ok(Outcome::Skipped {
                reason: "query returned no data".to_string(),
            });
        }
    };

    let artifact = Artifact::new(prefix, &db.host, &db.local_target_name, table, body);
    match artifact
        .persist(&dir, options.force)
        .map_err(|e| StepError::io(artifact.path_in(&dir), e))?
    {
        Persisted::Written(path) => {
            info!("Artifact generated: {}", layout.display_path(&path));
            Ok(Outcome::Written { path })
        }
        Persisted::Locked(path) => Ok(Outcome::Locked { path }),
    }
}

/// INSERT lines for every well-formed row, or `None` if no row was usable
fn render_rows(schema: &str, table: &str, stdout: &str) -> Option<String> {
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return None;
    }
    let mut inserts = Vec::with_capacity(lines.len());
    for line in lines {
        match row_to_insert(schema, table, line) {
            Some(insert) => inserts.push(insert),
            None => warn!("Skipping row that is not a JSON object: {}", line),
        }
    }
    if inserts.is_empty() {
        return None;
    }
    Some(inserts.join("\n"))
}

fn script(template_name: &str, table: &str, inserts: &str) -> String {
    format!(
        "-- Generated from remote query: {}\n-- @table {}\n\n{}",
        template_name,
        table,
        with_replica_role(inserts)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_insert_keeps_column_order() {
        let insert = row_to_insert(
            "ops",
            "orders",
            r#"{"zeta": 1, "alpha": "it's", "meta": {"a": [1]}, "gone": null}"#,
        )
        .unwrap();
        assert_eq!(
            insert,
            r#"INSERT INTO ops."orders" ("zeta", "alpha", "meta", "gone") VALUES (1, 'it''s', '{"a":[1]}', NULL);"#
        );
    }

    #[test]
    fn test_row_to_insert_rejects_non_objects() {
        assert!(row_to_insert("s", "t", "not json").is_none());
        assert!(row_to_insert("s", "t", "[1,2]").is_none());
    }

    #[test]
    fn test_render_rows_skips_bad_lines() {
        let out = render_rows("public", "t", "{\"id\": 1}\ngarbage\n{\"id\": 2}\n").unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(render_rows("public", "t", "  \n").is_none());
    }

    #[test]
    fn test_render_rows_all_malformed_is_empty() {
        assert!(render_rows("public", "t", "not json\n[1]\n\"x\"\n").is_none());
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
