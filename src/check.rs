//! Connectivity and catalog-access check for every remote source database.

use crate::config::{DatabaseMapping, TuskConfig};
use crate::error::ConfigError;
use crate::process::CommandRunner;
use crate::report::{GroupReport, ItemReport, Outcome, RunReport};
use tracing::{error, info};

/// Statements run in order against each source; the first failure stops that database
pub const CHECK_STATEMENTS: [(&str, &str); 2] = [
    ("connect", "SELECT 1"),
    (
        "catalog access",
        "SELECT count(*) FROM pg_catalog.pg_class LIMIT 1",
    ),
];

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub dry_run: bool,
    /// Only check the mapping with this source or local name
    pub database: Option<String>,
}

/// Label used for a mapping in the report
pub fn check_label(db: &DatabaseMapping) -> String {
    format!("{}@{}", db.source_name, db.host)
}

/// Run the check statements against every selected source, one item per database
pub fn check_connectivity(
    config: &TuskConfig,
    runner: &dyn CommandRunner,
    options: &CheckOptions,
) -> Result<RunReport, ConfigError> {
    let databases = config.select_databases(options.database.as_deref())?;

    let mut items = Vec::with_capacity(databases.len());
    for db in databases {
        let label = check_label(db);
        if options.dry_run {
            info!("[DRY RUN] Would verify connection and privileges for {}", db.host);
            items.push(ItemReport::new(
                label,
                Outcome::Skipped {
                    reason: "dry run".to_string(),
                },
            ));
            continue;
        }

        info!("Checking {}...", label);
        let outcome = match check_one(db, runner) {
            Ok(()) => Outcome::Applied,
            Err(e) => {
                error!("Check failed for {}: {}", label, e);
                Outcome::Failed { error: e }
            }
        };
        items.push(ItemReport::new(label, outcome));
    }

    let mut report = RunReport::default();
    report.push(GroupReport::new("check", items));
    Ok(report)
}

fn check_one(db: &DatabaseMapping, runner: &dyn CommandRunner) -> Result<(), String> {
    let conn = db.connection_string();
    for (step, sql) in CHECK_STATEMENTS {
        let args = vec![
            "--dbname".to_string(),
            conn.clone(),
            "--command".to_string(),
            sql.to_string(),
        ];
        runner
            .run("psql", &args, &[])
            .map_err(|e| format!("{step}: {e}"))?;
    }
    Ok(())
}
