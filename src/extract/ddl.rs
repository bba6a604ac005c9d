//! Schema extraction.
//!
//! Dumps the schema of every selected remote database, sanitizes it for
//! local replay and writes it to the 200 bucket. Extension requirements
//! collected along the way feed the container build context.

use crate::artifact::{Artifact, Persisted};
use crate::config::{DatabaseMapping, ProjectLayout, TuskConfig};
use crate::error::{ConfigError, StepError};
use crate::ordering::{Bucket, PrefixAllocator};
use crate::process::CommandRunner;
use crate::report::{GroupReport, ItemReport, Outcome, RunReport};
use crate::sanitizer::{sanitize, update_build_context, SanitizedDdl};
use tracing::{error, info};

#[derive(Debug, Clone, Default)]
pub struct DdlOptions {
    pub force: bool,
    pub dry_run: bool,
    pub database: Option<String>,
}

/// Result of a schema extraction run
#[derive(Debug, Clone, Default)]
pub struct DdlRun {
    pub report: RunReport,
    /// Union of every dump's requirements
    pub requirements: SanitizedDdl,
}

/// `pg_dump` arguments for a schema-only dump of `db`
pub fn schema_dump_args(db: &DatabaseMapping) -> Vec<String> {
    let mut args: Vec<String> = ["-s", "--no-owner", "--no-privileges", "--dbname"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(db.connection_string());
    for schema in &db.target_schemas {
        args.push("-n".to_string());
        args.push(schema.clone());
    }
    args
}

/// Extract, sanitize and write the schema of every selected mapping
pub fn extract_schemas(
    config: &TuskConfig,
    layout: &ProjectLayout,
    runner: &dyn CommandRunner,
    allocator: &PrefixAllocator,
    options: &DdlOptions,
) -> Result<DdlRun, ConfigError> {
    let databases = config.select_databases(options.database.as_deref())?;
    let mut run = DdlRun::default();
    let mut items = Vec::with_capacity(databases.len());

    for db in databases {
        let prefix = allocator.next_prefix(Bucket::Schema);
        info!("Extracting DDL from {} ({})...", db.source_name, db.host);
        if !db.target_schemas.is_empty() {
            info!("  Target Schemas: {}", db.target_schemas.join(", "));
        }

        let outcome = match extract_one(db, layout, runner, &prefix, options) {
            Ok((outcome, sanitized)) => {
                if let Some(sanitized) = sanitized {
                    run.requirements.merge_requirements(&sanitized);
                }
                outcome
            }
            Err(e) => {
                error!("Failed to extract DDL for {}: {}", db.source_name, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        items.push(
            ItemReport::new(&db.source_name, outcome)
                .with_method("schema")
                .with_prefix(Some(prefix)),
        );
    }
    run.report.push(GroupReport::new("schema", items));

    if !options.dry_run {
        let items: Vec<ItemReport> = match update_build_context(
            layout,
            &run.requirements.required_packages,
            &run.requirements.required_configs,
        ) {
            Ok(update) => [update.requirements, update.server_conf]
                .into_iter()
                .flatten()
                .map(|path| ItemReport::new(path.display().to_string(), Outcome::Written { path }))
                .collect(),
            Err(e) => {
                error!("Failed to update build context: {}", e);
                vec![ItemReport::new(
                    layout.build_context_dir().display().to_string(),
                    Outcome::Failed {
                        error: e.to_string(),
                    },
                )]
            }
        };
        if !items.is_empty() {
            run.report.push(GroupReport::new("build-context", items));
        }
    }
    Ok(run)
}

fn extract_one(
    db: &DatabaseMapping,
    layout: &ProjectLayout,
    runner: &dyn CommandRunner,
    prefix: &str,
    options: &DdlOptions,
) -> Result<(Outcome, Option<SanitizedDdl>), StepError> {
    let dir = layout.artifact_dir();

    if options.dry_run {
        let artifact = Artifact::new(prefix, &db.host, &db.local_target_name, &db.schema_label(), String::new());
        let path = artifact.path_in(&dir);
        info!(
            "[DRY RUN] Would run pg_dump for {} and save to {}",
            db.host,
            layout.display_path(&path)
        );
        return Ok((Outcome::DryRun { path }, None));
    }

    let output = runner.run("pg_dump", &schema_dump_args(db), &[])?;
    let sanitized = sanitize(&output.stdout);
    let mut body = sanitized.text.clone();
    if !body.ends_with('\n') {
        body.push('\n');
    }
    let artifact = Artifact::new(prefix, &db.host, &db.local_target_name, &db.schema_label(), body);

    let outcome = match artifact.persist(&dir, options.force).map_err(|e| StepError::io(artifact.path_in(&dir), e))? {
        Persisted::Written(path) => {
            info!("Successfully wrote DDL to {}", layout.display_path(&path));
            Outcome::Written { path }
        }
        Persisted::Locked(path) => Outcome::Locked { path },
    };
    Ok((outcome, Some(sanitized)))
}
