//! Replay query-bucket artifacts against the running local database.

use crate::artifact::SEGMENT_SEPARATOR;
use crate::config::ProjectLayout;
use crate::ordering::Bucket;
use crate::process::CommandRunner;
use crate::report::{GroupReport, ItemReport, Outcome, RunReport};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Local server address; IPv4 avoids a host server listening on `::1`
pub const LOCAL_HOST: &str = "127.0.0.1";

pub const DEFAULT_LOCAL_USER: &str = "postgres";

#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub dry_run: bool,
    /// Local user; `$POSTGRES_USER` or `postgres` when unset
    pub username: Option<String>,
}

/// Every query-bucket artifact (prefixes 600 to 799), sorted
pub fn sync_files(dir: &Path) -> Result<Vec<PathBuf>, glob::PatternError> {
    let pattern = dir.join(format!("*{}*.sql", SEGMENT_SEPARATOR));
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .filter(|p| p.is_file() && is_query_artifact(p))
        .collect();
    files.sort();
    Ok(files)
}

fn is_query_artifact(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split(SEGMENT_SEPARATOR).next())
        .and_then(Bucket::for_prefix)
        == Some(Bucket::Query)
}

/// Target database of an artifact: the third name segment
pub fn target_database(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    name.split(SEGMENT_SEPARATOR)
        .nth(2)
        .map(|s| s.trim_end_matches(".sql").to_string())
}

/// Run each file through `psql`, continuing past failures
pub fn sync_artifacts(
    layout: &ProjectLayout,
    runner: &dyn CommandRunner,
    files: &[PathBuf],
    options: &SyncOptions,
) -> RunReport {
    let username = options
        .username
        .clone()
        .or_else(|| env::var("POSTGRES_USER").ok().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| DEFAULT_LOCAL_USER.to_string());

    let mut items = Vec::with_capacity(files.len());
    for path in files {
        let name = layout.display_path(path).to_string();
        let Some(database) = target_database(path) else {
            items.push(ItemReport::new(
                name,
                Outcome::Skipped {
                    reason: "file name has no target database segment".to_string(),
                },
            ));
            continue;
        };

        if options.dry_run {
            info!("[DRY RUN] Would execute {} against database {}", name, database);
            items.push(ItemReport::new(name, Outcome::DryRun { path: path.clone() }));
            continue;
        }

        info!("Syncing {} to {}...", name, database);
        let args = vec![
            "--host".to_string(),
            LOCAL_HOST.to_string(),
            "--username".to_string(),
            username.clone(),
            "--dbname".to_string(),
            database,
            "--file".to_string(),
            path.display().to_string(),
        ];
        let outcome = match runner.run("psql", &args, &[]) {
            Ok(_) => Outcome::Applied,
            Err(e) => {
                error!("Sync failed for {}: {}", name, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        items.push(ItemReport::new(name, outcome));
    }

    let mut report = RunReport::default();
    report.push(GroupReport::new("sync", items));
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_database() {
        assert_eq!(
            target_database(Path::new("ddl/600__db_example_com__local_db__orders.sql")).as_deref(),
            Some("local_db")
        );
        assert_eq!(target_database(Path::new("600__host.sql")), None);
    }

    #[test]
    fn test_query_bucket_files_are_selected() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in [
            "600__h__db__a.sql",
            "612__h__db__b.sql",
            "799__h__db__c.sql",
            "599__h__db__d.sql",
            "800__h__db__e.sql",
            "000_init.sql",
        ] {
            std::fs::write(dir.path().join(name), "SELECT 1;\n").unwrap();
        }
        let names: Vec<_> = sync_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["600__h__db__a.sql", "612__h__db__b.sql", "799__h__db__c.sql"]
        );
    }
}
