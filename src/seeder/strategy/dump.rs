//! Dump strategy - replicate remote rows as INSERT statements.

use super::{with_replica_role, Rendered, SeedContext, SeedStrategy};
use crate::config::SeedDirective;
use crate::error::StepError;
use crate::ordering::Bucket;

#[derive(Debug, Clone, Copy)]
pub struct DumpStrategy;

impl DumpStrategy {
    /// `pg_dump` arguments for a data-only dump of one table
    pub fn args(table: &str, connection: &str) -> Vec<String> {
        [
            "-a",
            "-t",
            table,
            "--inserts",
            "--no-owner",
            "--no-privileges",
            "--dbname",
            connection,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl SeedStrategy for DumpStrategy {
    fn bucket(&self) -> Bucket {
        Bucket::Dump
    }

    fn render(&self, ctx: &SeedContext<'_>, directive: &SeedDirective) -> Result<Rendered, StepError> {
        if ctx.dry_run {
            return Ok(Rendered::Body(format!(
                "-- [DRY RUN] pg_dump -a -t {} --inserts ...\n",
                directive.table
            )));
        }
        let args = Self::args(&directive.table, &ctx.database.connection_string());
        let output = ctx.runner.run("pg_dump", &args, &[])?;
        Ok(Rendered::Body(with_replica_role(&output.stdout)))
    }
}
