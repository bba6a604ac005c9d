//! Seeding strategies.
//!
//! Each seed method turns one directive into the body of one artifact:
//! - `dump`: replicate rows from the remote with `pg_dump --inserts`
//! - `faker`: synthetic rows from a generator definition
//! - `query`: a hand-written query template, copied verbatim
//! - `csv`: a client-side `\copy` from a flat file

mod csv;
mod dump;
mod faker;
mod query;

pub use csv::CsvStrategy;
pub use dump::DumpStrategy;
pub use faker::{render_inserts, FakerStrategy};
pub use query::QueryStrategy;

use crate::config::{DatabaseMapping, ProjectLayout, SeedDirective, SeedMethod, TuskConfig};
use crate::error::StepError;
use crate::generator::GeneratorRegistry;
use crate::ordering::Bucket;
use crate::process::CommandRunner;

/// Everything a strategy may consult while rendering
pub struct SeedContext<'a> {
    pub config: &'a TuskConfig,
    pub layout: &'a ProjectLayout,
    pub database: &'a DatabaseMapping,
    pub runner: &'a dyn CommandRunner,
    pub registry: &'a GeneratorRegistry,
    pub dry_run: bool,
    pub force: bool,
}

/// Result of rendering a directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Artifact body, ready to write
    Body(String),
    /// Nothing to write, with the reason
    Skipped(String),
}

/// A seeding method
pub trait SeedStrategy: Sync {
    /// Ordering bucket of the artifacts this strategy produces
    fn bucket(&self) -> Bucket;

    /// Render the artifact body for `directive`
    fn render(&self, ctx: &SeedContext<'_>, directive: &SeedDirective) -> Result<Rendered, StepError>;
}

static DUMP: DumpStrategy = DumpStrategy;
static FAKER: FakerStrategy = FakerStrategy;
static QUERY: QueryStrategy = QueryStrategy;
static CSV: CsvStrategy = CsvStrategy;

/// Strategy for a seed method; `None` for unrecognized methods
pub fn strategy_for(method: &SeedMethod) -> Option<&'static dyn SeedStrategy> {
    match method {
        SeedMethod::Dump => Some(&DUMP),
        SeedMethod::Faker => Some(&FAKER),
        SeedMethod::Query => Some(&QUERY),
        SeedMethod::Csv => Some(&CSV),
        SeedMethod::Unknown(_) => None,
    }
}

/// Disable triggers and foreign-key checks around `body`.
///
/// Loading rows with `session_replication_role = 'replica'` lets tables be
/// seeded in any order regardless of foreign keys.
pub fn with_replica_role(body: &str) -> String {
    let body = body.trim_end_matches('\n');
    let mut out = String::with_capacity(body.len() + 96);
    out.push_str("SET session_replication_role = 'replica';\n");
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    out.push_str("SET session_replication_role = 'origin';\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_replica_role() {
        assert_eq!(
            with_replica_role("INSERT 1;\n"),
            "SET session_replication_role = 'replica';\nINSERT 1;\nSET session_replication_role = 'origin';\n"
        );
        assert_eq!(
            with_replica_role(""),
            "SET session_replication_role = 'replica';\nSET session_replication_role = 'origin';\n"
        );
    }

    #[test]
    fn test_strategy_buckets() {
        assert_eq!(strategy_for(&SeedMethod::Dump).unwrap().bucket(), Bucket::Dump);
        assert_eq!(strategy_for(&SeedMethod::Faker).unwrap().bucket(), Bucket::Faker);
        assert_eq!(strategy_for(&SeedMethod::Query).unwrap().bucket(), Bucket::Query);
        assert_eq!(strategy_for(&SeedMethod::Csv).unwrap().bucket(), Bucket::Query);
        assert!(strategy_for(&SeedMethod::Unknown("rsync".into())).is_none());
    }
}
