//! Seed artifact generation.
//!
//! Walks every seed-table directive of every selected database mapping in
//! declaration order, renders it with the directive's strategy and writes
//! the result through the lock-aware writer. A failing directive is
//! logged and recorded; it never stops the run.

pub mod strategy;

pub use strategy::{strategy_for, with_replica_role, Rendered, SeedContext, SeedStrategy};

use crate::artifact::{Artifact, Persisted};
use crate::config::{DatabaseMapping, ProjectLayout, SeedDirective, TuskConfig};
use crate::error::ConfigError;
use crate::generator::GeneratorRegistry;
use crate::ordering::PrefixAllocator;
use crate::process::CommandRunner;
use crate::report::{GroupReport, ItemReport, Outcome, RunReport};
use tracing::{error, info, warn};

/// Options for a seeding run
#[derive(Debug, Clone, Default)]
pub struct SeedOptions {
    /// Overwrite lock-protected artifacts
    pub force: bool,
    /// Render without running tools or writing files
    pub dry_run: bool,
    /// Only process the mapping with this source or local name
    pub database: Option<String>,
}

/// Runs the seed pipeline
pub struct Seeder<'a> {
    config: &'a TuskConfig,
    layout: &'a ProjectLayout,
    runner: &'a dyn CommandRunner,
    registry: &'a GeneratorRegistry,
    allocator: &'a PrefixAllocator,
    options: SeedOptions,
}

impl<'a> Seeder<'a> {
    pub fn new(
        config: &'a TuskConfig,
        layout: &'a ProjectLayout,
        runner: &'a dyn CommandRunner,
        registry: &'a GeneratorRegistry,
        allocator: &'a PrefixAllocator,
        options: SeedOptions,
    ) -> Self {
        Self {
            config,
            layout,
            runner,
            registry,
            allocator,
            options,
        }
    }

    /// Process every selected mapping.
    ///
    /// Only an unmatched database filter is an error; everything else is
    /// reported per directive.
    pub fn run(&self) -> Result<RunReport, ConfigError> {
        let databases = self.config.select_databases(self.options.database.as_deref())?;
        let mut report = RunReport::default();
        for db in databases {
            let group = self.seed_database(db);
            info!(
                "{} → {}: {}",
                db.source_name, db.local_target_name, group.summary
            );
            report.push(group);
        }
        Ok(report)
    }

    fn seed_database(&self, db: &DatabaseMapping) -> GroupReport {
        let ctx = SeedContext {
            config: self.config,
            layout: self.layout,
            database: db,
            runner: self.runner,
            registry: self.registry,
            dry_run: self.options.dry_run,
            force: self.options.force,
        };
        let items = db
            .seed_tables
            .iter()
            .map(|directive| self.seed_directive(&ctx, directive))
            .collect();
        GroupReport::new(&db.local_target_name, items)
    }

    fn seed_directive(&self, ctx: &SeedContext<'_>, directive: &SeedDirective) -> ItemReport {
        let table = &directive.table;
        let method = directive.method.to_string();
        info!("Generating seed for {} using {}...", table, method);

        let Some(strategy) = strategy_for(&directive.method) else {
            warn!("Unknown seeding method: {}", method);
            return ItemReport::new(
                table,
                Outcome::Skipped {
                    reason: format!("unknown seeding method '{}'", method),
                },
            )
            .with_method(method);
        };

        // A failed render leaves the counter alone; skips still take a slot
        let (outcome, prefix) = match strategy.render(ctx, directive) {
            Ok(Rendered::Body(body)) => {
                let prefix = self.allocator.next_prefix(strategy.bucket());
                (self.emit(ctx.database, table, &prefix, body), Some(prefix))
            }
            Ok(Rendered::Skipped(reason)) => {
                let prefix = self.allocator.next_prefix(strategy.bucket());
                warn!("Skipping {}: {}", table, reason);
                (Outcome::Skipped { reason }, Some(prefix))
            }
            Err(e) => {
                error!("Failed to generate seed for {}: {}", table, e);
                let outcome = Outcome::Failed {
                    error: e.to_string(),
                };
                (outcome, None)
            }
        };

        ItemReport::new(table, outcome)
            .with_method(method)
            .with_prefix(prefix)
    }

    fn emit(&self, db: &DatabaseMapping, table: &str, prefix: &str, body: String) -> Outcome {
        let artifact = Artifact::new(prefix, &db.host, &db.local_target_name, table, body);
        let dir = self.layout.artifact_dir();

        if self.options.dry_run {
            let path = artifact.path_in(&dir);
            info!("[DRY RUN] Would write seed file to {}", self.layout.display_path(&path));
            return Outcome::DryRun { path };
        }

        match artifact.persist(&dir, self.options.force) {
            Ok(Persisted::Written(path)) => {
                info!("Successfully wrote seed to {}", self.layout.display_path(&path));
                Outcome::Written { path }
            }
            Ok(Persisted::Locked(path)) => Outcome::Locked { path },
            Err(e) => {
                error!("Failed to write seed for {}: {}", table, e);
                Outcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }
}
