//! Faker strategy - synthetic rows from a generator definition.

use super::{with_replica_role, Rendered, SeedContext, SeedStrategy};
use crate::config::SeedDirective;
use crate::error::StepError;
use crate::generator::{get_or_create_default, GeneratorDefinition, GeneratorRegistry, ScaffoldMode};
use crate::literal::{format_value, SqlValue};
use crate::ordering::Bucket;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct FakerStrategy;

impl SeedStrategy for FakerStrategy {
    fn bucket(&self) -> Bucket {
        Bucket::Faker
    }

    fn render(&self, ctx: &SeedContext<'_>, directive: &SeedDirective) -> Result<Rendered, StepError> {
        let table = &directive.table;
        let reference = directive
            .faker_config_ref
            .as_deref()
            .ok_or_else(|| StepError::MissingGeneratorConfig(table.clone()))?;
        let configured = ctx.config.faker_configs.get(reference).ok_or_else(|| {
            StepError::UnknownGeneratorConfig {
                table: table.clone(),
                reference: reference.to_string(),
            }
        })?;
        let path = ctx.layout.resolve(configured);

        let mode = if ctx.dry_run {
            ScaffoldMode::InMemory
        } else {
            ScaffoldMode::Persist { force: ctx.force }
        };
        let source = get_or_create_default(&path, table, mode)?;
        if source.was_scaffolded() {
            info!(
                "Generator definition missing for {}; using default scaffold at {}",
                table,
                ctx.layout.display_path(&path)
            );
        }

        Ok(Rendered::Body(render_inserts(
            table,
            source.definition(),
            directive.row_count(),
            ctx.registry,
        )))
    }
}

/// Render `rows` synthetic INSERT statements inside the replica-role wrapper.
///
/// Every column is resolved again for every row. Unknown generator paths
/// produce `NULL`.
pub fn render_inserts(
    table: &str,
    definition: &GeneratorDefinition,
    rows: usize,
    registry: &GeneratorRegistry,
) -> String {
    let columns = definition
        .columns
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut inserts = String::new();
    for _ in 0..rows {
        let values = definition
            .columns
            .iter()
            .map(|(_, path)| format_value(&registry.resolve(path).unwrap_or(SqlValue::Null)))
            .collect::<Vec<_>>()
            .join(", ");
        inserts.push_str(&format!(
            "INSERT INTO {} ({}) VALUES ({});\n",
            table, columns, values
        ));
    }

    format!(
        "-- Seed data for {} via Faker ({} rows)\n{}",
        table,
        rows,
        with_replica_role(&inserts)
    )
}
