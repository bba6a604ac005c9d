//! CSV strategy - client-side bulk load from a flat file.

use super::{Rendered, SeedContext, SeedStrategy};
use crate::config::{csv_reference, SeedDirective};
use crate::error::StepError;
use crate::ordering::Bucket;

#[derive(Debug, Clone, Copy)]
pub struct CsvStrategy;

impl SeedStrategy for CsvStrategy {
    fn bucket(&self) -> Bucket {
        Bucket::Query
    }

    fn render(&self, _ctx: &SeedContext<'_>, directive: &SeedDirective) -> Result<Rendered, StepError> {
        let (schema, table) = directive.schema_and_table();
        Ok(Rendered::Body(format!(
            "\\copy {}.{} FROM '{}' WITH (FORMAT csv, HEADER true);\n",
            schema,
            table,
            csv_reference(table)
        )))
    }
}
