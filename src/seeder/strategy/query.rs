//! Query strategy - pass a stored template through unchanged.

use super::{Rendered, SeedContext, SeedStrategy};
use crate::artifact::sanitize_identifier;
use crate::config::SeedDirective;
use crate::error::StepError;
use crate::ordering::Bucket;
use std::fs;

#[derive(Debug, Clone, Copy)]
pub struct QueryStrategy;

impl SeedStrategy for QueryStrategy {
    fn bucket(&self) -> Bucket {
        Bucket::Query
    }

    fn render(&self, ctx: &SeedContext<'_>, directive: &SeedDirective) -> Result<Rendered, StepError> {
        let path = ctx
            .layout
            .queries_dir()
            .join(format!("{}.sql", sanitize_identifier(&directive.table)));
        if !path.exists() {
            return Ok(Rendered::Skipped(format!(
                "Query file not found at {}",
                ctx.layout.display_path(&path)
            )));
        }
        let body = fs::read_to_string(&path).map_err(|e| StepError::io(&path, e))?;
        Ok(Rendered::Body(body))
    }
}
