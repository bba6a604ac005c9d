//! Artifact extraction from the remote databases.
//!
//! - [`ddl`]: schema dumps, sanitized, in the 200 bucket
//! - [`query`]: query template results as INSERTs, in the 600 bucket
//! - [`template`]: query template headers and bodies

pub mod ddl;
pub mod query;
pub mod template;

pub use ddl::{extract_schemas, DdlOptions, DdlRun};
pub use query::{extract_queries, list_templates, QueryOptions};
pub use template::TemplateHeaders;
