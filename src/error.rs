//! Error taxonomy for artifact generation.
//!
//! Configuration errors are fatal for a whole run. Everything else is
//! scoped to a single item (directive, database, template, file) and is
//! caught at that item's boundary by the pipelines.

use crate::process::ProcessError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems: the run cannot proceed without a valid mapping.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document does not exist
    #[error("Configuration file not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The configuration document could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid YAML for the expected shape
    #[error("Malformed configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field is missing or empty
    #[error("Missing required field '{field}' in {context}")]
    MissingField { context: String, field: &'static str },

    /// A database filter matched nothing
    #[error("No database found matching \"{0}\" in tusk.yaml")]
    NoMatchingDatabase(String),
}

/// Problems loading or creating a generator definition side file.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to access generator definition {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid generator definition at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid generator definition at {}: 'columns' missing", path.display())]
    MissingColumns { path: PathBuf },

    #[error("Invalid generator definition at {}: column '{column}' must map to a generator path string", path.display())]
    InvalidColumn { path: PathBuf, column: String },

    #[error("Generator definition at {} is @lock protected and could not be scaffolded", path.display())]
    Locked { path: PathBuf },
}

/// Failure of a single pipeline step (one directive, database, template or file).
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("Generator config '{reference}' for table {table} is not declared in faker_configs")]
    UnknownGeneratorConfig { table: String, reference: String },

    #[error("Faker config path not found for table {0}")]
    MissingGeneratorConfig(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StepError::Io {
            path: path.into(),
            source,
        }
    }
}
