//! Declarative project configuration (`tusk.yaml`).
//!
//! The document lists remote-to-local database mappings, each with an
//! ordered list of seed-table directives, plus a name → path map of
//! generator definition files used by the `faker` seeding method.

mod layout;

pub use layout::{csv_reference, ProjectLayout, CONFIG_FILE_NAME};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Number of synthetic rows produced when a `faker` directive omits `rows`
pub const DEFAULT_FAKER_ROWS: usize = 10;

/// Complete `tusk.yaml` document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TuskConfig {
    /// Generator definition files by reference name
    #[serde(alias = "generator_configs")]
    pub faker_configs: BTreeMap<String, PathBuf>,
    /// Remote → local database mappings, in processing order
    pub databases: Vec<DatabaseMapping>,
}

/// One remote database mirrored into one local database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseMapping {
    /// Database name on the remote server
    pub source_name: String,
    /// Database name in the local environment
    pub local_target_name: String,
    /// Remote host, optionally with `:port`
    pub host: String,
    /// Remote user
    pub username: String,
    /// libpq sslmode (defaults to `disable`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sslmode: Option<String>,
    /// Schemas to extract (empty = all)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_schemas: Vec<String>,
    /// Seed-table directives, processed in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub seed_tables: Vec<SeedDirective>,
}

impl DatabaseMapping {
    /// Connection string for the remote source database.
    ///
    /// The password is never part of it; it is resolved from the
    /// credentials store at invocation time.
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}@{}/{}?sslmode={}",
            self.username,
            self.host,
            self.source_name,
            self.sslmode.as_deref().unwrap_or("disable")
        )
    }

    /// True if `name` is this mapping's source or local target name
    pub fn matches_name(&self, name: &str) -> bool {
        self.source_name == name || self.local_target_name == name
    }

    /// Label used as the table segment of schema artifacts
    pub fn schema_label(&self) -> String {
        if self.target_schemas.is_empty() {
            "all".to_string()
        } else {
            self.target_schemas.join("_")
        }
    }
}

/// How one local table gets populated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedDirective {
    /// Table name, optionally schema-qualified
    pub table: String,
    /// Seeding method
    pub method: SeedMethod,
    /// Row count for synthetic data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    /// Key into `faker_configs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faker_config_ref: Option<String>,
}

impl SeedDirective {
    /// Effective row count for synthetic data
    pub fn row_count(&self) -> usize {
        self.rows.unwrap_or(DEFAULT_FAKER_ROWS)
    }

    /// Split `schema.table`, defaulting the schema to `public`
    pub fn schema_and_table(&self) -> (&str, &str) {
        split_qualified(&self.table)
    }

    /// True if this directive targets `table` (bare or `schema.table`)
    pub fn targets(&self, schema: Option<&str>, table: &str) -> bool {
        if self.table == table || self.table.ends_with(&format!(".{table}")) {
            return true;
        }
        schema.is_some_and(|s| self.table == format!("{s}.{table}"))
    }
}

/// Split a possibly schema-qualified name into `(schema, table)`
pub fn split_qualified(name: &str) -> (&str, &str) {
    match name.split_once('.') {
        Some((schema, table)) => (schema, table),
        None => ("public", name),
    }
}

/// Seeding method of a directive.
///
/// Unrecognized values are kept so the dispatcher can warn and skip the
/// directive instead of rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeedMethod {
    /// Replicate rows from the remote with the row dumper
    Dump,
    /// Generate synthetic rows
    Faker,
    /// Pass through a stored query template
    Query,
    /// Bulk-load a flat file
    Csv,
    /// Anything else
    Unknown(String),
}

impl From<String> for SeedMethod {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "dump" => SeedMethod::Dump,
            "faker" => SeedMethod::Faker,
            "query" => SeedMethod::Query,
            "csv" => SeedMethod::Csv,
            _ => SeedMethod::Unknown(s),
        }
    }
}

impl From<SeedMethod> for String {
    fn from(m: SeedMethod) -> Self {
        m.to_string()
    }
}

impl fmt::Display for SeedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedMethod::Dump => write!(f, "dump"),
            SeedMethod::Faker => write!(f, "faker"),
            SeedMethod::Query => write!(f, "query"),
            SeedMethod::Csv => write!(f, "csv"),
            SeedMethod::Unknown(s) => write!(f, "{}", s),
        }
    }
}

impl TuskConfig {
    /// Load and validate a configuration document
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TuskConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a document from a string (used by tests and tooling)
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: TuskConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject mappings and directives with empty required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (idx, db) in self.databases.iter().enumerate() {
            let context = format!("databases[{}]", idx);
            let required = [
                ("source_name", &db.source_name),
                ("local_target_name", &db.local_target_name),
                ("host", &db.host),
                ("username", &db.username),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    return Err(ConfigError::MissingField {
                        context: context.clone(),
                        field,
                    });
                }
            }
            for (sidx, seed) in db.seed_tables.iter().enumerate() {
                if seed.table.trim().is_empty() {
                    return Err(ConfigError::MissingField {
                        context: format!("{}.seed_tables[{}]", context, sidx),
                        field: "table",
                    });
                }
            }
        }
        Ok(())
    }

    /// Mappings selected by an optional source/local name filter.
    ///
    /// A filter that matches nothing is a configuration error.
    pub fn select_databases(&self, filter: Option<&str>) -> Result<Vec<&DatabaseMapping>, ConfigError> {
        match filter {
            None => Ok(self.databases.iter().collect()),
            Some(name) => {
                let selected: Vec<_> = self
                    .databases
                    .iter()
                    .filter(|db| db.matches_name(name))
                    .collect();
                if selected.is_empty() {
                    return Err(ConfigError::NoMatchingDatabase(name.to_string()));
                }
                Ok(selected)
            }
        }
    }

    /// First mapping, in declaration order, whose local target or source name is `name`
    pub fn find_database(&self, name: &str) -> Option<&DatabaseMapping> {
        self.databases.iter().find(|db| db.matches_name(name))
    }

    /// Distinct local target names in first-seen order
    pub fn local_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for db in &self.databases {
            if !names.contains(&db.local_target_name.as_str()) {
                names.push(&db.local_target_name);
            }
        }
        names
    }
}
