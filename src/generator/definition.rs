//! Generator definition side files.
//!
//! A definition maps column names to generator paths:
//!
//! ```yaml
//! table: bookstore_ops.authors   # optional
//! columns:
//!   id: number.int
//!   name: person.fullName
//! ```
//!
//! Column order in the file is the column order of the generated inserts.

use crate::error::DefinitionError;
use crate::writer;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Parsed definition, columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorDefinition {
    pub table: Option<String>,
    pub columns: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    table: Option<String>,
    #[serde(default)]
    columns: Option<serde_yaml::Mapping>,
}

impl GeneratorDefinition {
    /// Load a definition file
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse definition text; `path` is only used for error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, DefinitionError> {
        if content.trim().is_empty() {
            return Err(DefinitionError::MissingColumns {
                path: path.to_path_buf(),
            });
        }
        let raw: RawDefinition =
            serde_yaml::from_str(content).map_err(|source| DefinitionError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let mapping = raw.columns.ok_or_else(|| DefinitionError::MissingColumns {
            path: path.to_path_buf(),
        })?;

        let mut columns = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let column = match key.as_str() {
                Some(k) => k.to_string(),
                None => {
                    return Err(DefinitionError::InvalidColumn {
                        path: path.to_path_buf(),
                        column: format!("{:?}", key),
                    })
                }
            };
            let Some(generator) = value.as_str() else {
                return Err(DefinitionError::InvalidColumn {
                    path: path.to_path_buf(),
                    column,
                });
            };
            columns.push((column, generator.to_string()));
        }

        Ok(Self {
            table: raw.table,
            columns,
        })
    }
}

/// Default definition text for a table with no definition yet
pub fn default_scaffold(table: &str) -> String {
    format!(
        "columns:\n\
         \x20 # Auto-generated scaffold for {table}\n\
         \x20 # Edit these to match your schema. Generator paths are category.name,\n\
         \x20 # for example person.firstName or internet.email.\n\
         \x20 id: number.int\n\
         \x20 name: person.fullName\n\
         \x20 email: internet.email\n\
         \x20 created_at: date.past\n"
    )
}

/// Whether a missing definition is written to disk or only used in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldMode {
    Persist { force: bool },
    InMemory,
}

/// Where a definition came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSource {
    /// Loaded from an existing file
    Existing(GeneratorDefinition),
    /// Created from the default scaffold
    Scaffolded {
        definition: GeneratorDefinition,
        path: PathBuf,
        persisted: bool,
    },
}

impl DefinitionSource {
    pub fn definition(&self) -> &GeneratorDefinition {
        match self {
            DefinitionSource::Existing(d) => d,
            DefinitionSource::Scaffolded { definition, .. } => definition,
        }
    }

    pub fn into_definition(self) -> GeneratorDefinition {
        match self {
            DefinitionSource::Existing(d) => d,
            DefinitionSource::Scaffolded { definition, .. } => definition,
        }
    }

    pub fn was_scaffolded(&self) -> bool {
        matches!(self, DefinitionSource::Scaffolded { .. })
    }
}

/// Load the definition at `path`, or fall back to the default scaffold for `table`.
///
/// With [`ScaffoldMode::Persist`] the scaffold is written to `path` before
/// being used, so the returned definition and the file on disk agree.
pub fn get_or_create_default(
    path: &Path,
    table: &str,
    mode: ScaffoldMode,
) -> Result<DefinitionSource, DefinitionError> {
    if path.exists() {
        return GeneratorDefinition::load(path).map(DefinitionSource::Existing);
    }

    let content = default_scaffold(table);
    let definition = GeneratorDefinition::parse(&content, path)?;
    let persisted = match mode {
        ScaffoldMode::Persist { force } => {
            write_scaffold(path, &content, force)?;
            info!(path = %path.display(), "Created default generator definition for {}", table);
            true
        }
        ScaffoldMode::InMemory => false,
    };
    Ok(DefinitionSource::Scaffolded {
        definition,
        path: path.to_path_buf(),
        persisted,
    })
}

/// Write scaffold text through the lock-aware writer
pub fn write_scaffold(path: &Path, content: &str, force: bool) -> Result<(), DefinitionError> {
    let written = writer::safe_write(path, content, force).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !written {
        return Err(DefinitionError::Locked {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_preserves_column_order() {
        let yaml = "table: ops.users\ncolumns:\n  zeta: number.int\n  alpha: person.fullName\n  mid: internet.email\n";
        let def = GeneratorDefinition::parse(yaml, Path::new("users.yaml")).unwrap();
        assert_eq!(def.table.as_deref(), Some("ops.users"));
        let names: Vec<_> = def.columns.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_missing_columns() {
        let err = GeneratorDefinition::parse("table: x\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, DefinitionError::MissingColumns { .. }));
        let err = GeneratorDefinition::parse("", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, DefinitionError::MissingColumns { .. }));
    }

    #[test]
    fn test_non_string_generator_is_rejected() {
        let err = GeneratorDefinition::parse("columns:\n  id: 5\n", Path::new("x.yaml")).unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidColumn { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_default_scaffold_parses() {
        let def = GeneratorDefinition::parse(&default_scaffold("ops.users"), Path::new("s.yaml")).unwrap();
        assert_eq!(def.columns.len(), 4);
        assert_eq!(def.columns[0], ("id".to_string(), "number.int".to_string()));
        assert_eq!(def.columns[3].0, "created_at");
    }

    #[test]
    fn test_get_or_create_persists_scaffold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faker/users.yaml");
        let source =
            get_or_create_default(&path, "users", ScaffoldMode::Persist { force: false }).unwrap();
        assert!(source.was_scaffolded());
        assert!(path.exists());

        let again =
            get_or_create_default(&path, "users", ScaffoldMode::Persist { force: false }).unwrap();
        assert!(!again.was_scaffolded());
        assert_eq!(again.definition(), source.definition());
    }

    #[test]
    fn test_get_or_create_in_memory_leaves_disk_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.yaml");
        let source = get_or_create_default(&path, "users", ScaffoldMode::InMemory).unwrap();
        assert!(source.was_scaffolded());
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "columns: [\n").unwrap();
        let err = get_or_create_default(&path, "users", ScaffoldMode::InMemory).unwrap_err();
        assert!(matches!(err, DefinitionError::Parse { .. }));
    }
}
