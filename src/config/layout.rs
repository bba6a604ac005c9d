//! Project-relative locations of every file the pipelines read or write.

use std::path::{Path, PathBuf};

/// Name of the configuration document at the project root
pub const CONFIG_FILE_NAME: &str = "tusk.yaml";

/// Resolves project-relative paths against a project root
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Directory holding every generated artifact
    pub fn artifact_dir(&self) -> PathBuf {
        self.root.join("infrastructure/volume-mounts/ddl")
    }

    pub fn init_sql_path(&self) -> PathBuf {
        self.root.join("infrastructure/volume-mounts/000_init.sql")
    }

    pub fn build_context_dir(&self) -> PathBuf {
        self.root.join("infrastructure/build-context")
    }

    pub fn queries_dir(&self) -> PathBuf {
        self.root.join("templates/queries")
    }

    pub fn faker_dir(&self) -> PathBuf {
        self.root.join("templates/faker")
    }

    /// Resolve a path from the configuration document.
    ///
    /// Absolute paths are kept; relative ones are taken from the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Path relative to the project root, for log messages
    pub fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(&self.root).unwrap_or(path).display()
    }
}

/// Relative location of a table's flat file, as referenced from `\copy`.
///
/// This stays relative: `psql` resolves it against its working directory
/// when the artifact is replayed.
pub fn csv_reference(table: &str) -> String {
    format!("templates/csv/{}.csv", table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new("/proj");
        assert_eq!(
            layout.artifact_dir(),
            PathBuf::from("/proj/infrastructure/volume-mounts/ddl")
        );
        assert_eq!(layout.config_path(), PathBuf::from("/proj/tusk.yaml"));
        assert_eq!(
            layout.resolve(Path::new("./templates/faker/a.yaml")),
            PathBuf::from("/proj/./templates/faker/a.yaml")
        );
        assert_eq!(
            layout.resolve(Path::new("/abs/a.yaml")),
            PathBuf::from("/abs/a.yaml")
        );
    }
}
