//! Query template selection for `tusk query --file`.
//!
//! The argument is resolved inside `templates/queries` and may be a plain
//! file name or a glob pattern like `orders_*.sql`.

use std::path::{Path, PathBuf};

/// Result of expanding a template argument
#[derive(Debug)]
pub struct ExpandedFiles {
    pub files: Vec<PathBuf>,
    pub pattern_was_glob: bool,
}

/// Check if a path string contains glob pattern characters.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Expand a template name or glob pattern relative to `dir`.
///
/// # Errors
///
/// Returns an error if:
/// - The glob pattern is invalid
/// - No files match the pattern
/// - A literal path doesn't exist
pub fn expand_template_arg(dir: &Path, arg: &str) -> anyhow::Result<ExpandedFiles> {
    let pattern = dir.join(arg);
    let pattern_str = pattern.to_string_lossy();

    if !is_glob_pattern(arg) {
        if !pattern.is_file() {
            anyhow::bail!("query template does not exist: {}", pattern.display());
        }
        return Ok(ExpandedFiles {
            files: vec![pattern.clone()],
            pattern_was_glob: false,
        });
    }

    let mut files = Vec::new();
    for entry in glob::glob(&pattern_str)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", arg, e))?
    {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => anyhow::bail!("error reading path for pattern '{}': {}", arg, e),
        }
    }

    if files.is_empty() {
        anyhow::bail!("no query templates match pattern: {}", arg);
    }
    files.sort();

    Ok(ExpandedFiles {
        files,
        pattern_was_glob: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_glob_pattern() {
        assert!(!is_glob_pattern("orders.sql"));
        assert!(is_glob_pattern("*.sql"));
        assert!(is_glob_pattern("order?.sql"));
        assert!(is_glob_pattern("[ab].sql"));
    }

    #[test]
    fn test_expand_literal_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("orders.sql"), "SELECT 1;").unwrap();

        let result = expand_template_arg(dir.path(), "orders.sql").unwrap();
        assert!(!result.pattern_was_glob);
        assert_eq!(result.files, vec![dir.path().join("orders.sql")]);
    }

    #[test]
    fn test_expand_literal_name_missing() {
        let dir = TempDir::new().unwrap();
        let err = expand_template_arg(dir.path(), "nope.sql").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_expand_glob_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b_orders.sql"), "SELECT 2;").unwrap();
        fs::write(dir.path().join("a_orders.sql"), "SELECT 1;").unwrap();
        fs::write(dir.path().join("users.sql"), "SELECT 3;").unwrap();

        let result = expand_template_arg(dir.path(), "*_orders.sql").unwrap();
        assert!(result.pattern_was_glob);
        assert_eq!(
            result.files,
            vec![dir.path().join("a_orders.sql"), dir.path().join("b_orders.sql")]
        );
    }

    #[test]
    fn test_expand_glob_no_matches() {
        let dir = TempDir::new().unwrap();
        let err = expand_template_arg(dir.path(), "*.sql").unwrap_err();
        assert!(err.to_string().contains("no query templates match"));
    }
}
