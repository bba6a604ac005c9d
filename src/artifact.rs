//! Artifact naming.
//!
//! Every generated script lands in one flat directory as
//! `<prefix>__<host>__<target>__<table>.sql`, where the prefix is a
//! three-digit ordering number. Lexicographic order of the names is the
//! order in which the database container replays them.

use crate::writer;
use std::path::{Path, PathBuf};

/// Separator between name segments
pub const SEGMENT_SEPARATOR: &str = "__";

/// A generated script and the segments of its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub prefix: String,
    pub host_tag: String,
    pub target_tag: String,
    pub table_tag: String,
    pub body: String,
}

/// Result of persisting an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Written(PathBuf),
    Locked(PathBuf),
}

impl Persisted {
    pub fn path(&self) -> &Path {
        match self {
            Persisted::Written(p) | Persisted::Locked(p) => p,
        }
    }
}

impl Artifact {
    /// Build an artifact, sanitizing every name segment
    pub fn new(prefix: impl Into<String>, host: &str, target: &str, table: &str, body: String) -> Self {
        Self {
            prefix: prefix.into(),
            host_tag: sanitize_identifier(host),
            target_tag: sanitize_identifier(target),
            table_tag: sanitize_identifier(table),
            body,
        }
    }

    pub fn file_name(&self) -> String {
        [
            self.prefix.as_str(),
            &self.host_tag,
            &self.target_tag,
            &self.table_tag,
        ]
        .join(SEGMENT_SEPARATOR)
            + ".sql"
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }

    /// Write the body into `dir` through the lock-aware writer
    pub fn persist(&self, dir: &Path, force: bool) -> std::io::Result<Persisted> {
        let path = self.path_in(dir);
        if writer::safe_write(&path, &self.body, force)? {
            Ok(Persisted::Written(path))
        } else {
            Ok(Persisted::Locked(path))
        }
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_`, then collapse runs of `_`.
///
/// The result never contains two consecutive underscores, so it can never
/// contain the segment separator.
pub fn sanitize_identifier(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}
