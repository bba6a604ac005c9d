//! Credentials file (`.pgpass`) lookup.
//!
//! Each line is `host:port:database:user:password`. Any of the first four
//! fields may be `*`. `\:` and `\\` escape a colon or backslash. The first
//! matching line wins.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One credentials line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassEntry {
    pub host: String,
    pub port: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl PassEntry {
    fn matches(&self, host: &str, port: u16, database: &str, username: &str) -> bool {
        field_matches(&self.host, host)
            && field_matches(&self.port, &port.to_string())
            && field_matches(&self.database, database)
            && field_matches(&self.username, username)
    }
}

fn field_matches(pattern: &str, value: &str) -> bool {
    pattern == "*" || pattern == value
}

/// Parsed credentials file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassFile {
    entries: Vec<PassEntry>,
}

impl PassFile {
    /// Parse credentials text. Comment, blank and short lines are ignored.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
            .filter_map(parse_line)
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        fs::read_to_string(path).map(|content| Self::parse(&content))
    }

    /// Credentials file from `$PGPASSFILE`, else `~/.pgpass`, if it exists and is readable
    pub fn from_env_or_home() -> Option<Self> {
        let path = default_location()?;
        if !path.exists() {
            debug!(path = %path.display(), "no credentials file");
            return None;
        }
        match Self::load(&path) {
            Ok(passfile) => Some(passfile),
            Err(e) => {
                warn!("Could not read credentials file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Password of the first entry matching the connection
    pub fn lookup(&self, host: &str, port: u16, database: &str, username: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.matches(host, port, database, username))
            .map(|e| e.password.as_str())
    }

    pub fn entries(&self) -> &[PassEntry] {
        &self.entries
    }
}

fn default_location() -> Option<PathBuf> {
    match env::var_os("PGPASSFILE") {
        Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
        _ => dirs::home_dir().map(|home| home.join(".pgpass")),
    }
}

/// Split a line into its five fields; the password takes the rest of the line
fn parse_line(line: &str) -> Option<PassEntry> {
    let mut fields: Vec<String> = Vec::with_capacity(5);
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ':' if fields.len() < 4 => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if fields.len() < 4 {
        return None;
    }
    fields.push(current);

    let mut it = fields.into_iter();
    Some(PassEntry {
        host: it.next()?,
        port: it.next()?,
        database: it.next()?,
        username: it.next()?,
        password: it.next()?,
    })
}
