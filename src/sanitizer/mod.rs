//! Schema dump sanitization.
//!
//! Dumps taken from managed PostgreSQL services reference extensions and
//! replication objects that do not exist in a plain local server. Those
//! statements are commented out (never removed) so the dump replays
//! cleanly, and the extensions that remain are mapped to the OS packages
//! and preload libraries the local image needs.
//!
//! Rewriting is line based: a statement is only touched when it starts at
//! the beginning of a line and ends with `;` on that same line.

mod build_context;

pub use build_context::{update_build_context, BuildContextUpdate};

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Extensions that only exist on managed cloud services
pub const DISALLOWED_EXTENSIONS: &[&str] = &[
    "aws_s3",
    "aws_lambda",
    "aws_ml",
    "pg_tle",
    "rds_tools",
    "apg_plan_mgmt",
];

/// Extension → OS package providing it
pub const EXTENSION_PACKAGES: &[(&str, &str)] = &[
    ("plperl", "postgresql-plperl-16"),
    ("plpython3u", "postgresql-plpython3-16"),
    ("pltcl", "postgresql-pltcl-16"),
    ("postgis", "postgresql-16-postgis-3"),
    ("pg_repack", "postgresql-16-repack"),
    ("pg_cron", "postgresql-16-cron"),
    ("pg_partman", "postgresql-16-partman"),
    ("pgvector", "postgresql-16-pgvector"),
];

/// Extension → library that must be in `shared_preload_libraries`
pub const EXTENSION_CONFIGS: &[(&str, &str)] = &[
    ("pg_stat_statements", "pg_stat_statements"),
    ("pg_cron", "pg_cron"),
    ("pg_partman_bgw", "pg_partman_bgw"),
];

static DISALLOWED_CREATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^(CREATE EXTENSION (?:IF NOT EXISTS )?(?:{})\b.*;)",
        DISALLOWED_EXTENSIONS.join("|")
    ))
    .unwrap()
});

static DISALLOWED_COMMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^(COMMENT ON EXTENSION (?:{})\b.*;)",
        DISALLOWED_EXTENSIONS.join("|")
    ))
    .unwrap()
});

static REPLICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^((?:CREATE|ALTER) (?:PUBLICATION|SUBSCRIPTION)\b.*;)").unwrap()
});

static ACTIVE_EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^CREATE EXTENSION (?:IF NOT EXISTS )?(\w+)").unwrap());

/// Sanitized dump plus what the local image needs to replay it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedDdl {
    pub text: String,
    pub required_packages: BTreeSet<String>,
    pub required_configs: BTreeSet<String>,
}

/// Comment out unsupported statements and collect extension requirements
pub fn sanitize(ddl: &str) -> SanitizedDdl {
    let text = DISALLOWED_CREATE_RE.replace_all(ddl, "-- $1");
    let text = DISALLOWED_COMMENT_RE.replace_all(&text, "-- $1");
    let text = REPLICATION_RE.replace_all(&text, "-- $1").into_owned();

    let mut required_packages = BTreeSet::new();
    let mut required_configs = BTreeSet::new();
    for caps in ACTIVE_EXTENSION_RE.captures_iter(&text) {
        let name = &caps[1];
        if let Some(pkg) = lookup(EXTENSION_PACKAGES, name) {
            required_packages.insert(pkg.to_string());
        }
        if let Some(lib) = lookup(EXTENSION_CONFIGS, name) {
            required_configs.insert(lib.to_string());
        }
    }

    SanitizedDdl {
        text,
        required_packages,
        required_configs,
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

impl SanitizedDdl {
    /// Fold another result's requirements into this one
    pub fn merge_requirements(&mut self, other: &SanitizedDdl) {
        self.required_packages
            .extend(other.required_packages.iter().cloned());
        self.required_configs
            .extend(other.required_configs.iter().cloned());
    }
}
