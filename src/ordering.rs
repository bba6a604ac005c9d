//! Filename prefix allocation.
//!
//! Artifacts are replayed in ascending filename order, so the three-digit
//! prefix encodes load order: schema extraction (200s), row replication
//! (400s), query and flat-file loads (600s), synthetic data (800s).
//! Within a bucket prefixes increase by one per allocation for the whole
//! run, across every database mapping.

use crate::config::{split_qualified, SeedMethod, TuskConfig};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::warn;

/// Allocations a bucket holds before running into the next range
pub const BUCKET_WIDTH: u32 = 200;

/// Largest prefix that still renders as three digits
pub const MAX_PREFIX: u32 = 999;

/// Ordering bucket of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Schema,
    Dump,
    Query,
    Faker,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [Bucket::Schema, Bucket::Dump, Bucket::Query, Bucket::Faker];

    pub fn base(self) -> u32 {
        match self {
            Bucket::Schema => 200,
            Bucket::Dump => 400,
            Bucket::Query => 600,
            Bucket::Faker => 800,
        }
    }

    /// Render the prefix for the `offset`-th allocation in this bucket.
    ///
    /// Three digits up to 999. Past that (offset 200 and up in the faker
    /// bucket) the prefix grows a fourth digit and no longer sorts after
    /// the rest of the directory.
    pub fn prefix_for(self, offset: u32) -> String {
        format!("{:03}", self.base() + offset)
    }

    /// Bucket whose range holds a three-digit file name prefix
    pub fn for_prefix(prefix: &str) -> Option<Bucket> {
        if prefix.len() != 3 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let n: u32 = prefix.parse().ok()?;
        Bucket::ALL
            .into_iter()
            .find(|b| (b.base()..b.base() + BUCKET_WIDTH).contains(&n))
    }

    fn index(self) -> usize {
        match self {
            Bucket::Schema => 0,
            Bucket::Dump => 1,
            Bucket::Query => 2,
            Bucket::Faker => 3,
        }
    }

    /// Bucket a seed method allocates from; unrecognized methods have none
    pub fn for_method(method: &SeedMethod) -> Option<Bucket> {
        match method {
            SeedMethod::Dump => Some(Bucket::Dump),
            SeedMethod::Faker => Some(Bucket::Faker),
            SeedMethod::Query | SeedMethod::Csv => Some(Bucket::Query),
            SeedMethod::Unknown(_) => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::Schema => "schema",
            Bucket::Dump => "dump",
            Bucket::Query => "query",
            Bucket::Faker => "faker",
        };
        write!(f, "{}", name)
    }
}

/// Per-run prefix counters, one per bucket
#[derive(Debug, Default)]
pub struct PrefixAllocator {
    counters: [AtomicU32; 4],
}

impl PrefixAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next prefix in `bucket`
    pub fn next_prefix(&self, bucket: Bucket) -> String {
        let offset = self.counters[bucket.index()].fetch_add(1, Ordering::Relaxed);
        if offset == BUCKET_WIDTH {
            warn!(
                bucket = %bucket,
                "{} bucket exceeded {} artifacts; prefixes now overlap the next bucket",
                bucket,
                BUCKET_WIDTH
            );
        }
        if bucket.base() + offset == MAX_PREFIX + 1 {
            warn!(
                bucket = %bucket,
                "{} bucket passed prefix {}; prefixes are now four digits long",
                bucket,
                MAX_PREFIX
            );
        }
        bucket.prefix_for(offset)
    }

    /// Number of prefixes handed out so far in `bucket`
    pub fn allocated(&self, bucket: Bucket) -> u32 {
        self.counters[bucket.index()].load(Ordering::Relaxed)
    }
}

/// Total query/csv directives across all mappings
pub fn configured_query_slots(config: &TuskConfig) -> u32 {
    config
        .databases
        .iter()
        .flat_map(|db| &db.seed_tables)
        .filter(|d| Bucket::for_method(&d.method) == Some(Bucket::Query))
        .count() as u32
}

/// Offset in the 600 bucket that `seed` would use for `table`.
///
/// Counts query/csv directives preceding the first directive targeting the
/// table, scanning mappings then directives in declaration order. Returns
/// `None` if no query/csv directive targets the table.
pub fn query_slot(config: &TuskConfig, schema: Option<&str>, table: &str) -> Option<u32> {
    let mut slot = 0u32;
    for db in &config.databases {
        for directive in &db.seed_tables {
            if Bucket::for_method(&directive.method) != Some(Bucket::Query) {
                continue;
            }
            if directive.targets(schema, table) {
                return Some(slot);
            }
            slot += 1;
        }
    }
    None
}

/// Offset for a query-extraction artifact.
///
/// Templates that match a configured directive reuse its slot; anything
/// else is numbered after every configured slot, in call order.
pub fn extraction_slot(
    config: &TuskConfig,
    qualified_table: &str,
    unmatched: &mut u32,
) -> u32 {
    let (schema, table) = split_qualified(qualified_table);
    match query_slot(config, Some(schema), table) {
        Some(slot) => slot,
        None => {
            let slot = configured_query_slots(config) + *unmatched;
            *unmatched += 1;
            slot
        }
    }
}
