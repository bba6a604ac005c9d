//! Per-item results of a pipeline run.
//!
//! Pipelines never stop on a single failing item; they record what
//! happened to each item here and the command layer prints the result
//! (as text or, with `--json`, as JSON).

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What happened to one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// File written
    Written { path: PathBuf },
    /// Existing file carries the lock marker and was left alone
    Locked { path: PathBuf },
    /// Dry run: the file that would have been written
    DryRun { path: PathBuf },
    /// Executed successfully without producing a file
    Applied,
    /// Nothing to do, with the reason
    Skipped { reason: String },
    /// The item failed; the run continued
    Failed { error: String },
}

/// One item (directive, database, template or file) and its outcome
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ItemReport {
    pub fn new(item: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            item: item.into(),
            method: None,
            prefix: None,
            outcome,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }
}

/// Outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub written: usize,
    pub locked: usize,
    pub dry_run: usize,
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_items(items: &[ItemReport]) -> Self {
        let mut summary = Summary::default();
        for item in items {
            summary.add(&item.outcome);
        }
        summary
    }

    fn add(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Written { .. } => self.written += 1,
            Outcome::Locked { .. } => self.locked += 1,
            Outcome::DryRun { .. } => self.dry_run += 1,
            Outcome::Applied => self.applied += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn merge(&mut self, other: Summary) {
        self.written += other.written;
        self.locked += other.locked;
        self.dry_run += other.dry_run;
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} locked, {} skipped, {} failed",
            self.written, self.locked, self.skipped, self.failed
        )?;
        if self.applied > 0 {
            write!(f, ", {} applied", self.applied)?;
        }
        if self.dry_run > 0 {
            write!(f, ", {} planned (dry run)", self.dry_run)?;
        }
        Ok(())
    }
}

/// Items grouped under one heading (usually a database mapping)
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub name: String,
    pub items: Vec<ItemReport>,
    pub summary: Summary,
}

impl GroupReport {
    pub fn new(name: impl Into<String>, items: Vec<ItemReport>) -> Self {
        let summary = Summary::from_items(&items);
        Self {
            name: name.into(),
            items,
            summary,
        }
    }
}

/// Full result of one pipeline invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    pub fn push(&mut self, group: GroupReport) {
        self.groups.push(group);
    }

    pub fn summary(&self) -> Summary {
        let mut total = Summary::default();
        for group in &self.groups {
            total.merge(group.summary);
        }
        total
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemReport> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }
}
