//! Value generators for synthetic rows.
//!
//! A generator is addressed by a two-segment dotted path, `category.name`
//! (for example `person.fullName`). Paths are resolved against an explicit
//! registry rather than looked up dynamically; anything that is not
//! registered resolves to "no value", which renders as `NULL`.

mod builtin;
mod definition;

pub use definition::{
    default_scaffold, get_or_create_default, write_scaffold, DefinitionSource, GeneratorDefinition,
    ScaffoldMode,
};

use crate::literal::SqlValue;
use ahash::AHashMap;

/// A value-producing function, invoked once per resolution
pub type GeneratorFn = fn() -> SqlValue;

/// A registered leaf in the generator namespace
#[derive(Debug, Clone)]
pub enum Generator {
    /// Invoked on every resolution, so successive rows differ
    Func(GeneratorFn),
    /// Returned as-is
    Constant(SqlValue),
}

impl Generator {
    fn produce(&self) -> SqlValue {
        match self {
            Generator::Func(f) => f(),
            Generator::Constant(v) => v.clone(),
        }
    }
}

/// Registry of generators keyed by category, then generator name
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    categories: AHashMap<String, AHashMap<String, Generator>>,
}

impl GeneratorRegistry {
    /// Registry with no generators
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in catalogue
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Add or replace a generator
    pub fn register(&mut self, category: &str, name: &str, generator: Generator) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), generator);
    }

    /// Look up the leaf addressed by `path`
    pub fn lookup(&self, path: &str) -> Option<&Generator> {
        let (category, name) = split_path(path)?;
        self.categories.get(category)?.get(name)
    }

    /// Produce one value for `path`, or `None` if the path is not registered
    pub fn resolve(&self, path: &str) -> Option<SqlValue> {
        self.lookup(path).map(Generator::produce)
    }

    /// True if `path` addresses a registered generator
    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Every registered path, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .categories
            .iter()
            .flat_map(|(category, names)| names.keys().map(move |n| format!("{category}.{n}")))
            .collect();
        paths.sort();
        paths
    }
}

/// Split `category.name`; anything other than exactly two non-empty segments is rejected
fn split_path(path: &str) -> Option<(&str, &str)> {
    let (category, name) = path.trim().split_once('.')?;
    if category.is_empty() || name.is_empty() || name.contains('.') {
        return None;
    }
    Some((category, name))
}
