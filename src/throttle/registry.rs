//! Shared throttle registry
//!
//! One registry is built by the host and shared by every serving instance.
//! Lookups take a read lock; merges take the write lock and apply a whole
//! source at once, so a lookup sees either the table before or after a
//! merge, never a mix.

use super::pattern;
use super::{parse_throttles, ThrottleError};
use crate::logger;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// Rate limit for request paths matching a wildcard pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleRule {
    /// Pattern matched against the logical request path
    pub pattern: String,
    pub max_bytes_per_sec: u64,
}

/// Ordered pattern table; the first matching pattern wins
#[derive(Debug, Default)]
pub struct ThrottleRegistry {
    rules: RwLock<Vec<ThrottleRule>>,
}

impl ThrottleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from rules, later duplicates replacing earlier ones
    pub fn from_rules(rules: impl IntoIterator<Item = ThrottleRule>) -> Self {
        let registry = Self::new();
        registry.merge(rules);
        registry
    }

    /// Merge rules into the table
    ///
    /// A rule whose pattern is already present replaces the old rate in
    /// place; new patterns are appended. Other entries are left intact.
    pub fn merge(&self, rules: impl IntoIterator<Item = ThrottleRule>) {
        let mut table = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        for rule in rules {
            match table.iter_mut().find(|existing| existing.pattern == rule.pattern) {
                Some(existing) => existing.max_bytes_per_sec = rule.max_bytes_per_sec,
                None => table.push(rule),
            }
        }
    }

    /// Parse a throttle source and merge it, returning the number of rules read
    pub fn load_str(&self, source: &str) -> Result<usize, ThrottleError> {
        let rules = parse_throttles(source)?;
        let count = rules.len();
        self.merge(rules);
        Ok(count)
    }

    /// Read a throttle file and merge it, returning the number of rules read
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<usize, ThrottleError> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ThrottleError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let count = self.load_str(&source)?;
        logger::log_throttles_loaded(path, count);
        Ok(count)
    }

    /// Find the first rule whose pattern matches the logical request path
    pub fn lookup(&self, request_path: &str) -> Option<ThrottleRule> {
        let table = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        table
            .iter()
            .find(|rule| pattern::matches(&rule.pattern, request_path))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
