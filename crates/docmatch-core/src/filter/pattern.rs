//! Compiled `_regex` patterns
//!
//! A [`PatternCache`] belongs to one matcher and is keyed by the pattern text,
//! so a filter applied to many documents compiles each pattern once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;
use tracing::trace;

use super::{FilterError, Result};

/// Default number of patterns kept by a cache
pub const DEFAULT_PATTERN_CACHE_CAPACITY: usize = 64;

/// Bounded cache of compiled regular expressions
#[derive(Debug)]
pub struct PatternCache {
    capacity: usize,
    patterns: RwLock<HashMap<String, Arc<Regex>>>,
}

impl PatternCache {
    /// Create a cache holding at most `capacity` patterns.
    /// A zero capacity compiles on every lookup.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Compiled form of `pattern`, compiling and caching it if needed
    pub fn get(&self, pattern: &str) -> Result<Arc<Regex>> {
        if let Some(found) = self.patterns.read().get(pattern) {
            return Ok(Arc::clone(found));
        }

        let compiled = Regex::new(pattern).map_err(|source| FilterError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        let compiled = Arc::new(compiled);
        trace!(pattern, "compiled _regex pattern");

        if self.capacity > 0 {
            let mut patterns = self.patterns.write();
            if patterns.len() >= self.capacity && !patterns.contains_key(pattern) {
                if let Some(evicted) = patterns.keys().next().cloned() {
                    trace!(pattern = %evicted, "evicting cached pattern");
                    patterns.remove(&evicted);
                }
            }
            patterns.insert(pattern.to_string(), Arc::clone(&compiled));
        }

        Ok(compiled)
    }

    /// Maximum number of cached patterns
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.patterns.read().len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.patterns.read().is_empty()
    }

    /// Drop every cached pattern
    pub fn clear(&self) {
        self.patterns.write().clear();
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_CACHE_CAPACITY)
    }
}

impl Clone for PatternCache {
    fn clone(&self) -> Self {
        Self {
            capacity: self.capacity,
            patterns: RwLock::new(self.patterns.read().clone()),
        }
    }
}
