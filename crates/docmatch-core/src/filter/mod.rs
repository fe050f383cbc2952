//! Filter expressions over JSON-like documents
//!
//! This module provides a small recursive interpreter for MongoDB-style
//! filters whose operators are spelled with a leading underscore:
//! - Dotted path resolution with array indexing and array traversal
//! - Logical combinators (`_and`, `_or`, `_not`)
//! - Comparison, membership, string, regex and size operators
//! - Element matching over arrays of sub-documents (`_elemMatch`)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            matches / matches_with / Matcher                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  Expression Evaluator                       │
//! │     null guard · broadcast · combinators · field maps       │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │        Path Resolver         │       Operator Engine        │
//! │   index · traverse/flatten   │  _eq _in _gt _regex _size …  │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │               Value Comparators · Pattern Cache             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use docmatch_core::{matches, value};
//!
//! let doc = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "roles": ["admin", "user"],
//!     "orders": [{ "total": 25 }, { "total": 120 }]
//! });
//!
//! // Implicit membership against an array value
//! assert!(matches(&value!({ "roles": "admin" }), &doc).unwrap());
//!
//! // Traversal through an array of objects
//! assert!(matches(&value!({ "orders.total": { "_gt": 100 } }), &doc).unwrap());
//!
//! // Combinators
//! let filter = value!({ "_or": [{ "age": { "_lt": 18 } }, { "name": { "_startsWith": "Al" } }] });
//! assert!(matches(&filter, &doc).unwrap());
//! ```

pub mod builder;
pub mod compare;
mod evaluator;
pub mod matcher;
pub mod operator;
pub mod path;
pub mod pattern;
pub mod value;

pub use builder::FilterBuilder;
pub use matcher::{matcher, matches, matches_any, matches_with, mongo_path, Matcher};
pub use path::{resolve, CaseFolding, Extractor, PathResolver, Resolved};
pub use pattern::{PatternCache, DEFAULT_PATTERN_CACHE_CAPACITY};
pub use value::{Map, Value};

use serde::{Deserialize, Serialize};

/// Result type for filter evaluation
pub type Result<T> = std::result::Result<T, FilterError>;

/// Filter evaluation errors
///
/// Every error aborts the evaluation that raised it; no partial result is
/// produced.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// The expression itself was null
    #[error("filter expression must not be null")]
    NullExpression,

    /// `_and` and `_or` appeared on the same node
    #[error("indeterminate behavior: _and and _or cannot be siblings on the same expression node")]
    AmbiguousCombinator,

    /// `_not` was given something other than a mapping
    #[error("_not needs a regex or a document, got {0}")]
    InvalidNegation(&'static str),

    /// A `_regex` operand failed to compile
    #[error("invalid _regex pattern {pattern:?}: {source}")]
    InvalidRegex {
        /// Pattern as written in the expression
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },
}

/// Which evaluations a caller-supplied extractor serves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorScope {
    /// Only the outermost field map and the collection broadcast.
    /// Combinators, `_elemMatch`, implicit per-key matches and nested
    /// sub-document matches fall back to [`PathResolver`].
    #[default]
    Outermost,
    /// Every recursive evaluation uses the supplied extractor.
    Inherited,
}

/// Evaluation options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Reach of a custom extractor
    pub extractor_scope: ExtractorScope,
    /// Maximum number of compiled `_regex` patterns kept per matcher.
    /// Zero compiles every pattern on use.
    pub pattern_cache_capacity: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            extractor_scope: ExtractorScope::Outermost,
            pattern_cache_capacity: DEFAULT_PATTERN_CACHE_CAPACITY,
        }
    }
}

impl MatchOptions {
    /// Thread the extractor through every recursive evaluation
    pub fn inherit_extractor(mut self) -> Self {
        self.extractor_scope = ExtractorScope::Inherited;
        self
    }

    /// Set the compiled pattern cache capacity
    pub fn with_pattern_cache_capacity(mut self, capacity: usize) -> Self {
        self.pattern_cache_capacity = capacity;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = MatchOptions::default();
        assert_eq!(options.extractor_scope, ExtractorScope::Outermost);
        assert_eq!(options.pattern_cache_capacity, 64);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: MatchOptions =
            serde_json::from_str(r#"{ "extractor_scope": "inherited" }"#).unwrap();
        assert_eq!(options.extractor_scope, ExtractorScope::Inherited);
        assert_eq!(options.pattern_cache_capacity, 64);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FilterError::InvalidNegation("string").to_string(),
            "_not needs a regex or a document, got string"
        );
        assert!(FilterError::AmbiguousCombinator
            .to_string()
            .contains("_and and _or"));
    }
}
