#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! # docmatch-core
//!
//! MongoDB-style filter expressions evaluated against in-memory documents

pub mod filter;

pub use filter::{
    matcher, matches, matches_any, matches_with, mongo_path, resolve, CaseFolding, Extractor,
    ExtractorScope, FilterBuilder, FilterError, Map, MatchOptions, Matcher, PathResolver,
    Resolved, Result, Value,
};

#[doc(hidden)]
pub use serde_json as __json;

/// Build a [`Value`] from JSON literal syntax.
///
/// ```rust
/// use docmatch_core::value;
///
/// let doc = value!({ "name": "Alice", "roles": ["admin", "user"] });
/// assert_eq!(doc.get("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
#[macro_export]
macro_rules! value {
    ($($json:tt)+) => {
        $crate::Value::from($crate::__json::json!($($json)+))
    };
}
