//! # docmatch
//!
//! MongoDB-style filter expressions evaluated against in-memory JSON-like
//! documents. Operators are spelled with a leading underscore (`_gt`, `_in`,
//! `_elemMatch`, ...) and field paths may be dotted, with numeric segments
//! indexing into arrays and other segments traversing through them.
//!
//! This is the top-level crate re-exporting [`docmatch-core`] and shipping the
//! `docmatch` command-line filter.
//!
//! ```rust
//! use docmatch::{matcher, value};
//!
//! let users = vec![
//!     value!({ "name": "John Doe", "roles": ["admin", "user"] }),
//!     value!({ "name": "Jane Smith", "roles": ["user"] }),
//! ];
//! let admins = matcher(value!({ "roles": "admin" }));
//! assert_eq!(admins.count(&users).unwrap(), 1);
//! ```
//!
//! [`docmatch-core`]: docmatch_core

pub use docmatch_core::filter;
pub use docmatch_core::filter::compare;
pub use docmatch_core::filter::path;
pub use docmatch_core::value;
pub use docmatch_core::{
    matcher, matches, matches_any, matches_with, mongo_path, resolve, CaseFolding, Extractor,
    ExtractorScope, FilterBuilder, FilterError, Map, MatchOptions, Matcher, PathResolver,
    Resolved, Result, Value,
};
