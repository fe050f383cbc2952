//! Public entry points
//!
//! Three call shapes are offered:
//! - [`matcher`] builds a reusable [`Matcher`] predicate
//! - [`matches`] and [`matches_with`] test one document
//! - [`matches_any`] tests a collection existentially
//!
//! A document that is itself an array is always treated as a collection.

use tracing::trace;

use super::evaluator::Evaluator;
use super::path::{Extractor, PathResolver};
use super::pattern::PatternCache;
use super::value::{Map, Value};
use super::{ExtractorScope, MatchOptions, Result};

/// Test `document` against `expression`
///
/// # Errors
///
/// Returns an error when the expression is null, combines `_and` with `_or`
/// on one node, negates a non-mapping, or carries an invalid `_regex`.
pub fn matches(expression: &Value, document: &Value) -> Result<bool> {
    matches_with(expression, document, &PathResolver)
}

/// Test `document` against `expression`, resolving outermost field paths
/// with `extractor`
pub fn matches_with(
    expression: &Value,
    document: &Value,
    extractor: &dyn Extractor,
) -> Result<bool> {
    let patterns = PatternCache::default();
    Evaluator::new(extractor, ExtractorScope::Outermost, &patterns).evaluate(expression, document)
}

/// Whether any document in `documents` satisfies `expression`
pub fn matches_any<'d, I>(expression: &Value, documents: I) -> Result<bool>
where
    I: IntoIterator<Item = &'d Value>,
{
    matcher(expression.clone()).any(documents)
}

/// Build a reusable predicate for `expression`
pub fn matcher(expression: impl Into<Value>) -> Matcher {
    Matcher::new(expression)
}

/// Pass a raw dotted-path mapping through unchanged
///
/// Useful when field paths are only known at runtime.
pub fn mongo_path(expression: Map) -> Value {
    Value::Object(expression)
}

/// A compiled filter expression
///
/// Holds the expression, the extractor serving its field paths, evaluation
/// options and a cache of the `_regex` patterns it has compiled.
///
/// ```rust
/// use docmatch_core::{matcher, value};
///
/// let users = vec![
///     value!({ "name": "John Doe", "age": 30 }),
///     value!({ "name": "Jane Smith", "age": 25 }),
/// ];
/// let older = matcher(value!({ "age": { "_gt": 28 } }));
/// let names: Vec<_> = older
///     .filter(&users)
///     .unwrap()
///     .into_iter()
///     .filter_map(|user| user.get("name").and_then(|name| name.as_str()))
///     .collect();
/// assert_eq!(names, ["John Doe"]);
/// ```
#[derive(Debug, Clone)]
pub struct Matcher<E = PathResolver> {
    expression: Value,
    extractor: E,
    options: MatchOptions,
    patterns: PatternCache,
}

impl Matcher {
    /// Create a matcher using the default path resolver
    pub fn new(expression: impl Into<Value>) -> Self {
        let options = MatchOptions::default();
        Self {
            expression: expression.into(),
            extractor: PathResolver,
            patterns: PatternCache::new(options.pattern_cache_capacity),
            options,
        }
    }
}

impl<E: Extractor> Matcher<E> {
    /// Replace the extractor used for field paths
    pub fn with_extractor<F: Extractor>(self, extractor: F) -> Matcher<F> {
        Matcher {
            expression: self.expression,
            extractor,
            options: self.options,
            patterns: self.patterns,
        }
    }

    /// Replace the evaluation options
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        if options.pattern_cache_capacity != self.patterns.capacity() {
            self.patterns = PatternCache::new(options.pattern_cache_capacity);
        }
        self.options = options;
        self
    }

    /// The filter expression
    pub fn expression(&self) -> &Value {
        &self.expression
    }

    /// The evaluation options
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// The extractor
    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Test one document; an array document is tested as a collection
    pub fn matches(&self, document: &Value) -> Result<bool> {
        self.evaluator().evaluate(&self.expression, document)
    }

    /// Whether any of `documents` matches
    pub fn any<'d, I>(&self, documents: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'d Value>,
    {
        let evaluator = self.evaluator();
        for document in documents {
            if evaluator.evaluate(&self.expression, document)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The documents that match, in input order
    ///
    /// Stops at the first evaluation error.
    pub fn filter<'d, I>(&self, documents: I) -> Result<Vec<&'d Value>>
    where
        I: IntoIterator<Item = &'d Value>,
    {
        let evaluator = self.evaluator();
        let mut matched = Vec::new();
        for document in documents {
            if evaluator.evaluate(&self.expression, document)? {
                matched.push(document);
            }
        }
        trace!(matched = matched.len(), "filtered documents");
        Ok(matched)
    }

    /// Number of matching documents
    pub fn count<'d, I>(&self, documents: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'d Value>,
    {
        Ok(self.filter(documents)?.len())
    }

    /// Borrow this matcher as a plain predicate closure
    pub fn predicate(&self) -> impl Fn(&Value) -> Result<bool> + '_ {
        move |document| self.matches(document)
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(
            &self.extractor,
            self.options.extractor_scope,
            &self.patterns,
        )
    }
}
