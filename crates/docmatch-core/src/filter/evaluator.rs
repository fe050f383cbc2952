//! Expression evaluator
//!
//! Recursive descent over the expression tree. Each call runs, in order: the
//! null guard, the scalar shortcut, the sibling combinator check, collection
//! broadcast, combinator dispatch, field-map evaluation and finally the leaf
//! fallback into the operator engine.

use tracing::debug;

use super::compare::equal;
use super::operator::Node;
use super::path::{Extractor, PathResolver, Resolved};
use super::pattern::PatternCache;
use super::value::Value;
use super::{ExtractorScope, FilterError, Result};

static DEFAULT_EXTRACTOR: PathResolver = PathResolver;

/// State shared by one top-level evaluation
pub(crate) struct Evaluator<'m> {
    extractor: &'m dyn Extractor,
    scope: ExtractorScope,
    pub(super) patterns: &'m PatternCache,
}

impl<'m> Evaluator<'m> {
    pub(crate) fn new(
        extractor: &'m dyn Extractor,
        scope: ExtractorScope,
        patterns: &'m PatternCache,
    ) -> Self {
        Self {
            extractor,
            scope,
            patterns,
        }
    }

    /// Evaluate `expression` against `document` with the caller's extractor
    pub(crate) fn evaluate(&self, expression: &Value, document: &Value) -> Result<bool> {
        self.eval(expression, document, self.extractor)
    }

    /// Extractor for evaluations below the outermost field map
    pub(super) fn nested(&self) -> &'m dyn Extractor {
        match self.scope {
            ExtractorScope::Outermost => &DEFAULT_EXTRACTOR,
            ExtractorScope::Inherited => self.extractor,
        }
    }

    pub(super) fn eval(
        &self,
        expression: &Value,
        document: &Value,
        extractor: &dyn Extractor,
    ) -> Result<bool> {
        match expression {
            Value::Null => {
                debug!("rejecting null filter expression");
                Err(FilterError::NullExpression)
            }
            Value::Object(map) => self.eval_node(Node::Map(map), document, extractor),
            literal => match document {
                Value::Array(items) => {
                    try_any(items, |item| self.eval(literal, item, extractor))
                }
                _ => Ok(equal(literal, document)),
            },
        }
    }

    pub(super) fn eval_node(
        &self,
        node: Node<'_>,
        document: &Value,
        extractor: &dyn Extractor,
    ) -> Result<bool> {
        let and = node.get("_and");
        let or = node.get("_or");
        if and.is_some() && or.is_some() {
            debug!("rejecting expression with sibling _and and _or");
            return Err(FilterError::AmbiguousCombinator);
        }

        if let Value::Array(items) = document {
            return try_any(items, |item| self.eval_node(node, item, extractor));
        }
        if let Some(Value::Array(expressions)) = and {
            return try_all(expressions, |expression| {
                self.eval(expression, document, self.nested())
            });
        }
        if let Some(Value::Array(expressions)) = or {
            return try_any(expressions, |expression| {
                self.eval(expression, document, self.nested())
            });
        }
        if let Some(negated) = node.get("_not") {
            if !negated.is_object() {
                debug!(operand = negated.type_name(), "rejecting _not operand");
                return Err(FilterError::InvalidNegation(negated.type_name()));
            }
            return Ok(!self.eval(negated, document, self.nested())?);
        }

        if document.is_object() {
            for (path, condition) in node.entries() {
                let resolved = extractor.extract(document, path);
                if !self.test(condition, &resolved)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        self.test_node(node, &Resolved::borrowed(document))
    }
}

/// `Iterator::any` for fallible predicates
pub(super) fn try_any<I, F>(items: I, mut predicate: F) -> Result<bool>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Result<bool>,
{
    for item in items {
        if predicate(item)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// `Iterator::all` for fallible predicates
pub(super) fn try_all<I, F>(items: I, mut predicate: F) -> Result<bool>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Result<bool>,
{
    for item in items {
        if !predicate(item)? {
            return Ok(false);
        }
    }
    Ok(true)
}
