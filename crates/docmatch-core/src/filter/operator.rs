//! Operator engine
//!
//! Tests one field condition against a [`Resolved`] value. The condition is
//! first classified as a literal, a literal array or a mapping node; a mapping
//! node is then read as an implicit per-element match, a nested field
//! expression or a set of `_`-prefixed operators.

use std::borrow::Cow;
use std::slice;

use tracing::{debug, trace};

use super::compare::{
    equal, exists, greater, greater_or_equal, less, less_or_equal, size, text,
};
use super::evaluator::{try_all, try_any, Evaluator};
use super::path::Resolved;
use super::value::{Map, Value};
use super::{FilterError, Result};

/// Operators that treat an array value as a whole rather than per element
pub const ARRAY_OPERATORS: [&str; 10] = [
    "_size",
    "_elemMatch",
    "_gt",
    "_gte",
    "_lt",
    "_lte",
    "_eq",
    "_ne",
    "_in",
    "_nin",
];

/// A recognized `_`-prefixed operator with its operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operator<'e> {
    /// `_eq`
    Eq(&'e Value),
    /// `_ne`
    Ne(&'e Value),
    /// `_exists`, only with a boolean operand
    Exists(bool),
    /// `_not`
    Not(&'e Value),
    /// `_gt`
    Gt(&'e Value),
    /// `_gte`
    Gte(&'e Value),
    /// `_lt`
    Lt(&'e Value),
    /// `_lte`
    Lte(&'e Value),
    /// `_contains`
    Contains(&'e Value),
    /// `_startsWith`
    StartsWith(&'e Value),
    /// `_endsWith`
    EndsWith(&'e Value),
    /// `_icontains`
    IContains(&'e Value),
    /// `_istartsWith`
    IStartsWith(&'e Value),
    /// `_iendsWith`
    IEndsWith(&'e Value),
    /// `_in`
    In(&'e Value),
    /// `_nin`
    Nin(&'e Value),
    /// `_regex`
    Regex(&'e Value),
    /// `_size`
    Size(&'e Value),
    /// `_elemMatch`
    ElemMatch(&'e Value),
    /// `_and` over conditions on the same value
    And(&'e [Value]),
    /// `_or` over conditions on the same value
    Or(&'e [Value]),
}

impl<'e> Operator<'e> {
    /// Recognize `key`; unknown keys and malformed `_exists`, `_and` or `_or`
    /// operands yield `None`
    pub fn parse(key: &str, operand: &'e Value) -> Option<Self> {
        let operator = match key {
            "_eq" => Self::Eq(operand),
            "_ne" => Self::Ne(operand),
            "_exists" => Self::Exists(operand.as_bool()?),
            "_not" => Self::Not(operand),
            "_gt" => Self::Gt(operand),
            "_gte" => Self::Gte(operand),
            "_lt" => Self::Lt(operand),
            "_lte" => Self::Lte(operand),
            "_contains" => Self::Contains(operand),
            "_startsWith" => Self::StartsWith(operand),
            "_endsWith" => Self::EndsWith(operand),
            "_icontains" => Self::IContains(operand),
            "_istartsWith" => Self::IStartsWith(operand),
            "_iendsWith" => Self::IEndsWith(operand),
            "_in" => Self::In(operand),
            "_nin" => Self::Nin(operand),
            "_regex" => Self::Regex(operand),
            "_size" => Self::Size(operand),
            "_elemMatch" => Self::ElemMatch(operand),
            "_and" => Self::And(operand.as_array()?),
            "_or" => Self::Or(operand.as_array()?),
            _ => return None,
        };
        Some(operator)
    }

    /// Whether this operator applies per element of a flattened collection
    pub fn is_elementwise(&self) -> bool {
        matches!(
            self,
            Self::Eq(_)
                | Self::Ne(_)
                | Self::Gt(_)
                | Self::Gte(_)
                | Self::Lt(_)
                | Self::Lte(_)
                | Self::In(_)
                | Self::Nin(_)
        )
    }
}

/// An expression mapping, or a single entry of one
#[derive(Debug, Clone, Copy)]
pub(crate) enum Node<'e> {
    Map(&'e Map),
    Entry(&'e str, &'e Value),
}

impl<'e> Node<'e> {
    pub(crate) fn entries(self) -> impl Iterator<Item = (&'e str, &'e Value)> {
        let (map, entry) = match self {
            Node::Map(map) => (Some(map), None),
            Node::Entry(key, value) => (None, Some((key, value))),
        };
        map.into_iter()
            .flat_map(|map| map.iter().map(|(key, value)| (key.as_str(), value)))
            .chain(entry)
    }

    pub(crate) fn keys(self) -> impl Iterator<Item = &'e str> {
        self.entries().map(|(key, _)| key)
    }

    pub(crate) fn get(self, key: &str) -> Option<&'e Value> {
        match self {
            Node::Map(map) => map.get(key),
            Node::Entry(entry_key, value) => (entry_key == key).then_some(value),
        }
    }
}

/// Shape of a field condition
enum Condition<'e> {
    /// Implicit equality, or membership against an array value
    Literal(&'e Value),
    /// Array written directly as the condition: strict array equality
    Sequence(&'e Value),
    /// Operators or a nested field expression
    Node(Node<'e>),
}

impl<'e> Condition<'e> {
    fn classify(condition: &'e Value) -> Self {
        match condition {
            Value::Object(map) => Condition::Node(Node::Map(map)),
            Value::Array(_) => Condition::Sequence(condition),
            literal => Condition::Literal(literal),
        }
    }
}

/// Elements of an array value or of a flattened collection
enum Elements<'s, 'a> {
    Array(slice::Iter<'s, Value>),
    Flattened(slice::Iter<'s, Cow<'a, Value>>),
}

impl<'s, 'a> Iterator for Elements<'s, 'a> {
    type Item = &'s Value;

    fn next(&mut self) -> Option<&'s Value> {
        match self {
            Elements::Array(items) => items.next(),
            Elements::Flattened(items) => items.next().map(|item| item.as_ref()),
        }
    }
}

fn elements<'s, 'a>(subject: &'s Resolved<'a>) -> Option<Elements<'s, 'a>> {
    match subject {
        Resolved::Value(value) => match value.as_ref() {
            Value::Array(items) => Some(Elements::Array(items.iter())),
            _ => None,
        },
        Resolved::Flattened(items) => Some(Elements::Flattened(items.iter())),
        Resolved::Absent => None,
    }
}

fn subject_equals(subject: &Resolved<'_>, operand: &Value) -> bool {
    match subject {
        Resolved::Absent => false,
        Resolved::Value(value) => equal(value, operand),
        Resolved::Flattened(items) => match operand {
            Value::Array(expected) => {
                expected.len() == items.len()
                    && expected.iter().zip(items).all(|(e, item)| equal(e, item))
            }
            _ => false,
        },
    }
}

fn subject_size(subject: &Resolved<'_>) -> usize {
    match subject {
        Resolved::Absent => 0,
        Resolved::Value(value) => size(value),
        Resolved::Flattened(items) => items.len(),
    }
}

/// Left-hand side of an ordering operator; arrays compare by length
fn ordered<'s>(subject: &'s Resolved<'_>) -> Option<Cow<'s, Value>> {
    match subject {
        Resolved::Absent => None,
        Resolved::Value(value) => match value.as_ref() {
            Value::Array(items) => Some(Cow::Owned(Value::from(items.len()))),
            other => Some(Cow::Borrowed(other)),
        },
        Resolved::Flattened(items) => Some(Cow::Owned(Value::from(items.len()))),
    }
}

/// Membership in an `_in`/`_nin` operand; a non-array operand is a set of one
fn member(set: &Value, candidate: &Value) -> bool {
    match set {
        Value::Array(items) => items.iter().any(|item| equal(item, candidate)),
        single => equal(single, candidate),
    }
}

fn in_set(subject: &Resolved<'_>, set: &Value) -> bool {
    if let Some(mut items) = elements(subject) {
        return items.any(|item| member(set, item));
    }
    subject.as_value().is_some_and(|value| member(set, value))
}

#[derive(Clone, Copy)]
enum StringTest {
    Contains,
    StartsWith,
    EndsWith,
}

impl StringTest {
    fn check(self, haystack: &str, needle: &str) -> bool {
        match self {
            StringTest::Contains => haystack.contains(needle),
            StringTest::StartsWith => haystack.starts_with(needle),
            StringTest::EndsWith => haystack.ends_with(needle),
        }
    }
}

/// String operators pass for anything but a string value
fn string_test(subject: &Resolved<'_>, operand: &Value, test: StringTest, fold: bool) -> bool {
    let Some(Value::String(value)) = subject.as_value() else {
        return true;
    };
    let Some(needle) = text(operand) else {
        return false;
    };
    if fold {
        test.check(&value.to_lowercase(), &needle.to_lowercase())
    } else {
        test.check(value, &needle)
    }
}

impl Evaluator<'_> {
    /// Test a field condition against a resolved value
    pub(super) fn test(&self, condition: &Value, subject: &Resolved<'_>) -> Result<bool> {
        match Condition::classify(condition) {
            Condition::Literal(literal) => Ok(match elements(subject) {
                Some(mut items) => items.any(|item| equal(item, literal)),
                None => subject.as_value().is_some_and(|value| equal(value, literal)),
            }),
            Condition::Sequence(expected) => {
                Ok(elements(subject).is_some() && subject_equals(subject, expected))
            }
            Condition::Node(node) => self.test_node(node, subject),
        }
    }

    pub(super) fn test_node(&self, node: Node<'_>, subject: &Resolved<'_>) -> Result<bool> {
        if elements(subject).is_some() && !node.keys().any(|key| ARRAY_OPERATORS.contains(&key)) {
            return self.test_each_key(node, subject);
        }

        if let Some(value) = subject.as_value() {
            if value.is_object() && !node.keys().any(|key| key.starts_with('_')) {
                return self.eval_node(node, value, self.nested());
            }
        }

        self.test_operators(node, subject)
    }

    /// Every key of `node` must be satisfied by some element
    fn test_each_key(&self, node: Node<'_>, subject: &Resolved<'_>) -> Result<bool> {
        let nested = self.nested();
        try_all(node.entries(), |(key, operand)| {
            let entry = Node::Entry(key, operand);
            try_any(elements(subject).into_iter().flatten(), |item| {
                self.eval_node(entry, item, nested)
            })
        })
    }

    fn test_operators(&self, node: Node<'_>, subject: &Resolved<'_>) -> Result<bool> {
        if node.get("_and").is_some() && node.get("_or").is_some() {
            debug!("rejecting operator node with sibling _and and _or");
            return Err(FilterError::AmbiguousCombinator);
        }

        for (key, operand) in node.entries() {
            let passed = match Operator::parse(key, operand) {
                Some(operator) => match subject {
                    Resolved::Flattened(items) if operator.is_elementwise() => {
                        try_any(items, |item| {
                            self.apply(operator, &Resolved::borrowed(item.as_ref()))
                        })?
                    }
                    _ => self.apply(operator, subject)?,
                },
                None if key.starts_with('_') => {
                    trace!(operator = key, "ignoring unrecognized operator");
                    true
                }
                None => match subject.as_value() {
                    Some(value) if value.is_object() => {
                        self.eval_node(Node::Entry(key, operand), value, self.nested())?
                    }
                    _ => false,
                },
            };
            if !passed {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn apply(&self, operator: Operator<'_>, subject: &Resolved<'_>) -> Result<bool> {
        let passed = match operator {
            Operator::Eq(operand) => subject_equals(subject, operand),
            Operator::Ne(operand) => !subject_equals(subject, operand),
            Operator::Exists(should_exist) => match subject {
                Resolved::Flattened(_) => should_exist,
                other => exists(other.as_value(), should_exist),
            },
            Operator::Not(operand) => {
                if !operand.is_object() {
                    debug!(operand = operand.type_name(), "rejecting _not operand");
                    return Err(FilterError::InvalidNegation(operand.type_name()));
                }
                !self.test(operand, subject)?
            }
            Operator::Gt(operand) => ordered(subject).is_some_and(|lhs| greater(&lhs, operand)),
            Operator::Gte(operand) => {
                ordered(subject).is_some_and(|lhs| greater_or_equal(&lhs, operand))
            }
            Operator::Lt(operand) => ordered(subject).is_some_and(|lhs| less(&lhs, operand)),
            Operator::Lte(operand) => {
                ordered(subject).is_some_and(|lhs| less_or_equal(&lhs, operand))
            }
            Operator::Contains(operand) => {
                string_test(subject, operand, StringTest::Contains, false)
            }
            Operator::StartsWith(operand) => {
                string_test(subject, operand, StringTest::StartsWith, false)
            }
            Operator::EndsWith(operand) => {
                string_test(subject, operand, StringTest::EndsWith, false)
            }
            Operator::IContains(operand) => {
                string_test(subject, operand, StringTest::Contains, true)
            }
            Operator::IStartsWith(operand) => {
                string_test(subject, operand, StringTest::StartsWith, true)
            }
            Operator::IEndsWith(operand) => {
                string_test(subject, operand, StringTest::EndsWith, true)
            }
            Operator::In(set) => in_set(subject, set),
            Operator::Nin(set) => !in_set(subject, set),
            Operator::Regex(pattern) => self.regex_test(subject, pattern)?,
            Operator::Size(operand) => {
                let measured = Value::from(subject_size(subject));
                if operand.is_object() {
                    self.test(operand, &Resolved::owned(measured))?
                } else {
                    equal(&measured, operand)
                }
            }
            Operator::ElemMatch(expression) => {
                let nested = self.nested();
                try_any(elements(subject).into_iter().flatten(), |item| {
                    self.eval(expression, item, nested)
                })?
            }
            Operator::And(conditions) => {
                try_all(conditions, |condition| self.test(condition, subject))?
            }
            Operator::Or(conditions) => {
                try_any(conditions, |condition| self.test(condition, subject))?
            }
        };
        Ok(passed)
    }

    /// A non-string pattern or a value without a textual form never matches
    fn regex_test(&self, subject: &Resolved<'_>, pattern: &Value) -> Result<bool> {
        let Value::String(pattern) = pattern else {
            return Ok(false);
        };
        let regex = self.patterns.get(pattern)?;
        Ok(subject
            .as_value()
            .and_then(text)
            .is_some_and(|value| regex.is_match(&value)))
    }
}
