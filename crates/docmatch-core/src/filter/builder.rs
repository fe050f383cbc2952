//! Fluent construction of filter expressions

use super::matcher::Matcher;
use super::value::{Map, Value};

/// Filter builder for fluent API
///
/// Conditions on distinct fields become one field map. Operators added to
/// the same field merge into one operator node; a clash on a field falls back
/// to an `_and` of single-field expressions.
///
/// ```rust
/// use docmatch_core::{matches, value, FilterBuilder};
///
/// let filter = FilterBuilder::new()
///     .gte("age", 18)
///     .lt("age", 65)
///     .in_list("roles", ["admin", "moderator"])
///     .build();
///
/// let doc = value!({ "age": 30, "roles": ["user", "admin"] });
/// assert!(matches(&filter, &doc).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    clauses: Vec<(String, Value)>,
    combinators: Vec<Value>,
}

impl FilterBuilder {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add literal condition: equality, or membership for array values
    pub fn field(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.clauses.push((field.to_string(), value.into()));
        self
    }

    /// Add `_eq` condition
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "_eq", value.into())
    }

    /// Add `_ne` condition
    pub fn ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "_ne", value.into())
    }

    /// Add `_gt` condition
    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "_gt", value.into())
    }

    /// Add `_gte` condition
    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "_gte", value.into())
    }

    /// Add `_lt` condition
    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "_lt", value.into())
    }

    /// Add `_lte` condition
    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "_lte", value.into())
    }

    /// Add `_in` condition
    pub fn in_list<I, T>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.operator(field, "_in", collect(values))
    }

    /// Add `_nin` condition
    pub fn nin<I, T>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.operator(field, "_nin", collect(values))
    }

    /// Add `_exists` condition
    pub fn exists(self, field: &str, should_exist: bool) -> Self {
        self.operator(field, "_exists", Value::Bool(should_exist))
    }

    /// Add `_contains` condition
    pub fn contains(self, field: &str, needle: &str) -> Self {
        self.operator(field, "_contains", needle.into())
    }

    /// Add `_icontains` condition
    pub fn icontains(self, field: &str, needle: &str) -> Self {
        self.operator(field, "_icontains", needle.into())
    }

    /// Add `_startsWith` condition
    pub fn starts_with(self, field: &str, prefix: &str) -> Self {
        self.operator(field, "_startsWith", prefix.into())
    }

    /// Add `_istartsWith` condition
    pub fn istarts_with(self, field: &str, prefix: &str) -> Self {
        self.operator(field, "_istartsWith", prefix.into())
    }

    /// Add `_endsWith` condition
    pub fn ends_with(self, field: &str, suffix: &str) -> Self {
        self.operator(field, "_endsWith", suffix.into())
    }

    /// Add `_iendsWith` condition
    pub fn iends_with(self, field: &str, suffix: &str) -> Self {
        self.operator(field, "_iendsWith", suffix.into())
    }

    /// Add `_regex` condition
    pub fn regex(self, field: &str, pattern: &str) -> Self {
        self.operator(field, "_regex", pattern.into())
    }

    /// Add exact `_size` condition
    pub fn size(self, field: &str, size: usize) -> Self {
        self.operator(field, "_size", size.into())
    }

    /// Add `_size` condition tested by operators, e.g. `{ "_gte": 2 }`
    pub fn size_matching(self, field: &str, condition: impl Into<Value>) -> Self {
        self.operator(field, "_size", condition.into())
    }

    /// Add `_elemMatch` condition
    pub fn elem_match(self, field: &str, expression: impl Into<Value>) -> Self {
        self.operator(field, "_elemMatch", expression.into())
    }

    /// Add `_not` condition on a field
    pub fn not_field(self, field: &str, condition: impl Into<Value>) -> Self {
        self.operator(field, "_not", condition.into())
    }

    /// Require every expression to hold
    pub fn and<I, T>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.combinators.push(single("_and", collect(expressions)));
        self
    }

    /// Require at least one expression to hold
    pub fn or<I, T>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.combinators.push(single("_or", collect(expressions)));
        self
    }

    /// Require the expression not to hold
    pub fn not(mut self, expression: impl Into<Value>) -> Self {
        self.combinators.push(single("_not", expression.into()));
        self
    }

    /// Build the filter expression
    pub fn build(self) -> Value {
        let mut fields = Map::new();
        let mut parts = Vec::new();

        for (field, condition) in self.clauses {
            match fields.get_mut(&field) {
                None => {
                    fields.insert(field, condition);
                }
                Some(existing) => {
                    if let Some(condition) = merge(existing, condition) {
                        parts.push(single(&field, condition));
                    }
                }
            }
        }

        if !fields.is_empty() {
            parts.insert(0, Value::Object(fields));
        }
        parts.extend(self.combinators);

        match parts.len() {
            0 => Value::Object(Map::new()),
            1 => parts.remove(0),
            _ => single("_and", Value::Array(parts)),
        }
    }

    /// Build a reusable matcher
    pub fn matcher(self) -> Matcher {
        Matcher::new(self.build())
    }

    fn operator(mut self, field: &str, name: &str, operand: Value) -> Self {
        self.clauses.push((field.to_string(), single(name, operand)));
        self
    }
}

/// Merge `condition` into `existing`; returns it back when both cannot share
/// one operator node
fn merge(existing: &mut Value, condition: Value) -> Option<Value> {
    let Value::Object(target) = existing else {
        return Some(condition);
    };
    let mergeable = match &condition {
        Value::Object(source) => {
            is_operator_node(target)
                && is_operator_node(source)
                && !source.keys().any(|key| target.contains_key(key))
        }
        _ => false,
    };
    if !mergeable {
        return Some(condition);
    }
    if let Value::Object(source) = condition {
        target.extend(source);
    }
    None
}

fn is_operator_node(map: &Map) -> bool {
    map.keys().all(|key| key.starts_with('_'))
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn collect<I, T>(values: I) -> Value
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    Value::Array(values.into_iter().map(Into::into).collect())
}
