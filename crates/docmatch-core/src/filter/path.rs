//! Dotted path resolution
//!
//! A path such as `"orders.0.items.sku"` is split on `.` and walked left to
//! right. Numeric segments index into arrays; any other segment applied to an
//! array traverses every object element holding that key and collects the
//! results into a [`Resolved::Flattened`] collection.

use std::borrow::Cow;

use super::value::Value;

/// Outcome of resolving a path against a document
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// Nothing lives at the path
    Absent,
    /// A single value, possibly an array stored at the path
    Value(Cow<'a, Value>),
    /// Values collected by traversing through one or more arrays
    Flattened(Vec<Cow<'a, Value>>),
}

impl<'a> Resolved<'a> {
    /// Wrap a borrowed value
    pub fn borrowed(value: &'a Value) -> Self {
        Resolved::Value(Cow::Borrowed(value))
    }

    /// Wrap an owned value
    pub fn owned(value: Value) -> Self {
        Resolved::Value(Cow::Owned(value))
    }

    /// Whether resolution found nothing
    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    /// Whether resolution went through an array traversal
    pub fn is_flattened(&self) -> bool {
        matches!(self, Resolved::Flattened(_))
    }

    /// The single resolved value, if resolution yielded one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Value(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// Collapse into a plain value; a flattened collection becomes an array
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Resolved::Absent => None,
            Resolved::Value(value) => Some(value.as_ref().clone()),
            Resolved::Flattened(items) => Some(Value::Array(
                items.iter().map(|item| item.as_ref().clone()).collect(),
            )),
        }
    }

    /// Detach from the document
    pub fn into_owned(self) -> Resolved<'static> {
        match self {
            Resolved::Absent => Resolved::Absent,
            Resolved::Value(value) => Resolved::Value(Cow::Owned(value.into_owned())),
            Resolved::Flattened(items) => Resolved::Flattened(
                items
                    .into_iter()
                    .map(|item| Cow::Owned(item.into_owned()))
                    .collect(),
            ),
        }
    }
}

/// Resolve a dotted `path` against `document`
///
/// An empty path yields the document itself.
pub fn resolve<'a>(document: &'a Value, path: &str) -> Resolved<'a> {
    if path.is_empty() {
        return Resolved::borrowed(document);
    }
    let segments: Vec<&str> = path.split('.').collect();
    walk(document, &segments)
}

fn walk<'a>(current: &'a Value, segments: &[&str]) -> Resolved<'a> {
    let Some((segment, rest)) = segments.split_first() else {
        return Resolved::borrowed(current);
    };
    if segment.is_empty() {
        return Resolved::Absent;
    }

    match current {
        Value::Object(map) => match map.get(*segment) {
            Some(next) => walk(next, rest),
            None => Resolved::Absent,
        },
        Value::Array(items) if is_index(segment) => {
            match segment.parse::<usize>().ok().and_then(|i| items.get(i)) {
                Some(next) => walk(next, rest),
                None => Resolved::Absent,
            }
        }
        Value::Array(items) => traverse(items, segment, rest),
        _ => Resolved::Absent,
    }
}

fn traverse<'a>(items: &'a [Value], key: &str, rest: &[&str]) -> Resolved<'a> {
    let mut collected = Vec::new();
    for item in items {
        let Some(next) = item.get(key) else {
            continue;
        };
        match walk(next, rest) {
            Resolved::Absent => {}
            Resolved::Value(value) => flatten_into(&mut collected, value),
            Resolved::Flattened(values) => collected.extend(values),
        }
    }

    if collected.is_empty() {
        Resolved::Absent
    } else {
        Resolved::Flattened(collected)
    }
}

fn flatten_into<'a>(out: &mut Vec<Cow<'a, Value>>, value: Cow<'a, Value>) {
    match value {
        Cow::Borrowed(Value::Array(items)) => out.extend(items.iter().map(Cow::Borrowed)),
        Cow::Owned(Value::Array(items)) => out.extend(items.into_iter().map(Cow::Owned)),
        other => out.push(other),
    }
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Supplies the value at a path for field-map evaluation
///
/// Implementations must be pure: they may be called many times per
/// evaluation and from several threads at once.
///
/// Closures taking `(&Value, &str)` and returning an owned
/// [`Resolved<'static>`](Resolved) implement this trait.
pub trait Extractor: Send + Sync {
    /// Resolve `path` against `document`
    fn extract<'a>(&self, document: &'a Value, path: &str) -> Resolved<'a>;
}

impl<F> Extractor for F
where
    F: Fn(&Value, &str) -> Resolved<'static> + Send + Sync,
{
    fn extract<'a>(&self, document: &'a Value, path: &str) -> Resolved<'a> {
        self(document, path)
    }
}

/// Default extractor: [`resolve`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl Extractor for PathResolver {
    fn extract<'a>(&self, document: &'a Value, path: &str) -> Resolved<'a> {
        resolve(document, path)
    }
}

/// Lowercases the strings an inner extractor yields
///
/// Strings directly at the path, strings inside an array at the path and every
/// string in a flattened collection are folded. Other values pass through.
#[derive(Debug, Clone, Default)]
pub struct CaseFolding<E = PathResolver> {
    inner: E,
}

impl<E: Extractor> CaseFolding<E> {
    /// Wrap `inner`
    pub fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<E: Extractor> Extractor for CaseFolding<E> {
    fn extract<'a>(&self, document: &'a Value, path: &str) -> Resolved<'a> {
        match self.inner.extract(document, path) {
            Resolved::Absent => Resolved::Absent,
            Resolved::Value(value) => Resolved::Value(fold(value)),
            Resolved::Flattened(items) => {
                Resolved::Flattened(items.into_iter().map(fold).collect())
            }
        }
    }
}

fn fold(value: Cow<'_, Value>) -> Cow<'_, Value> {
    let folded = match value.as_ref() {
        Value::String(s) => Some(Value::String(s.to_lowercase())),
        Value::Array(items) if items.iter().any(|item| item.as_str().is_some()) => {
            Some(Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other.clone(),
                    })
                    .collect(),
            ))
        }
        _ => None,
    };
    match folded {
        Some(folded) => Cow::Owned(folded),
        None => value,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Value {
        Value::from(value)
    }

    fn values(resolved: &Resolved<'_>) -> Vec<Value> {
        match resolved {
            Resolved::Flattened(items) => items.iter().map(|v| v.as_ref().clone()).collect(),
            other => panic!("expected flattened, got {other:?}"),
        }
    }

    #[test]
    fn test_plain_and_nested_keys() {
        let d = doc(json!({ "a": { "b": { "c": 1 } }, "x": null }));
        assert_eq!(resolve(&d, "a.b.c").as_value(), Some(&Value::Number(1.0)));
        assert_eq!(resolve(&d, "x").as_value(), Some(&Value::Null));
        assert!(resolve(&d, "x.y").is_absent());
        assert!(resolve(&d, "a.missing").is_absent());
    }

    #[test]
    fn test_empty_path_is_document() {
        let d = doc(json!({ "a": 1 }));
        assert_eq!(resolve(&d, "").as_value(), Some(&d));
    }

    #[test]
    fn test_empty_segment_is_absent() {
        let d = doc(json!({ "a": { "b": 1 } }));
        assert!(resolve(&d, "a..b").is_absent());
        assert!(resolve(&d, "a.").is_absent());
    }

    #[test]
    fn test_index_versus_traverse() {
        let d = doc(json!({ "a": [{ "b": 1 }, { "b": 2 }] }));
        assert_eq!(resolve(&d, "a.0.b").as_value(), Some(&Value::Number(1.0)));

        let flattened = resolve(&d, "a.b");
        assert!(flattened.is_flattened());
        assert_eq!(values(&flattened), vec![Value::Number(1.0), Value::Number(2.0)]);
    }

    #[test]
    fn test_out_of_range_index() {
        let d = doc(json!({ "a": [1, 2] }));
        assert!(resolve(&d, "a.5").is_absent());
        assert_eq!(resolve(&d, "a.1").as_value(), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_traverse_concatenates_arrays() {
        let d = doc(json!({
            "employees": [
                { "skills": ["rust", "go"] },
                { "skills": ["python"] },
                { "name": "no skills" }
            ]
        }));
        let resolved = resolve(&d, "employees.skills");
        assert_eq!(
            values(&resolved),
            vec![Value::from("rust"), Value::from("go"), Value::from("python")]
        );
    }

    #[test]
    fn test_traverse_skips_non_objects() {
        let d = doc(json!({
            "items": ["plain", { "nested": { "value": 42 } }, { "nested": { "value": 100 } }]
        }));
        let resolved = resolve(&d, "items.nested.value");
        assert_eq!(values(&resolved), vec![Value::Number(42.0), Value::Number(100.0)]);
    }

    #[test]
    fn test_traverse_with_no_hits_is_absent() {
        let d = doc(json!({ "items": [{ "a": 1 }, 2] }));
        assert!(resolve(&d, "items.b").is_absent());
        assert!(resolve(&d, "items.a.b").is_absent());
    }

    #[test]
    fn test_nested_traversal() {
        let d = doc(json!({
            "departments": [
                { "teams": [{ "members": [{ "skills": ["React"] }, { "skills": ["Python"] }] }] },
                { "teams": [{ "members": [{ "skills": ["Go"] }] }] }
            ]
        }));
        let resolved = resolve(&d, "departments.teams.members.skills");
        assert_eq!(
            values(&resolved),
            vec![Value::from("React"), Value::from("Python"), Value::from("Go")]
        );

        let indexed = resolve(&d, "departments.0.teams.0.members.1.skills");
        assert_eq!(indexed.as_value(), Some(&Value::from(vec!["Python"])));
    }

    #[test]
    fn test_index_inside_traversal() {
        let d = doc(json!({
            "employees": [
                { "skills": [{ "name": "JavaScript" }, { "name": "Python" }] },
                { "skills": [{ "name": "Python" }, { "name": "Django" }] }
            ]
        }));
        let resolved = resolve(&d, "employees.skills.1.name");
        assert_eq!(values(&resolved), vec![Value::from("Python"), Value::from("Django")]);
    }

    #[test]
    fn test_numeric_object_keys() {
        let d = doc(json!({ "a": { "0": "zero" } }));
        assert_eq!(resolve(&d, "a.0").as_value(), Some(&Value::from("zero")));
    }

    #[test]
    fn test_to_value_and_into_owned() {
        let d = doc(json!({ "a": [{ "b": 1 }, { "b": 2 }] }));
        let resolved = resolve(&d, "a.b").into_owned();
        assert_eq!(resolved.to_value(), Some(Value::from(vec![1, 2])));
        assert_eq!(Resolved::Absent.to_value(), None);
    }

    #[test]
    fn test_closure_extractor() {
        let upper = |document: &Value, path: &str| -> Resolved<'static> {
            match resolve(document, path).to_value() {
                Some(Value::String(s)) => Resolved::owned(Value::String(s.to_uppercase())),
                Some(other) => Resolved::owned(other),
                None => Resolved::Absent,
            }
        };
        let d = doc(json!({ "name": "alice" }));
        assert_eq!(upper.extract(&d, "name").as_value(), Some(&Value::from("ALICE")));
    }

    #[test]
    fn test_case_folding() {
        let d = doc(json!({
            "name": "Tech Corp",
            "tags": ["Rust", 1],
            "people": [{ "city": "London" }, { "city": "Paris" }]
        }));
        let extractor = CaseFolding::<PathResolver>::default();
        assert_eq!(
            extractor.extract(&d, "name").as_value(),
            Some(&Value::from("tech corp"))
        );
        assert_eq!(
            extractor.extract(&d, "tags").as_value(),
            Some(&Value::Array(vec![Value::from("rust"), Value::Number(1.0)]))
        );
        assert_eq!(
            values(&extractor.extract(&d, "people.city")),
            vec![Value::from("london"), Value::from("paris")]
        );
    }
}
