use crate::value::{Document, Value};

/// Trait for resolving dotted field paths
///
/// This is the only capability the executor needs from the documents it
/// evaluates, so any document representation can be plugged in.
pub trait FieldLookup {
    /// Resolve `path`, returning Missing for absent fields
    fn lookup(&self, path: &[String]) -> Value;
}

impl FieldLookup for Document {
    fn lookup(&self, path: &[String]) -> Value {
        match path.split_first() {
            None => Value::Document(self.clone()),
            Some((first, rest)) => match self.get(first) {
                Some(value) => value.lookup(rest),
                None => Value::Missing,
            },
        }
    }
}

impl FieldLookup for Value {
    /// Traverses documents by key. Arrays are traversed element-wise: the
    /// result is an array of whatever each element resolves to, with
    /// Missing results left out.
    fn lookup(&self, path: &[String]) -> Value {
        if path.is_empty() {
            return self.clone();
        }

        match self {
            Value::Document(doc) => doc.lookup(path),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|item| matches!(item, Value::Document(_) | Value::Array(_)))
                    .map(|item| item.lookup(path))
                    .filter(|value| !value.is_missing())
                    .collect(),
            ),
            _ => Value::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(p: &str) -> Vec<String> {
        p.split('.').map(str::to_string).collect()
    }

    fn doc(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_lookup_top_level() {
        let value = doc(json!({"a": 1}));
        assert_eq!(value.lookup(&path("a")), Value::Int(1));
    }

    #[test]
    fn test_lookup_nested() {
        let value = doc(json!({"user": {"profile": {"name": "Alice"}}}));
        assert_eq!(
            value.lookup(&path("user.profile.name")),
            Value::String("Alice".into())
        );
    }

    #[test]
    fn test_lookup_missing_intermediate() {
        let value = doc(json!({"user": {"name": "Alice"}}));
        assert_eq!(value.lookup(&path("user.missing.deep")), Value::Missing);
        assert_eq!(value.lookup(&path("nope")), Value::Missing);
    }

    #[test]
    fn test_lookup_through_scalar() {
        let value = doc(json!({"count": 42}));
        assert_eq!(value.lookup(&path("count.something")), Value::Missing);
    }

    #[test]
    fn test_lookup_explicit_null_is_not_missing() {
        let value = doc(json!({"a": null}));
        assert_eq!(value.lookup(&path("a")), Value::Null);
    }

    #[test]
    fn test_lookup_through_array_of_documents() {
        let value = doc(json!({"items": [{"n": 1}, {"x": 0}, {"n": 2}, 7]}));
        assert_eq!(value.lookup(&path("items.n")), doc(json!([1, 2])));
    }

    #[test]
    fn test_lookup_whole_document() {
        let value = doc(json!({"a": {"b": 1}}));
        assert_eq!(value.lookup(&[]), value);
        if let Value::Document(d) = &value {
            assert_eq!(d.lookup(&[]), value);
        }
    }
}
