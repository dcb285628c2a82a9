//! Path lookups into decoded JSON documents.
//!
//! ```
//! use courier_common::dig::{dig, dig_as, Segment};
//! use serde_json::json;
//!
//! let doc = json!({"files": {"file": [{"Filename": "main.go"}]}});
//! let name: Option<String> = dig_as(&doc, &["files".into(), "file".into(), Segment::Index(0), "Filename".into()]);
//! assert_eq!(name.as_deref(), Some("main.go"));
//! assert!(dig(&doc, &["files".into(), "missing".into()]).is_none());
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Walk `path` from `value`, returning the value found at the end.
pub fn dig<'a>(value: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, segment| match segment {
        Segment::Key(key) => current.as_object()?.get(key),
        Segment::Index(index) => current.as_array()?.get(*index),
    })
}

/// Walk `path` and deserialize the value found there.
///
/// Returns `None` when the path does not resolve or the value has the
/// wrong shape for `T`.
pub fn dig_as<T: DeserializeOwned>(value: &Value, path: &[Segment]) -> Option<T> {
    dig(value, path).and_then(|found| T::deserialize(found).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dig_nested_keys_and_indices() {
        let doc = json!({"get": {"term": ["some string", "other"]}});
        let path = [Segment::from("get"), Segment::from("term"), Segment::Index(1)];
        assert_eq!(dig(&doc, &path), Some(&json!("other")));
    }

    #[test]
    fn test_dig_empty_path_returns_root() {
        let doc = json!([1, 2]);
        assert_eq!(dig(&doc, &[]), Some(&doc));
    }

    #[test]
    fn test_dig_type_mismatch_is_none() {
        let doc = json!({"method": "GET"});
        assert!(dig(&doc, &["method".into(), Segment::Index(0)]).is_none());
        assert!(dig(&doc, &["method".into(), "x".into()]).is_none());
        assert_eq!(dig_as::<u32>(&doc, &["method".into()]), None);
    }

    #[test]
    fn test_dig_as_deserializes() {
        let doc = json!({"post": {"foo": ["bar"]}});
        let values: Option<Vec<String>> = dig_as(&doc, &["post".into(), "foo".into()]);
        assert_eq!(values, Some(vec!["bar".to_string()]));
    }
}
