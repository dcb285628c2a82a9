//! Request parameters shared by query strings and form bodies.

use std::collections::btree_map::{self, BTreeMap};

use url::form_urlencoded;

/// Ordered mapping from keys to one or more values.
///
/// Keys are kept sorted so [`Values::encode`] is deterministic; the values
/// under a key keep their insertion order. A key is never present with an
/// empty value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values {
    inner: BTreeMap<String, Vec<String>>,
}

impl Values {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `key`, keeping any existing values
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.entry(key.into()).or_default().push(value.into());
        self
    }

    /// Replace all values under `key` with `value`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.inner.insert(key.into(), vec![value.into()]);
        self
    }

    /// First value under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values under `key`, empty if the key is absent
    pub fn get_all(&self, key: &str) -> &[String] {
        self.inner.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove `key`, returning its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate keys in sorted order with their values
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.inner.iter()
    }

    /// Iterate every `(key, value)` pair in encoding order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
    }

    /// Encode as `application/x-www-form-urlencoded` text.
    ///
    /// Spaces become `+`, so `{"term": ["some string"]}` encodes to
    /// `term=some+string`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.pairs() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// Parse urlencoded text, as found in a query string or form body.
    ///
    /// A leading `?` is ignored. Parsing is lenient: malformed escapes are
    /// kept as literal text.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        form_urlencoded::parse(input.as_bytes()).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (key, value) in iter {
            values.add(key, value);
        }
        values
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Values {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
