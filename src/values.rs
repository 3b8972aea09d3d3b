//! The flat multi-valued key/value source controls are extracted from
use std::collections::BTreeMap;
use tracing::trace;

/// Decoded form data: every key maps to one or more values in submission order
///
/// Extraction is destructive: each control removes what it consumes, so whatever is left
/// after a decoding pass is exactly the unmatched input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, Vec<String>>,
}

impl FormValues {
    /// Creates an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` string
    pub fn parse(input: &str) -> Self {
        Self::parse_bytes(input.as_bytes())
    }

    /// Decodes an `application/x-www-form-urlencoded` byte sequence
    ///
    /// Repeated keys accumulate their values in order of appearance.
    pub fn parse_bytes(input: &[u8]) -> Self {
        let ret: Self = url::form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        trace!("Decoded {} form key(s)", ret.len());
        ret
    }

    /// Appends a value under `key`
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value under `key`
    ///
    /// An empty `values` removes the key, so no key ever maps to an empty list.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        if values.is_empty() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, values);
        }
    }

    /// Returns the first value under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Returns every value under `key`
    pub fn get_all(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Removes `key`, returning its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.values.remove(key)
    }

    /// Takes the first value under `key`
    ///
    /// Remaining values stay in place for the next same-named control; the key is removed
    /// once it has no values left.
    pub fn take_first(&mut self, key: &str) -> Option<String> {
        let values = self.values.get_mut(key)?;
        if values.len() > 1 {
            return Some(values.remove(0));
        }
        self.values.remove(key).and_then(|v| v.into_iter().next())
    }

    /// Returns true if `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no keys are left
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the keys, in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over the entries, in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Removes and returns every entry whose key satisfies `pred`
    pub(crate) fn drain_matching<F>(&mut self, mut pred: F) -> Vec<(String, Vec<String>)>
    where
        F: FnMut(&str) -> bool,
    {
        let keys: Vec<String> = self.values.keys().filter(|k| pred(k.as_str())).cloned().collect();
        keys.into_iter()
            .filter_map(|k| self.values.remove_entry(&k))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut ret = Self::new();
        ret.extend(iter);
        ret
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormValues {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.append(k, v);
        }
    }
}

/// Populating a control from a [`FormValues`] source
///
/// Implementations remove whatever they consume from `source` and leave everything else
/// untouched. Controls sharing one source must be extracted one after another; a catch-all
/// [`crate::Map`] goes last.
pub trait Extract {
    /// Extracts the control's value(s), returning the keys that were consumed
    ///
    /// A key that still holds values after a partial consumption is reported too.
    fn extract(&mut self, source: &mut FormValues) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let values = FormValues::parse("a=1&b=hello+world&a=2&c=%26%3D&d");
        assert_eq!(values.len(), 4);
        assert_eq!(values.get_all("a").unwrap(), &["1", "2"]);
        assert_eq!(values.get("b"), Some("hello world"));
        assert_eq!(values.get("c"), Some("&="));
        assert_eq!(values.get("d"), Some(""));
        assert!(FormValues::parse("").is_empty());
    }

    #[test]
    fn test_take_first() {
        let mut values: FormValues = [("name", "a"), ("name", "b")].into_iter().collect();
        assert_eq!(values.take_first("name").as_deref(), Some("a"));
        assert_eq!(values.get_all("name").unwrap(), &["b"]);
        assert_eq!(values.take_first("name").as_deref(), Some("b"));
        assert!(!values.contains_key("name"));
        assert_eq!(values.take_first("name"), None);
    }

    #[test]
    fn test_insert_empty() {
        let mut values = FormValues::new();
        values.insert("x", vec!["1".to_string()]);
        assert!(values.contains_key("x"));
        values.insert("x", Vec::new());
        assert!(values.is_empty());
    }

    #[test]
    fn test_drain_matching() {
        let mut values: FormValues = [("foo[a]", "1"), ("bar", "2"), ("foo[b]", "3")]
            .into_iter()
            .collect();
        let drained = values.drain_matching(|k| k.starts_with("foo["));
        assert_eq!(drained.len(), 2);
        assert_eq!(values.keys().collect::<Vec<_>>(), vec!["bar"]);
    }
}
