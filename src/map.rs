//! Open map control
use crate::{
    FormValues, HmcError, ValidationFailure,
    values::Extract,
    xml::{ToXml, XmlWriter},
};
use serde::{Serialize, Serializer};
use std::{
    collections::{BTreeMap, HashMap},
    io::Write,
};
use tracing::debug;

/// An arbitrary set of multi-valued entries
///
/// With `name == "foo"` a submission like `foo[x]=y&foo[a]=b&foo[a]=c` populates `entries`
/// with `x: [y]` and `a: [b, c]`.
///
/// With an empty `name` the map is a catch-all which takes every key left in the source.
/// Extract specific controls first so they are not swallowed by it.
///
/// Entries are always rendered in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Map {
    /// Display text
    pub label: String,
    /// Key prefix; empty for a catch-all
    pub name: String,
    /// Rendered validation failure; empty when valid
    pub error: String,
    /// Maximum number of entries; zero means unbounded
    pub max_entries: usize,
    /// Maximum length of any key, in chars; zero means unbounded
    pub max_key_length: usize,
    /// Maximum number of values per entry; zero means unbounded
    pub max_values: usize,
    /// Maximum length of any value, in chars; zero means unbounded
    pub max_value_length: usize,
    /// Sub-key to values
    pub entries: HashMap<String, Vec<String>>,
}

impl Map {
    /// Creates a map reading `name[...]` keys
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a catch-all map
    pub fn bucket() -> Self {
        Self::default()
    }

    /// Returns `key` as a form name: `foo[key]` for a map named `foo`, `key` for a catch-all
    pub fn named_key(&self, key: &str) -> String {
        if self.name.is_empty() {
            key.to_string()
        } else {
            format!("{}[{key}]", self.name)
        }
    }

    /// Returns the sub-key of `form_key`, if this map claims it
    pub fn match_key<'a>(&self, form_key: &'a str) -> Option<&'a str> {
        if self.name.is_empty() {
            return Some(form_key);
        }
        form_key
            .strip_prefix(self.name.as_str())?
            .strip_prefix('[')?
            .strip_suffix(']')
    }

    /// Entries in sorted key order
    pub fn sorted_entries(&self) -> BTreeMap<&str, &[String]> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect()
    }

    /// Checks the entries against the configured limits
    ///
    /// Entries are scanned in key order; for each one the key length, the number of values
    /// and each value's length are checked, then the overall entry count. Unlike
    /// [`crate::Input::validate`] the scan always runs to the end and the last violation
    /// found is the one returned. `error` is set to its message, or cleared if none is found.
    pub fn validate(&mut self) -> Option<ValidationFailure> {
        let mut failure = None;
        for (key, values) in self.sorted_entries() {
            if self.max_key_length > 0 && key.chars().count() > self.max_key_length {
                failure = Some(ValidationFailure::MapMaxKeyLength {
                    max_key_length: self.max_key_length,
                });
            }
            if self.max_values > 0 && values.len() > self.max_values {
                failure = Some(ValidationFailure::MapMaxValues {
                    max_values: self.max_values,
                });
            }
            if self.max_value_length > 0 {
                for value in values {
                    if value.chars().count() > self.max_value_length {
                        failure = Some(ValidationFailure::MapMaxValueLength {
                            key: key.to_string(),
                            max_value_length: self.max_value_length,
                        });
                    }
                }
            }
        }
        if self.max_entries > 0 && self.entries.len() > self.max_entries {
            failure = Some(ValidationFailure::MapMaxEntries {
                max_entries: self.max_entries,
            });
        }
        match &failure {
            Some(f) => {
                debug!("Map {:?} failed validation: {f}", self.name);
                self.error = f.to_string();
            }
            None => self.error.clear(),
        }
        failure
    }
}

impl Extract for Map {
    /// Moves every matching key out of `source` into `entries`
    ///
    /// A named map claims keys of the exact form `name[subkey]`; a catch-all claims all of
    /// them. An existing entry with the same sub-key is replaced.
    fn extract(&mut self, source: &mut FormValues) -> Vec<String> {
        let drained = source.drain_matching(|k| self.match_key(k).is_some());
        let mut consumed = Vec::with_capacity(drained.len());
        for (form_key, values) in drained {
            if let Some(key) = self.match_key(&form_key) {
                self.entries.insert(key.to_string(), values);
            }
            consumed.push(form_key);
        }
        if !consumed.is_empty() {
            debug!("Map {:?} extracted {} key(s)", self.name, consumed.len());
        }
        consumed
    }
}

/// Limits are not part of the JSON shape; they are rendered as XML attributes only
#[derive(Serialize)]
struct MapJson<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    label: &'a str,
    name: &'a str,
    error: &'a str,
    entries: BTreeMap<&'a str, &'a [String]>,
}

impl Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        MapJson {
            label: &self.label,
            name: &self.name,
            error: &self.error,
            entries: self.sorted_entries(),
        }
        .serialize(serializer)
    }
}

impl ToXml for Map {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let element = w.control("Map")
            .attr("label", &self.label)
            .attr("name", &self.name)
            .attr_nonzero("maxentries", self.max_entries)
            .attr_nonzero("maxkeylength", self.max_key_length)
            .attr_nonzero("maxvalues", self.max_values)
            .attr_nonzero("maxvaluelength", self.max_value_length);
        w.element(element, |w| {
            w.error(&self.error)?;
            for (key, values) in self.sorted_entries() {
                let name = self.named_key(key);
                for value in values {
                    let input = w.control("Input").attr("name", &name).attr("value", value);
                    w.empty(input)?;
                }
            }
            Ok(())
        })
    }
}
