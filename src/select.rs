//! Option set control
use crate::{
    FormValues, HmcError, ValidationFailure,
    values::Extract,
    xml::{ToXml, XmlWriter},
};
use serde::{Serialize, Serializer};
use std::io::Write;
use tracing::{debug, trace};

/// One choice of a [`Select`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOption {
    /// Display text; the value is shown when empty
    pub label: String,
    /// Wire value
    pub value: String,
    /// Currently chosen
    pub selected: bool,
    /// Can not be chosen through [`Select::set_values`]
    pub disabled: bool,
    /// Inserted by [`Select::set_values`] for a value no option matched
    ///
    /// Such options are dropped again by the next [`Select::set_values`]. Never serialized.
    pub unknown: bool,
}

impl SelectOption {
    /// Creates an option whose label is its value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Creates an option with a display label
    pub fn labelled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Display text
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.value
        } else {
            &self.label
        }
    }

    /// Returns true if the option counts towards the select's values
    pub fn is_live(&self) -> bool {
        self.selected && !self.disabled
    }
}

/// A control whose value(s) must be chosen from an enumerated list
///
/// Analogous to HTML's `<select>`. Option order is significant: lookups stop at the first
/// match, and submitted values which are not listed are prepended as selected, disabled
/// options so they can be shown back to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    /// Display text
    pub label: String,
    /// Form key the selection is read from
    pub name: String,
    /// Rendered validation failure; empty when valid
    pub error: String,
    /// A missing selection fails validation
    pub required: bool,
    /// More than one option may be selected
    pub multiple: bool,
    /// The choices, in display order
    pub options: Vec<SelectOption>,
}

impl Select {
    /// Creates a select reading from `name`
    pub fn new(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            name: name.into(),
            options,
            ..Default::default()
        }
    }

    /// Replaces the selection with `values`
    ///
    /// Every option is deselected and options left over from earlier unknown values are
    /// removed first; each value then selects the first enabled option with an identical
    /// value. A value matching no such option is inserted at the front as a selected,
    /// disabled option marked `unknown`, and an [`ValidationFailure::UnknownOption`] is
    /// returned for the last such value. Unless `multiple` is set only the first value is
    /// applied.
    pub fn set_values<I, S>(&mut self, values: I) -> Option<ValidationFailure>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.retain(|o| !o.unknown);
        for option in self.options.iter_mut() {
            option.selected = false;
        }
        let take = if self.multiple { usize::MAX } else { 1 };
        let mut failure = None;
        for value in values.into_iter().take(take) {
            let value: String = value.into();
            let found = self
                .options
                .iter_mut()
                .find(|o| o.value == value && !o.disabled);
            match found {
                Some(option) => option.selected = true,
                None => {
                    if self.options.iter().any(|o| o.unknown && o.value == value) {
                        // Already inserted for an earlier duplicate
                        continue;
                    }
                    debug!("Select {:?}: {value:?} is not an option", self.name);
                    failure = Some(ValidationFailure::UnknownOption {
                        value: value.clone(),
                    });
                    self.options.insert(
                        0,
                        SelectOption {
                            label: String::new(),
                            value,
                            selected: true,
                            disabled: true,
                            unknown: true,
                        },
                    );
                }
            }
        }
        failure
    }

    /// Selected values of enabled options, in option order
    ///
    /// Yields at most one value unless `multiple` is set.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let take = if self.multiple { usize::MAX } else { 1 };
        self.options
            .iter()
            .filter(|o| o.is_live())
            .map(|o| o.value.as_str())
            .take(take)
    }

    /// The first selected value, or `""`
    pub fn value(&self) -> &str {
        self.values().next().unwrap_or_default()
    }

    fn check(&self) -> Option<ValidationFailure> {
        if let Some(unknown) = self.options.iter().find(|o| o.unknown && o.selected) {
            return Some(ValidationFailure::UnknownOption {
                value: unknown.value.clone(),
            });
        }
        if self.required && self.values().next().is_none() {
            return Some(ValidationFailure::Required);
        }
        None
    }

    /// Checks the selection
    ///
    /// A selected option inserted for an unknown submitted value is reported first; then a
    /// required select with nothing selected. Options built selected and disabled, such as
    /// a "Choose one" placeholder, are not unknown: they only fail the required check. `error` is set to the
    /// failure message, or cleared when the selection is valid.
    pub fn validate(&mut self) -> Option<ValidationFailure> {
        let failure = self.check();
        match &failure {
            Some(f) => {
                debug!("Select {:?} failed validation: {f}", self.name);
                self.error = f.to_string();
            }
            None => self.error.clear(),
        }
        failure
    }
}

impl Extract for Select {
    /// Applies the values found under `name` through [`Select::set_values`]
    ///
    /// All of them are consumed when `multiple` is set; otherwise only the first is, and the
    /// rest stay in `source`. Unknown values become options (see [`Select::validate`]).
    fn extract(&mut self, source: &mut FormValues) -> Vec<String> {
        let values = if self.multiple {
            source.remove(&self.name)
        } else {
            source.take_first(&self.name).map(|v| vec![v])
        };
        let Some(values) = values else {
            return Vec::new();
        };
        trace!("Select {:?} extracting {} value(s)", self.name, values.len());
        self.set_values(values);
        vec![self.name.clone()]
    }
}

#[derive(Serialize)]
struct OptionJson<'a> {
    value: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    label: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    selected: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    disabled: bool,
}

impl Serialize for SelectOption {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        OptionJson {
            value: &self.value,
            label: &self.label,
            selected: self.selected,
            disabled: self.disabled,
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
struct SelectJson<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    label: &'a str,
    name: &'a str,
    error: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    multiple: bool,
    options: &'a [SelectOption],
}

impl Serialize for Select {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SelectJson {
            label: &self.label,
            name: &self.name,
            error: &self.error,
            required: self.required,
            multiple: self.multiple,
            options: &self.options,
        }
        .serialize(serializer)
    }
}

impl ToXml for SelectOption {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let mut element = w.control("Option")
            .flag("selected", self.selected)
            .flag("disabled", self.disabled);
        // The value only needs spelling out when the text shows something else
        if !self.label.is_empty() {
            element = element.attr("value", &self.value);
        }
        w.text_element(element, self.display_label())
    }
}

impl ToXml for Select {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let element = w.control("Select")
            .flag("multiple", self.multiple)
            .attr("label", &self.label)
            .attr("name", &self.name)
            .attr_opt("required", if self.required { "true" } else { "" });
        w.element(element, |w| {
            w.error(&self.error)?;
            w.write(&self.options)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;

    fn options() -> Vec<SelectOption> {
        vec![
            SelectOption::new("one"),
            SelectOption::new("two"),
            SelectOption::new("three"),
            SelectOption {
                value: "four".to_string(),
                disabled: true,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_disabled_never_selected_by_value() {
        let mut select = Select::new("x", options());
        select.multiple = true;
        let failure = select.set_values(["four"]);
        assert!(matches!(failure, Some(ValidationFailure::UnknownOption { .. })));
        assert_eq!(select.options.len(), 5);
        assert!(!select.options[4].selected);
        assert_eq!(select.values().count(), 0);
    }

    #[test]
    fn test_first_match_wins() {
        let mut select = Select::new(
            "x",
            vec![SelectOption::labelled("A", "a"), SelectOption::labelled("B", "a")],
        );
        assert_eq!(select.set_values(["a"]), None);
        assert!(select.options[0].selected);
        assert!(!select.options[1].selected);
    }

    #[test]
    fn test_single_applies_first_value_only() {
        let mut select = Select::new("x", options());
        assert_eq!(select.set_values(["two", "three"]), None);
        assert_eq!(select.values().collect::<Vec<_>>(), vec!["two"]);
        assert_eq!(select.options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn test_duplicate_unknown_inserted_once() {
        let mut select = Select::new("x", options());
        select.multiple = true;
        select.set_values(["zzz", "zzz"]);
        assert_eq!(select.options.len(), 5);
        assert_eq!(select.options[0].value, "zzz");
    }

    #[test]
    fn test_unknown_replaced_on_reselect() {
        let mut select = Select::new("x", options());
        select.set_values(["zzz"]);
        assert!(select.options[0].unknown);
        assert_eq!(select.set_values(["one"]), None);
        assert_eq!(select.options.len(), 4);
        assert!(select.options.iter().all(|o| !o.unknown));
        select.set_values(["zzz"]);
        select.set_values(["zzz"]);
        assert_eq!(select.options.iter().filter(|o| o.value == "zzz").count(), 1);
        assert!(select.options[0].selected);
    }

    #[test]
    fn test_reselect_clears() {
        let mut select = Select::new("x", options());
        select.set_values(["one"]);
        select.set_values(["two"]);
        assert_eq!(select.value(), "two");
        assert!(!select.options[0].selected);
        select.set_values(Vec::<String>::new());
        assert_eq!(select.value(), "");
    }

    #[test]
    fn test_xml() {
        let mut select = Select::new(
            "mugs",
            vec![
                SelectOption::labelled("Large", "lg"),
                SelectOption::labelled("Medium", "md"),
            ],
        );
        select.label = "Mug size".to_string();
        select.required = true;
        select.set_values(["Wumbo"]);
        assert_eq!(
            to_xml_string(&select).unwrap(),
            "<c:Select label=\"Mug size\" name=\"mugs\" required=\"true\">\
             <c:Option selected=\"\" disabled=\"\">Wumbo</c:Option>\
             <c:Option value=\"lg\">Large</c:Option>\
             <c:Option value=\"md\">Medium</c:Option>\
             </c:Select>"
        );
        select.validate();
        let out = to_xml_string(&select).unwrap();
        assert!(out.contains("is not an available option</c:Error><c:Option selected"));
    }

    #[test]
    fn test_json() {
        let mut select = Select::new("fav", options());
        select.multiple = true;
        select.set_values(["one", "three"]);
        let json = serde_json::to_value(&select).unwrap();
        assert_eq!(json["name"], "fav");
        assert_eq!(json["multiple"], true);
        assert_eq!(json["error"], "");
        assert!(json.get("label").is_none());
        assert!(json.get("required").is_none());
        let options = json["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        assert_eq!(options[0], serde_json::json!({"value": "one", "selected": true}));
        assert_eq!(options[1], serde_json::json!({"value": "two"}));
        assert_eq!(options[3], serde_json::json!({"value": "four", "disabled": true}));
    }
}
