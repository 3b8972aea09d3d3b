//! Scalar control
use crate::{
    FormValues, HmcError, ValidationFailure,
    error::Temporal,
    values::Extract,
    xml::{ToXml, XmlWriter},
};
use serde::{Serialize, Serializer};
use std::{cmp::Ordering, io::Write};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};
use tracing::debug;

/// The `type` whose value is never rendered
pub const PASSWORD: &str = "password";

/// What a password value is rendered as
pub const PASSWORD_MASK: &str = "********";

const TIME_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]");
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DATETIME_LOCAL_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// A single named value the server needs from the client, with validation requirements
///
/// Analogous to HTML's `<input>` and `<textarea>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Input {
    /// Display text
    pub label: String,
    /// Free-form type tag (`text`, `password`, `number`, `date`, ...)
    ///
    /// Alters bound comparison and masking but is never checked against the value.
    pub kind: String,
    /// Form key the value is read from
    pub name: String,
    /// Rendered validation failure; empty when valid
    pub error: String,
    /// An empty value fails validation
    pub required: bool,
    /// Current value
    pub value: String,
    /// Minimum length in chars; zero means unbounded
    pub min_length: usize,
    /// Maximum length in chars; zero means unbounded
    pub max_length: usize,
    /// Granularity hint for numeric and temporal kinds; zero means unset
    pub step: f64,
    /// Lower bound; empty means unset
    pub min: String,
    /// Upper bound; empty means unset
    pub max: String,
}

impl Input {
    /// Creates an input reading from `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns true if bounds are compared as numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind.as_str(), "number" | "range")
    }

    /// Returns true if the value is masked on output
    pub fn is_password(&self) -> bool {
        self.kind == PASSWORD
    }

    /// The value as it appears in rendered output
    pub fn display_value(&self) -> &str {
        if self.is_password() && !self.value.is_empty() {
            PASSWORD_MASK
        } else {
            &self.value
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        if self.is_numeric() {
            if let (Ok(a), Ok(b)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
                if let Some(ord) = a.partial_cmp(&b) {
                    return ord;
                }
            }
        }
        a.cmp(b)
    }

    fn check(&self) -> Option<ValidationFailure> {
        if self.required && self.value.is_empty() {
            return Some(ValidationFailure::Required);
        }
        if !self.value.is_empty() {
            if !self.max.is_empty() && self.compare(&self.value, &self.max) == Ordering::Greater {
                return Some(ValidationFailure::Max {
                    max: self.max.clone(),
                });
            }
            if !self.min.is_empty() && self.compare(&self.value, &self.min) == Ordering::Less {
                return Some(ValidationFailure::Min {
                    min: self.min.clone(),
                });
            }
        }
        let len = self.value.chars().count();
        if self.max_length > 0 && len > self.max_length {
            return Some(ValidationFailure::MaxLength {
                max_length: self.max_length,
            });
        }
        if self.min_length > 0 && len < self.min_length {
            return Some(ValidationFailure::MinLength {
                min_length: self.min_length,
            });
        }
        None
    }

    /// Checks the value against the input's settings
    ///
    /// Required, max, min, max length and min length are checked in that order and the
    /// first failure is returned. The outcome is always recorded: `error` is set to the
    /// failure message, or cleared when the value is valid.
    ///
    /// Bespoke rules can be layered on top by inspecting `value` and setting `error`
    /// afterwards.
    pub fn validate(&mut self) -> Option<ValidationFailure> {
        let failure = self.check();
        match &failure {
            Some(f) => {
                debug!("Input {:?} failed validation: {f}", self.name);
                self.error = f.to_string();
            }
            None => self.error.clear(),
        }
        failure
    }

    fn parse_with<T, F>(&mut self, temporal: Temporal, parse: F) -> Result<Option<T>, ValidationFailure>
    where
        F: FnOnce(&str) -> Result<T, time::error::Parse>,
    {
        if self.value.is_empty() {
            return Ok(None);
        }
        match parse(&self.value) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                debug!("Input {:?}: unable to parse {temporal}: {e}", self.name);
                let failure = ValidationFailure::Parse {
                    temporal,
                    value: self.value.clone(),
                };
                self.error = failure.to_string();
                Err(failure)
            }
        }
    }

    /// Parses the value as a time of day (`15:04:05[.999999999]`)
    ///
    /// Returns `Ok(None)` for an empty value. A failure is also written to `error`.
    pub fn parse_time(&mut self) -> Result<Option<Time>, ValidationFailure> {
        self.parse_with(Temporal::Time, |v| Time::parse(v, TIME_FORMAT))
    }

    /// Parses the value as a calendar date (`2006-01-02`)
    pub fn parse_date(&mut self) -> Result<Option<Date>, ValidationFailure> {
        self.parse_with(Temporal::Date, |v| Date::parse(v, DATE_FORMAT))
    }

    /// Parses the value as an RFC 3339 datetime
    pub fn parse_datetime(&mut self) -> Result<Option<OffsetDateTime>, ValidationFailure> {
        self.parse_with(Temporal::Datetime, |v| OffsetDateTime::parse(v, &Rfc3339))
    }

    /// Parses the value as a datetime without timezone (`2006-01-02T15:04:05[.999999999]`)
    pub fn parse_datetime_local(&mut self) -> Result<Option<PrimitiveDateTime>, ValidationFailure> {
        self.parse_with(Temporal::DatetimeLocal, |v| {
            PrimitiveDateTime::parse(v, DATETIME_LOCAL_FORMAT)
        })
    }
}

impl Extract for Input {
    /// Sets `value` to the first value found under `name`
    ///
    /// Further values under the same key are left for the next input of that name.
    fn extract(&mut self, source: &mut FormValues) -> Vec<String> {
        match source.take_first(&self.name) {
            Some(value) => {
                debug!("Input {:?} extracted", self.name);
                self.value = value;
                vec![self.name.clone()]
            }
            None => Vec::new(),
        }
    }
}

#[derive(Serialize)]
struct InputJson<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    label: &'a str,
    #[serde(rename = "type", skip_serializing_if = "str::is_empty")]
    kind: &'a str,
    name: &'a str,
    value: &'a str,
    error: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(rename = "minlength", skip_serializing_if = "is_zero")]
    min_length: usize,
    #[serde(rename = "maxlength", skip_serializing_if = "is_zero")]
    max_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
    #[serde(skip_serializing_if = "str::is_empty")]
    min: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    max: &'a str,
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

impl Serialize for Input {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        InputJson {
            label: &self.label,
            kind: &self.kind,
            name: &self.name,
            value: self.display_value(),
            error: &self.error,
            required: self.required,
            min_length: self.min_length,
            max_length: self.max_length,
            step: (self.step > 0.0).then_some(self.step),
            min: &self.min,
            max: &self.max,
        }
        .serialize(serializer)
    }
}

impl ToXml for Input {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let mut element = w.control("Input")
            .attr("label", &self.label)
            .attr("name", &self.name)
            .attr_opt("type", &self.kind)
            .attr("value", self.display_value())
            .attr_nonzero("minlength", self.min_length)
            .attr_nonzero("maxlength", self.max_length);
        if self.step > 0.0 {
            element = element.attr("step", &self.step.to_string());
        }
        let element = element
            .attr_opt("min", &self.min)
            .attr_opt("max", &self.max)
            .attr_opt("required", if self.required { "true" } else { "" });
        if self.error.is_empty() {
            return w.empty(element);
        }
        w.element(element, |w| w.error(&self.error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;

    fn numeric(value: &str) -> Input {
        Input {
            kind: "number".to_string(),
            value: value.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_compare() {
        let mut input = numeric("123");
        input.min = "1000".to_string();
        assert_eq!(
            input.validate(),
            Some(ValidationFailure::Min {
                min: "1000".to_string()
            })
        );

        let mut input = numeric("1000");
        input.max = "123".to_string();
        assert!(matches!(input.validate(), Some(ValidationFailure::Max { .. })));

        let mut input = numeric("2.5");
        input.min = "2.25".to_string();
        input.max = "10".to_string();
        assert_eq!(input.validate(), None);
    }

    #[test]
    fn test_lexicographic_compare() {
        let mut input = Input::new("x");
        input.value = "123".to_string();
        input.min = "1000".to_string();
        assert_eq!(input.validate(), None);
    }

    #[test]
    fn test_unparsable_numeric_falls_back() {
        let mut input = numeric("abc");
        input.min = "abd".to_string();
        assert!(matches!(input.validate(), Some(ValidationFailure::Min { .. })));
    }

    #[test]
    fn test_first_failure_wins() {
        let mut input = numeric("12345");
        input.max = "100".to_string();
        input.max_length = 3;
        assert!(matches!(input.validate(), Some(ValidationFailure::Max { .. })));
    }

    #[test]
    fn test_length_counts_chars() {
        let mut input = Input::new("x");
        input.value = "ééé".to_string();
        input.max_length = 3;
        assert_eq!(input.validate(), None);
        input.value.push('é');
        assert_eq!(
            input.validate(),
            Some(ValidationFailure::MaxLength { max_length: 3 })
        );
    }

    #[test]
    fn test_password_xml() {
        let input = Input {
            label: "Password".to_string(),
            kind: PASSWORD.to_string(),
            name: "password".to_string(),
            value: "secret".to_string(),
            required: true,
            ..Default::default()
        };
        assert_eq!(
            to_xml_string(&input).unwrap(),
            r#"<c:Input label="Password" name="password" type="password" value="********" required="true"/>"#
        );
    }

    #[test]
    fn test_xml_with_error() {
        let input = Input {
            label: "Message".to_string(),
            kind: "text".to_string(),
            name: "msg".to_string(),
            required: true,
            value: "Hey...".to_string(),
            min_length: 3,
            step: 0.5,
            error: "This is a bad message".to_string(),
            ..Default::default()
        };
        assert_eq!(
            to_xml_string(&input).unwrap(),
            "<c:Input label=\"Message\" name=\"msg\" type=\"text\" value=\"Hey...\" minlength=\"3\" \
             step=\"0.5\" required=\"true\"><c:Error>This is a bad message</c:Error></c:Input>"
        );
    }

    #[test]
    fn test_time_formats() {
        let mut input = Input::new("t");
        input.value = "13:45:10.25".to_string();
        let t = input.parse_time().unwrap().unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (13, 45, 10));
        assert_eq!(t.millisecond(), 250);

        input.value = "2024-02-29T08:00:00".to_string();
        let dt = input.parse_datetime_local().unwrap().unwrap();
        assert_eq!(dt.date(), time::macros::date!(2024-02-29));

        input.value = "2024-02-29T08:00:00+02:00".to_string();
        let dt = input.parse_datetime().unwrap().unwrap();
        assert_eq!(dt.offset().whole_hours(), 2);
        assert!(input.error.is_empty());
    }
}
