//! Validation failures and crate errors
use thiserror::Error;

/// Coarse classification of a [`ValidationFailure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A required control has no value
    Required,
    /// A value lies outside its `min`/`max` bounds
    Bound,
    /// A value is too short or too long
    Length,
    /// A submitted value is not one of the available options
    UnknownOption,
    /// A map exceeds one of its entry/key/value limits
    MapBound,
    /// A temporal value does not conform to its profile
    Parse,
}

/// Temporal profiles understood by the on-demand parsers of [`crate::Input`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// Time of day (`15:04:05`)
    Time,
    /// Calendar date (`2006-01-02`)
    Date,
    /// Timezone aware datetime (RFC 3339)
    Datetime,
    /// Timezone naive datetime (`2006-01-02T15:04:05`)
    DatetimeLocal,
}

impl std::fmt::Display for Temporal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Temporal::Time => "time",
            Temporal::Date => "date",
            Temporal::Datetime => "datetime",
            Temporal::DatetimeLocal => "local datetime",
        };
        f.write_str(name)
    }
}

/// The outcome of a failed validation
///
/// The `Display` rendering is what ends up in a control's `error` field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    /// Required control is empty
    #[error("a value is required")]
    Required,

    /// Value is above `max`
    #[error("must not be greater than {max}")]
    Max {
        /// The violated upper bound
        max: String,
    },

    /// Value is below `min`
    #[error("must not be less than {min}")]
    Min {
        /// The violated lower bound
        min: String,
    },

    /// Value has more characters than `max_length`
    #[error("must be at most {max_length} char(s) long")]
    MaxLength {
        /// The violated length limit
        max_length: usize,
    },

    /// Value has fewer characters than `min_length`
    #[error("must be at least {min_length} char(s) long")]
    MinLength {
        /// The violated length limit
        min_length: usize,
    },

    /// A selected value is not an available option
    #[error("{value:?} is not an available option")]
    UnknownOption {
        /// The offending value
        value: String,
    },

    /// Map has too many entries
    #[error("contains more than {max_entries} entrie(s)")]
    MapMaxEntries {
        /// The violated limit
        max_entries: usize,
    },

    /// A map entry has too many values
    #[error("contains an entry with more than {max_values} value(s)")]
    MapMaxValues {
        /// The violated limit
        max_values: usize,
    },

    /// A map key is too long
    #[error("contains a key longer than {max_key_length} char(s)")]
    MapMaxKeyLength {
        /// The violated limit
        max_key_length: usize,
    },

    /// A map value is too long
    #[error("key {key:?} contains a value longer than {max_value_length} char(s)")]
    MapMaxValueLength {
        /// The entry holding the offending value
        key: String,
        /// The violated limit
        max_value_length: usize,
    },

    /// On-demand temporal parsing failed
    #[error("{value:?} is not a valid {temporal}")]
    Parse {
        /// The profile the value was parsed against
        temporal: Temporal,
        /// The offending value
        value: String,
    },
}

impl ValidationFailure {
    /// Returns the failure classification
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationFailure::Required => FailureKind::Required,
            ValidationFailure::Max { .. } | ValidationFailure::Min { .. } => FailureKind::Bound,
            ValidationFailure::MaxLength { .. } | ValidationFailure::MinLength { .. } => {
                FailureKind::Length
            }
            ValidationFailure::UnknownOption { .. } => FailureKind::UnknownOption,
            ValidationFailure::MapMaxEntries { .. }
            | ValidationFailure::MapMaxValues { .. }
            | ValidationFailure::MapMaxKeyLength { .. }
            | ValidationFailure::MapMaxValueLength { .. } => FailureKind::MapBound,
            ValidationFailure::Parse { .. } => FailureKind::Parse,
        }
    }
}

/// Non-validation errors: configuration and serialization faults
#[derive(Error, Debug)]
pub enum HmcError {
    /// Configuration parameter value is out of bounds.
    #[error("config parameter `{parameter}` value is out of bounds: {message}")]
    ConfigParameterValue {
        /// Offending parameter name
        parameter: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Wrapper for [`Figment::Error`](https://docs.rs/figment/latest/figment/struct.Error.html)
    #[error("config deserialization: {0:?}")]
    ConfigDeserialization(#[from] Box<figment::Error>),

    /// Wrapper for [`serde_json::Error`](https://docs.rs/serde_json/latest/serde_json/struct.Error.html)
    #[error("json serialization: {0:?}")]
    SerdeJson(#[from] serde_json::Error),

    /// Wrapper for [`quick_xml::Error`](https://docs.rs/quick-xml/latest/quick_xml/enum.Error.html)
    #[error("xml serialization: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Wrapper for [`std::io::Error`](https://doc.rust-lang.org/std/io/struct.Error.html)
    #[error("IO: {0:?}")]
    IO(#[from] std::io::Error),

    /// Rendered document is not valid UTF-8
    #[error("invalid UTF-8 output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<figment::Error> for HmcError {
    fn from(e: figment::Error) -> Self {
        Self::ConfigDeserialization(Box::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ValidationFailure::Required.kind(), FailureKind::Required);
        assert_eq!(
            ValidationFailure::Min { min: "3".into() }.kind(),
            FailureKind::Bound
        );
        assert_eq!(
            ValidationFailure::MinLength { min_length: 3 }.kind(),
            FailureKind::Length
        );
        assert_eq!(
            ValidationFailure::MapMaxValueLength {
                key: "k".into(),
                max_value_length: 1
            }
            .kind(),
            FailureKind::MapBound
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationFailure::MapMaxEntries { max_entries: 1 }.to_string(),
            "contains more than 1 entrie(s)"
        );
        assert_eq!(
            ValidationFailure::MapMaxValueLength {
                key: "bar".into(),
                max_value_length: 2
            }
            .to_string(),
            "key \"bar\" contains a value longer than 2 char(s)"
        );
        assert_eq!(
            ValidationFailure::Parse {
                temporal: Temporal::Date,
                value: "abc".into()
            }
            .to_string(),
            "\"abc\" is not a valid date"
        );
    }
}
