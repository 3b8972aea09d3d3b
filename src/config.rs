//! Facilities for reading runtime configuration values
use crate::{
    HmcError,
    xml::{DEFAULT_PREFIX, Namespace},
};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::trace;

/// Rendering configuration
///
/// Built once by the owning application and handed to the serializers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URI bound to the `c` prefix of the XML dialect
    pub namespace_uri: String,

    /// Prefix control elements are qualified with and bound to `namespace_uri`
    pub namespace_prefix: String,

    /// Where the XML dialect is documented; rendered as a comment on document roots
    pub docs_url: String,

    /// Spaces per XML nesting level; zero renders compact documents
    pub xml_indent: usize,

    /// Whether JSON output is indented
    pub json_pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace_uri: "https://github.com/Teajey/hmc".to_string(),
            namespace_prefix: DEFAULT_PREFIX.to_string(),
            docs_url: "https://github.com/Teajey/hmc/blob/main/README.md".to_string(),
            xml_indent: 0,
            json_pretty: false,
        }
    }
}

impl Config {
    /// Constructs `Config` from a `toml` file and environment variables
    pub fn new() -> Result<Self, HmcError> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file("hmc.toml"))
                .merge(Env::prefixed("HMC__").split("__")),
        )
    }

    /// Extracts and checks `Config` from an arbitrary figment
    pub fn from_figment(figment: Figment) -> Result<Self, HmcError> {
        let config: Self = figment.extract()?;

        macro_rules! disallow_empty {
            ($parent:ident.$var:ident) => {
                if $parent.$var.trim().is_empty() {
                    Err(HmcError::ConfigParameterValue {
                        parameter: stringify!($var),
                        message: "parameter value should not be empty".to_string(),
                    })?
                }
            };
        }
        disallow_empty!(config.namespace_uri);
        disallow_empty!(config.namespace_prefix);

        if !config
            .namespace_prefix
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
            || config.namespace_prefix.starts_with(|c: char| !c.is_alphabetic() && c != '_')
        {
            Err(HmcError::ConfigParameterValue {
                parameter: "namespace_prefix",
                message: "parameter value should be a valid XML name without a colon".to_string(),
            })?
        }

        macro_rules! disallow_value_above {
            ($parent:ident.$var:ident, $limit:expr) => {
                if $parent.$var > $limit as _ {
                    Err(HmcError::ConfigParameterValue {
                        parameter: stringify!($var),
                        message: format!("parameter value should be equal or less than {}", $limit),
                    })?
                }
            };
        }
        disallow_value_above!(config.xml_indent, 8);

        trace!("final config: {config:#?}");

        Ok(config)
    }

    /// The namespace declared on XML document roots
    pub fn namespace(&self) -> Namespace {
        Namespace {
            prefix: self.namespace_prefix.clone(),
            uri: self.namespace_uri.clone(),
            docs: self.docs_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_figment(Figment::new()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_toml() {
        let config = Config::from_figment(Figment::new().merge(Toml::string(
            r#"
            namespace_uri = "urn:example:controls"
            xml_indent = 2
            json_pretty = true
            "#,
        )))
        .unwrap();
        assert_eq!(config.namespace_uri, "urn:example:controls");
        assert_eq!(config.xml_indent, 2);
        assert!(config.json_pretty);
        assert_eq!(config.docs_url, Config::default().docs_url);
        assert_eq!(config.namespace().uri, "urn:example:controls");
        assert_eq!(config.namespace().prefix, "c");
    }

    #[test]
    fn test_prefix() {
        let config =
            Config::from_figment(Figment::new().merge(Toml::string("namespace_prefix = \"hmc\"")))
                .unwrap();
        assert_eq!(config.namespace().prefix, "hmc");

        for bad in ["\"\"", "\"a:b\"", "\"1x\"", "\"x y\""] {
            let err = Config::from_figment(
                Figment::new().merge(Toml::string(&format!("namespace_prefix = {bad}"))),
            )
            .unwrap_err();
            assert!(matches!(
                err,
                HmcError::ConfigParameterValue {
                    parameter: "namespace_prefix",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_bounds() {
        let err = Config::from_figment(Figment::new().merge(Toml::string("xml_indent = 9")))
            .unwrap_err();
        assert!(matches!(
            err,
            HmcError::ConfigParameterValue {
                parameter: "xml_indent",
                ..
            }
        ));

        let err = Config::from_figment(Figment::new().merge(Toml::string("namespace_uri = \" \"")))
            .unwrap_err();
        assert!(matches!(err, HmcError::ConfigParameterValue { .. }));

        let err = Config::from_figment(Figment::new().merge(Toml::string("xml_indent = \"x\"")))
            .unwrap_err();
        assert!(matches!(err, HmcError::ConfigDeserialization(_)));
    }
}
