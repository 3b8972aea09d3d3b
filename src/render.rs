//! Rendering one state into either output format
use crate::{
    HmcError,
    config::Config,
    json::{to_json_string, to_json_string_pretty},
    xml::{ToXml, XmlSerializer},
};
use serde::Serialize;
use std::str::FromStr;
use tracing::debug;

/// Output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// For API clients
    Json,
    /// The XML dialect, for inspection tools
    Xml,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" | "application/json" => Ok(Format::Json),
            "xml" | "application/xml" | "text/xml" => Ok(Format::Xml),
            other => Err(format!("unsupported format {other:?}")),
        }
    }
}

/// Renders a page in either format from the same in-memory state
#[derive(Debug, Clone)]
pub struct Renderer {
    xml: XmlSerializer,
    json_pretty: bool,
}

impl Renderer {
    /// Creates a renderer from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            xml: XmlSerializer::new(config.namespace(), config.xml_indent),
            json_pretty: config.json_pretty,
        }
    }

    /// The XML half
    pub fn xml(&self) -> &XmlSerializer {
        &self.xml
    }

    /// Renders `page` as JSON
    pub fn json<T: Serialize + ?Sized>(&self, page: &T) -> Result<String, HmcError> {
        if self.json_pretty {
            to_json_string_pretty(page)
        } else {
            to_json_string(page)
        }
    }

    /// Renders `page` in `format`; `root` names the XML document element
    pub fn render<T>(&self, format: Format, root: &str, page: &T) -> Result<String, HmcError>
    where
        T: Serialize + ToXml + ?Sized,
    {
        debug!("Rendering {root} as {format:?}");
        match format {
            Format::Json => self.json(page),
            Format::Xml => self.xml.document(root, page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!("JSON".parse::<Format>(), Ok(Format::Json));
        assert_eq!("text/xml".parse::<Format>(), Ok(Format::Xml));
        assert!("yaml".parse::<Format>().is_err());
    }
}
