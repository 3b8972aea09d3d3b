//! Navigation control
use crate::{
    HmcError,
    xml::{ToXml, XmlWriter},
};
use serde::Serialize;
use std::io::Write;

/// A state transition that needs no input: plain navigation or an action trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Display text
    pub label: String,
    /// Target URI
    pub href: String,
}

impl Link {
    /// Creates a link
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

impl ToXml for Link {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let element = w.control("Link").attr("href", &self.href);
        w.text_element(element, &self.label)
    }
}
