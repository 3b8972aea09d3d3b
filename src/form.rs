//! Form container
use crate::{
    HmcError,
    xml::{ToXml, XmlWriter},
};
use serde::{Serialize, Serializer};
use std::io::Write;

/// A state transition requiring input from the client
///
/// Describes what is needed (`elements`, usually a struct of [`crate::Input`],
/// [`crate::Select`], [`crate::Map`], [`crate::Submit`] and the like), how it is sent
/// (`method`) and where (`action`).
///
/// In JSON a form is nothing but its elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form<T> {
    /// HTTP method; omitted from XML when empty
    pub method: String,
    /// Target URI; omitted from XML when empty
    pub action: String,
    /// The controls
    pub elements: T,
}

impl<T> Form<T> {
    /// Creates a form submitted with `method`
    pub fn new(method: impl Into<String>, elements: T) -> Self {
        Self {
            method: method.into(),
            action: String::new(),
            elements,
        }
    }
}

impl<T: Serialize> Serialize for Form<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.elements.serialize(serializer)
    }
}

impl<T: ToXml> ToXml for Form<T> {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let element = w.control("Form")
            .attr_opt("method", &self.method)
            .attr_opt("action", &self.action);
        w.element(element, |w| w.write(&self.elements))
    }
}
