//! Submission control
use crate::{
    HmcError,
    xml::{ToXml, XmlWriter},
};
use serde::Serialize;
use std::io::Write;

/// A control that initiates a form submission
///
/// A form may offer several submits with different name/value pairs; only the pair of the
/// one used is sent along.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Submit {
    /// Display text
    pub label: String,
    /// Form key sent when this submit is used
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Value sent under `name`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl Submit {
    /// Creates a submit which sends nothing but the form
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }
}

impl ToXml for Submit {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        let element = if !self.name.is_empty() {
            w.control("Submit")
                .attr("name", &self.name)
                .attr("value", &self.value)
        } else {
            w.control("Submit").attr_opt("value", &self.value)
        };
        w.text_element(element, &self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::to_xml_string;

    #[test]
    fn test_submit() {
        let submit = Submit {
            label: "Delete".to_string(),
            name: "action".to_string(),
            value: String::new(),
        };
        assert_eq!(
            to_xml_string(&submit).unwrap(),
            r#"<c:Submit name="action" value="">Delete</c:Submit>"#
        );
        assert_eq!(
            serde_json::to_string(&submit).unwrap(),
            r#"{"label":"Delete","name":"action"}"#
        );

        let submit = Submit::new("Go");
        assert_eq!(to_xml_string(&submit).unwrap(), "<c:Submit>Go</c:Submit>");
        assert_eq!(serde_json::to_string(&submit).unwrap(), r#"{"label":"Go"}"#);
    }
}
