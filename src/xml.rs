//! XML dialect rendering
//!
//! Controls render themselves through [`ToXml`] onto an [`XmlWriter`], a thin layer over
//! the `quick_xml` event writer. Control element names are qualified with the writer's
//! prefix (`c` unless configured otherwise), which [`to_xml_document`] binds to the
//! [`Namespace`] URI on the root element.
use crate::HmcError;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::Write;
use tracing::trace;

/// Prefix control elements are qualified with when none is configured
pub const DEFAULT_PREFIX: &str = "c";

/// The namespace declaration placed on a document root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Prefix control elements are qualified with
    pub prefix: String,
    /// Namespace URI bound to `prefix`
    pub uri: String,
    /// Where the dialect is documented; rendered as a comment on the root
    pub docs: String,
}

impl Namespace {
    /// The comment text placed on the document root
    pub fn comment(&self) -> String {
        format!("See an overview of what this XML means at {} ", self.docs)
    }

    /// The declaring attribute name, `xmlns:<prefix>`
    pub fn xmlns(&self) -> String {
        format!("xmlns:{}", self.prefix)
    }
}

/// A start tag under construction
///
/// The attribute helpers implement the omission rules shared by every control: optional
/// attributes are left out when empty or zero rather than rendered blank.
#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
}

impl Element {
    /// Starts an element named `name`
    pub fn new(name: &str) -> Self {
        Self {
            start: BytesStart::new(name.to_string()),
        }
    }

    /// Adds an attribute unconditionally
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.start.push_attribute((key, value));
        self
    }

    /// Adds an attribute unless `value` is empty
    pub fn attr_opt(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.attr(key, value)
        }
    }

    /// Adds a numeric attribute unless it is zero
    pub fn attr_nonzero(self, key: &str, value: usize) -> Self {
        if value == 0 {
            self
        } else {
            self.attr(key, &value.to_string())
        }
    }

    /// Adds a valueless (`key=""`) attribute when `on` is set
    pub fn flag(self, key: &str, on: bool) -> Self {
        if on { self.attr(key, "") } else { self }
    }

    /// Element name, as given to [`Element::new`]
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.name().as_ref()).into_owned()
    }
}

/// Event writer used by [`ToXml`] implementations
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    prefix: String,
}

impl<W: Write> XmlWriter<W> {
    /// Compact output with the default prefix
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Output indented by `indent` spaces per level; zero means compact
    pub fn with_indent(inner: W, indent: usize) -> Self {
        if indent == 0 {
            return Self::new(inner);
        }
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Qualifies control elements with `prefix` instead of [`DEFAULT_PREFIX`]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The prefix control elements are qualified with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Starts a control element: `local` qualified with the writer's prefix
    pub fn control(&self, local: &str) -> Element {
        Element::new(&format!("{}:{local}", self.prefix))
    }

    /// Returns the underlying sink
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Opens `element`
    pub fn start(&mut self, element: Element) -> Result<(), HmcError> {
        self.writer.write_event(Event::Start(element.start))?;
        Ok(())
    }

    /// Closes the element named `name`
    pub fn end(&mut self, name: &str) -> Result<(), HmcError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Writes `element` as a self-closing tag
    pub fn empty(&mut self, element: Element) -> Result<(), HmcError> {
        self.writer.write_event(Event::Empty(element.start))?;
        Ok(())
    }

    /// Writes escaped character data
    pub fn text(&mut self, text: &str) -> Result<(), HmcError> {
        if !text.is_empty() {
            self.writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        Ok(())
    }

    /// Writes a comment
    pub fn comment(&mut self, text: &str) -> Result<(), HmcError> {
        // "--" is not allowed inside a comment
        let text = text.replace("--", "- -");
        self.writer
            .write_event(Event::Comment(BytesText::from_escaped(text)))?;
        Ok(())
    }

    /// Writes `element` with `text` as its only content
    pub fn text_element(&mut self, element: Element, text: &str) -> Result<(), HmcError> {
        let name = element.name();
        self.start(element)?;
        self.text(text)?;
        self.end(&name)
    }

    /// Writes `element` around whatever `body` writes
    pub fn element<F>(&mut self, element: Element, body: F) -> Result<(), HmcError>
    where
        F: FnOnce(&mut Self) -> Result<(), HmcError>,
    {
        let name = element.name();
        self.start(element)?;
        body(self)?;
        self.end(&name)
    }

    /// Writes an `Error` control child if `error` is set
    pub fn error(&mut self, error: &str) -> Result<(), HmcError> {
        if error.is_empty() {
            return Ok(());
        }
        let element = self.control("Error");
        self.text_element(element, error)
    }

    /// Writes any [`ToXml`] value
    pub fn write<T: ToXml + ?Sized>(&mut self, value: &T) -> Result<(), HmcError> {
        value.write_xml(self)
    }
}

/// Rendering into the XML dialect
///
/// Implemented by every control and by [`crate::Form`]. Composite page structs implement
/// it by writing their fields in order.
pub trait ToXml {
    /// Writes `self` onto `w`
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError>;
}

impl<T: ToXml + ?Sized> ToXml for &T {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        (**self).write_xml(w)
    }
}

impl<T: ToXml> ToXml for Option<T> {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        match self {
            Some(v) => v.write_xml(w),
            None => Ok(()),
        }
    }
}

impl<T: ToXml> ToXml for [T] {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        self.iter().try_for_each(|v| v.write_xml(w))
    }
}

impl<T: ToXml> ToXml for Vec<T> {
    fn write_xml<W: Write>(&self, w: &mut XmlWriter<W>) -> Result<(), HmcError> {
        self.as_slice().write_xml(w)
    }
}

/// Produces XML documents with a fixed namespace and layout
#[derive(Debug, Clone)]
pub struct XmlSerializer {
    namespace: Namespace,
    indent: usize,
}

impl XmlSerializer {
    /// Creates a serializer; `indent` of zero produces compact output
    pub fn new(namespace: Namespace, indent: usize) -> Self {
        Self { namespace, indent }
    }

    /// The namespace put on document roots
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Renders `body` inside a root element named `root`
    ///
    /// The root declares the namespace prefix, followed by the documentation comment.
    pub fn document<T: ToXml + ?Sized>(&self, root: &str, body: &T) -> Result<String, HmcError> {
        let w = XmlWriter::with_indent(Vec::new(), self.indent).with_prefix(&self.namespace.prefix);
        let ret = write_document(w, root, &self.namespace, body)?;
        trace!("Rendered <{root}> document ({} bytes)", ret.len());
        Ok(ret)
    }

    /// Renders `body` on its own, without a namespace declaration
    ///
    /// Meant for embedding into a document produced elsewhere.
    pub fn fragment<T: ToXml + ?Sized>(&self, body: &T) -> Result<String, HmcError> {
        let mut w =
            XmlWriter::with_indent(Vec::new(), self.indent).with_prefix(&self.namespace.prefix);
        w.write(body)?;
        Ok(String::from_utf8(w.into_inner())?)
    }
}

fn write_document<T: ToXml + ?Sized>(
    mut w: XmlWriter<Vec<u8>>,
    root: &str,
    ns: &Namespace,
    body: &T,
) -> Result<String, HmcError> {
    w.element(Element::new(root).attr(&ns.xmlns(), &ns.uri), |w| {
        w.comment(&ns.comment())?;
        w.write(body)
    })?;
    Ok(String::from_utf8(w.into_inner())?)
}

/// Renders `body` as a compact document rooted at `root`, declaring `ns`
pub fn to_xml_document<T: ToXml + ?Sized>(
    root: &str,
    ns: &Namespace,
    body: &T,
) -> Result<String, HmcError> {
    write_document(XmlWriter::new(Vec::new()).with_prefix(&ns.prefix), root, ns, body)
}

/// Renders `body` as a compact fragment with the default prefix
pub fn to_xml_string<T: ToXml + ?Sized>(body: &T) -> Result<String, HmcError> {
    let mut w = XmlWriter::new(Vec::new());
    w.write(body)?;
    Ok(String::from_utf8(w.into_inner())?)
}
