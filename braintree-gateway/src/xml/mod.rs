//! Hierarchical markup wire format.
//!
//! The gateway speaks XML with hyphenated lowercase node names
//! (`credit-card`, `submit-for-settlement`). This module keeps that format
//! behind a small element tree:
//!
//! - [`XmlElement`]: a node with attributes, child elements and text, parsed
//!   from and written to bytes with `quick-xml`
//! - [`codec`]: the [`XmlValue`], [`XmlEncode`], [`XmlDecode`] and
//!   [`XmlDocument`] traits domain types implement
//!
//! Mixed content is not part of the wire format, so an element holds either
//! text or children; text around child elements is ignored.
//!
//! # Examples
//!
//! ```
//! use braintree_gateway::xml::XmlElement;
//!
//! let element = XmlElement::new("transaction")
//!     .with_child(XmlElement::new("amount").with_text("10.00"))
//!     .with_attribute("service-fee-amount", "1.00");
//!
//! let bytes = element.to_xml_bytes().unwrap();
//! let parsed = XmlElement::parse(&bytes).unwrap();
//! assert_eq!(parsed, element);
//! ```

pub mod codec;

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

pub use codec::{XmlDecode, XmlDocument, XmlEncode, XmlValue, from_document, to_document};

use crate::error::{GatewayError, Result};

/// Attribute marking a node whose value is explicitly absent.
const NIL_ATTRIBUTE: &str = "nil";

/// Attribute carrying the wire type hint (`array`, `boolean`, `datetime`, ...).
pub const TYPE_ATTRIBUTE: &str = "type";

/// One node of an XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Node name, verbatim.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content (empty for container nodes).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Looks up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// First child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Returns true if the node carries `nil="true"`.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.attribute(NIL_ATTRIBUTE) == Some("true")
    }

    /// Returns true if the node has neither text nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element in place.
    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Parses a complete document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Decode`] if the bytes are not well-formed XML,
    /// are not UTF-8, or contain no root element.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| {
                    decode_error(format!("malformed XML at byte {}: {e}", reader.buffer_position()))
                })?;

            match event {
                Event::Start(start) => stack.push(open_element(&start)?),
                Event::Empty(start) => {
                    let element = open_element(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| decode_error("unbalanced closing tag".to_owned()))?;
                    // Indentation between child elements is layout, not content.
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let unescaped =
                            text.unescape().map_err(|e| decode_error(format!("bad text: {e}")))?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        let raw = String::from_utf8(data.into_inner().into_owned())
                            .map_err(|e| decode_error(format!("CDATA is not UTF-8: {e}")))?;
                        current.text.push_str(&raw);
                    }
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if !stack.is_empty() {
            return Err(decode_error("document ended inside an element".to_owned()));
        }
        root.ok_or_else(|| decode_error("document has no root element".to_owned()))
    }

    /// Serializes the element as a UTF-8 document with an XML declaration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidInput`] if writing fails, which only
    /// happens for names that cannot be written as XML.
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| encode_error(&e))?;
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(|e| encode_error(&e));
        }

        writer.write_event(Event::Start(start)).map_err(|e| encode_error(&e))?;
        if self.children.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(|e| encode_error(&e))?;
        } else {
            for child in &self.children {
                child.write_to(writer)?;
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| encode_error(&e))
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| decode_error(format!("element name is not UTF-8: {e}")))?
        .to_owned();

    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| decode_error(format!("bad attribute: {e}")))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| decode_error(format!("attribute name is not UTF-8: {e}")))?
            .to_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| decode_error(format!("bad attribute value: {e}")))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(decode_error("document has more than one root element".to_owned()));
    }
    *root = Some(element);
    Ok(())
}

fn decode_error(message: String) -> GatewayError {
    GatewayError::Decode(message)
}

fn encode_error(error: &impl std::fmt::Display) -> GatewayError {
    GatewayError::InvalidInput(format!("failed to encode XML: {error}"))
}
