//! Mapping between domain types and [`XmlElement`] trees.
//!
//! Optionality is explicit: a field is `Option<T>`, `None` omits the node
//! entirely and `Some(zero)` is still sent. That keeps a legitimate zero
//! amount apart from "not set", and keeps fields an operation does not use
//! off the wire (the gateway validates strictly).
//!
//! Decoding is tolerant of unknown nodes and of absent or `nil="true"`
//! optional nodes, but malformed content in a known node is a
//! [`GatewayError::Decode`].

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;

use super::{TYPE_ATTRIBUTE, XmlElement};
use crate::{
    Amount,
    error::{GatewayError, Result},
};

/// A scalar that maps to the text content of a single node.
pub trait XmlValue: Sized {
    /// Whether an empty, non-nil node reads as `None`.
    ///
    /// True for scalars with no empty rendering; text keeps `<company/>` as
    /// `Some("")`.
    const EMPTY_IS_NONE: bool = true;

    /// Renders the wire text.
    fn to_xml_text(&self) -> String;

    /// Parses the wire text.
    ///
    /// # Errors
    ///
    /// Returns an error describing why `text` is not a valid value.
    fn from_xml_text(text: &str) -> Result<Self>;
}

/// A type that encodes itself as a named node.
///
/// The node name is supplied by the parent because the same record appears
/// under different names (an address is `billing`, `shipping` or
/// `billing-address` depending on where it sits).
pub trait XmlEncode {
    /// Encodes `self` as a node called `name`.
    fn encode(&self, name: &str) -> XmlElement;
}

/// A type that decodes itself from a node.
pub trait XmlDecode: Sized {
    /// Decodes from `element`, whatever its name.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Decode`] if a known node holds malformed content
    /// or a required node is missing.
    fn decode(element: &XmlElement) -> Result<Self>;
}

/// A type that is the root of a request or response document.
pub trait XmlDocument {
    /// Root node name (`transaction`, `credit-card`, `search`, ...).
    const ROOT: &'static str;
}

/// Encodes `value` under its document root name.
pub fn to_document<T: XmlEncode + XmlDocument>(value: &T) -> XmlElement {
    value.encode(T::ROOT)
}

/// Decodes a document root, checking that it is the node `T` expects.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] if the root name differs from
/// [`XmlDocument::ROOT`] or the content does not decode.
pub fn from_document<T: XmlDecode + XmlDocument>(root: &XmlElement) -> Result<T> {
    if root.name() != T::ROOT {
        return Err(GatewayError::Decode(format!(
            "expected <{}> document, got <{}>",
            T::ROOT,
            root.name()
        )));
    }
    T::decode(root)
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

impl XmlElement {
    /// Appends a text node that is always present.
    #[must_use]
    pub fn field<V: XmlValue>(self, name: &str, value: &V) -> Self {
        self.with_child(XmlElement::new(name).with_text(value.to_xml_text()))
    }

    /// Appends a text node only when `value` is set.
    #[must_use]
    pub fn optional_field<V: XmlValue>(self, name: &str, value: Option<&V>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Appends a nested record only when it is set.
    #[must_use]
    pub fn optional_child<E: XmlEncode>(self, name: &str, value: Option<&E>) -> Self {
        match value {
            Some(value) => self.with_child(value.encode(name)),
            None => self,
        }
    }

    /// Adds an attribute only when `value` is set.
    #[must_use]
    pub fn optional_attribute<V: XmlValue>(self, name: &str, value: Option<&V>) -> Self {
        match value {
            Some(value) => self.with_attribute(name, value.to_xml_text()),
            None => self,
        }
    }

    /// Appends a `type="array"` wrapper holding one `item` node per element.
    ///
    /// Nothing is appended for an empty slice.
    #[must_use]
    pub fn array<E: XmlEncode>(self, wrapper: &str, item: &str, values: &[E]) -> Self {
        if values.is_empty() {
            return self;
        }
        let list = values.iter().fold(
            XmlElement::new(wrapper).with_attribute(TYPE_ATTRIBUTE, "array"),
            |list, value| list.with_child(value.encode(item)),
        );
        self.with_child(list)
    }
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

impl XmlElement {
    /// Reads an optional scalar child.
    ///
    /// Absent and `nil="true"` nodes read as `None`. An empty node is `None`
    /// unless [`XmlValue::EMPTY_IS_NONE`] is false for `V`. Text is passed
    /// through untrimmed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Decode`] if the node text does not parse.
    pub fn value<V: XmlValue>(&self, name: &str) -> Result<Option<V>> {
        match self.child(name) {
            Some(child) if child.is_nil() => Ok(None),
            Some(child) if child.text().is_empty() && V::EMPTY_IS_NONE => Ok(None),
            Some(child) => {
                V::from_xml_text(child.text()).map(Some).map_err(|e| self.field_error(name, &e))
            }
            None => Ok(None),
        }
    }

    /// Reads a scalar child that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Decode`] if the node is missing or malformed.
    pub fn required_value<V: XmlValue>(&self, name: &str) -> Result<V> {
        self.value(name)?.ok_or_else(|| {
            GatewayError::Decode(format!("missing required <{name}> in <{}>", self.name()))
        })
    }

    /// Reads an optional attribute.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Decode`] if the attribute value does not parse.
    pub fn attribute_value<V: XmlValue>(&self, name: &str) -> Result<Option<V>> {
        match self.attribute(name) {
            Some(text) if !text.is_empty() => {
                V::from_xml_text(text).map(Some).map_err(|e| self.field_error(name, &e))
            }
            _ => Ok(None),
        }
    }

    /// Reads an optional nested record.
    ///
    /// # Errors
    ///
    /// Propagates the nested record's decode error.
    pub fn element<D: XmlDecode>(&self, name: &str) -> Result<Option<D>> {
        match self.child(name) {
            Some(child) if !child.is_nil() => D::decode(child).map(Some),
            _ => Ok(None),
        }
    }

    /// Reads the items of a collection wrapper; an absent wrapper is empty.
    ///
    /// # Errors
    ///
    /// Propagates the first item decode error.
    pub fn array_of<D: XmlDecode>(&self, wrapper: &str, item: &str) -> Result<Vec<D>> {
        match self.child(wrapper) {
            Some(list) => list.repeated(item),
            None => Ok(Vec::new()),
        }
    }

    /// Reads every direct child called `item`.
    ///
    /// # Errors
    ///
    /// Propagates the first item decode error.
    pub fn repeated<D: XmlDecode>(&self, item: &str) -> Result<Vec<D>> {
        self.children_named(item).map(D::decode).collect()
    }

    fn field_error(&self, name: &str, error: &GatewayError) -> GatewayError {
        let detail = match error {
            GatewayError::Decode(message) | GatewayError::InvalidInput(message) => message.clone(),
            other => other.to_string(),
        };
        GatewayError::Decode(format!("<{name}> in <{}>: {detail}", self.name()))
    }
}

// ---------------------------------------------------------------------------
// Scalar impls
// ---------------------------------------------------------------------------

impl XmlValue for String {
    const EMPTY_IS_NONE: bool = false;

    fn to_xml_text(&self) -> String {
        self.clone()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        Ok(text.to_owned())
    }
}

impl XmlValue for bool {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(GatewayError::Decode(format!("expected boolean, got '{other}'"))),
        }
    }
}

macro_rules! integer_xml_value {
    ($($ty:ty),*) => {
        $(
            impl XmlValue for $ty {
                fn to_xml_text(&self) -> String {
                    self.to_string()
                }

                fn from_xml_text(text: &str) -> Result<Self> {
                    text.trim().parse().map_err(|e| {
                        GatewayError::Decode(format!("expected integer, got '{text}': {e}"))
                    })
                }
            }
        )*
    };
}

integer_xml_value!(i32, i64, u32, u64);

impl XmlValue for Amount {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        text.trim().parse()
    }
}

impl XmlValue for Decimal {
    fn to_xml_text(&self) -> String {
        self.to_string()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        text.trim()
            .parse()
            .map_err(|e| GatewayError::Decode(format!("expected decimal, got '{text}': {e}")))
    }
}

impl XmlValue for DateTime<Utc> {
    fn to_xml_text(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| GatewayError::Decode(format!("expected datetime, got '{text}': {e}")))
    }
}

impl XmlValue for NaiveDate {
    fn to_xml_text(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }

    fn from_xml_text(text: &str) -> Result<Self> {
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|e| GatewayError::Decode(format!("expected date, got '{text}': {e}")))
    }
}
