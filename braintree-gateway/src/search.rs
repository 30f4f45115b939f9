//! Search query construction.
//!
//! A [`SearchQuery`] is an ordered list of field predicates. Each `add_*`
//! call appends one field and returns a handle that configures it; a field
//! whose handle never set an operator is left off the wire. Field names may
//! repeat, in which case the gateway ANDs the constraints.
//!
//! The only local check is on multi-value fields declared with a set of
//! valid values. Everything else is validated by the gateway.
//!
//! # Examples
//!
//! ```
//! use braintree_gateway::{Amount, SearchQuery};
//!
//! let mut query = SearchQuery::new();
//! query.add_text_field("customer-first-name").is("Erik-123");
//! query.add_range_field("amount").between(Amount::new(500, 2), Amount::new(2000, 2));
//! query
//!     .add_multi_value_field("status", ["authorized", "settled"])
//!     .is("authorized")
//!     .unwrap();
//! query.add_text_field("order-id"); // unconfigured, not sent
//!
//! assert_eq!(query.configured_len(), 3);
//! ```

use crate::{
    error::{GatewayError, Result},
    xml::{TYPE_ATTRIBUTE, XmlDocument, XmlElement, XmlEncode, XmlValue},
};

/// Comparison operator applied to a text or range field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Is,
    IsNot,
    StartsWith,
    EndsWith,
    Contains,
    Min,
    Max,
}

impl Operator {
    const fn node_name(self) -> &'static str {
        match self {
            Self::Is => "is",
            Self::IsNot => "is-not",
            Self::StartsWith => "starts-with",
            Self::EndsWith => "ends-with",
            Self::Contains => "contains",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Criterion {
    Unset,
    Operators(Vec<(Operator, String)>),
    Items(Vec<String>),
    Flag(bool),
}

/// One field of a search, as added by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchField {
    name: String,
    valid_values: Vec<String>,
    criterion: Criterion,
}

impl SearchField {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), valid_values: Vec::new(), criterion: Criterion::Unset }
    }

    /// Sets `operator`, replacing an earlier value for the same operator.
    fn set(&mut self, operator: Operator, value: String) {
        if let Criterion::Operators(operators) = &mut self.criterion {
            match operators.iter_mut().find(|(op, _)| *op == operator) {
                Some(slot) => slot.1 = value,
                None => operators.push((operator, value)),
            }
        } else {
            self.criterion = Criterion::Operators(vec![(operator, value)]);
        }
    }

    fn check(&self, value: &str) -> Result<()> {
        if self.valid_values.is_empty() || self.valid_values.iter().any(|valid| valid == value) {
            Ok(())
        } else {
            Err(GatewayError::InvalidSearchValue {
                field: self.name.clone(),
                value: value.to_owned(),
            })
        }
    }

    fn to_element(&self) -> Option<XmlElement> {
        let node = XmlElement::new(self.name.as_str());
        match &self.criterion {
            Criterion::Unset => None,
            Criterion::Operators(operators) => {
                Some(operators.iter().fold(node, |node, (op, value)| {
                    node.with_child(XmlElement::new(op.node_name()).with_text(value.as_str()))
                }))
            }
            Criterion::Items(items) => Some(items.iter().fold(
                node.with_attribute(TYPE_ATTRIBUTE, "array"),
                |node, item| node.with_child(XmlElement::new("item").with_text(item.as_str())),
            )),
            Criterion::Flag(flag) => Some(node.with_text(flag.to_xml_text())),
        }
    }
}

/// An ordered set of search predicates, sent as a `search` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    fields: Vec<SearchField>,
}

impl SearchQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free-text field (`is`, `is-not`, `starts-with`, `ends-with`, `contains`).
    pub fn add_text_field(&mut self, name: impl Into<String>) -> TextField<'_> {
        TextField { field: self.push(SearchField::new(name)) }
    }

    /// Adds a range field (`is`, `min`, `max`).
    pub fn add_range_field(&mut self, name: impl Into<String>) -> RangeField<'_> {
        RangeField { field: self.push(SearchField::new(name)) }
    }

    /// Adds a multi-value field.
    ///
    /// An empty `valid_values` accepts any value; otherwise values outside the
    /// set are rejected when assigned.
    pub fn add_multi_value_field<I, S>(
        &mut self,
        name: impl Into<String>,
        valid_values: I,
    ) -> MultiValueField<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut field = SearchField::new(name);
        field.valid_values = valid_values.into_iter().map(Into::into).collect();
        MultiValueField { field: self.push(field) }
    }

    /// Adds a boolean key/value field such as `refund`.
    pub fn add_boolean_field(&mut self, name: impl Into<String>) -> BooleanField<'_> {
        BooleanField { field: self.push(SearchField::new(name)) }
    }

    /// Number of fields added, configured or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields that will be sent.
    #[must_use]
    pub fn configured_len(&self) -> usize {
        self.fields.iter().filter(|field| field.criterion != Criterion::Unset).count()
    }

    fn push(&mut self, field: SearchField) -> &mut SearchField {
        self.fields.push(field);
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }
}

impl XmlDocument for SearchQuery {
    const ROOT: &'static str = "search";
}

impl XmlEncode for SearchQuery {
    fn encode(&self, name: &str) -> XmlElement {
        let mut root = XmlElement::new(name);
        for node in self.fields.iter().filter_map(SearchField::to_element) {
            root.push_child(node);
        }
        root
    }
}

/// Handle for a free-text field.
#[derive(Debug)]
pub struct TextField<'q> {
    field: &'q mut SearchField,
}

#[allow(clippy::return_self_not_must_use, reason = "a handle may be configured and dropped")]
impl TextField<'_> {
    /// Exact match.
    pub fn is(self, value: impl Into<String>) -> Self {
        self.field.set(Operator::Is, value.into());
        self
    }

    /// Anything but an exact match.
    pub fn is_not(self, value: impl Into<String>) -> Self {
        self.field.set(Operator::IsNot, value.into());
        self
    }

    /// Prefix match.
    pub fn starts_with(self, value: impl Into<String>) -> Self {
        self.field.set(Operator::StartsWith, value.into());
        self
    }

    /// Suffix match.
    pub fn ends_with(self, value: impl Into<String>) -> Self {
        self.field.set(Operator::EndsWith, value.into());
        self
    }

    /// Substring match.
    pub fn contains(self, value: impl Into<String>) -> Self {
        self.field.set(Operator::Contains, value.into());
        self
    }
}

/// Handle for a range field over amounts, dates or numbers.
#[derive(Debug)]
pub struct RangeField<'q> {
    field: &'q mut SearchField,
}

#[allow(clippy::return_self_not_must_use, reason = "a handle may be configured and dropped")]
impl RangeField<'_> {
    /// Exact value.
    pub fn is<V: XmlValue>(self, value: V) -> Self {
        self.field.set(Operator::Is, value.to_xml_text());
        self
    }

    /// Inclusive range.
    pub fn between<V: XmlValue>(self, min: V, max: V) -> Self {
        self.greater_than_or_equal_to(min).less_than_or_equal_to(max)
    }

    /// Inclusive lower bound.
    pub fn greater_than_or_equal_to<V: XmlValue>(self, min: V) -> Self {
        self.field.set(Operator::Min, min.to_xml_text());
        self
    }

    /// Inclusive upper bound.
    pub fn less_than_or_equal_to<V: XmlValue>(self, max: V) -> Self {
        self.field.set(Operator::Max, max.to_xml_text());
        self
    }
}

/// Handle for a multi-value field.
#[derive(Debug)]
pub struct MultiValueField<'q> {
    field: &'q mut SearchField,
}

impl MultiValueField<'_> {
    /// Matches a single value.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidSearchValue`] if `value` is outside the
    /// field's valid set; the field is left unchanged.
    pub fn is(self, value: impl Into<String>) -> Result<Self> {
        self.in_list([value])
    }

    /// Matches any of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidSearchValue`] for the first value outside
    /// the field's valid set; the field is left unchanged.
    pub fn in_list<I, S>(self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        for value in &values {
            self.field.check(value)?;
        }
        self.field.criterion = Criterion::Items(values);
        Ok(self)
    }
}

/// Handle for a boolean field.
#[derive(Debug)]
pub struct BooleanField<'q> {
    field: &'q mut SearchField,
}

#[allow(clippy::return_self_not_must_use, reason = "a handle may be configured and dropped")]
impl BooleanField<'_> {
    /// Matches records where the flag equals `value`.
    pub fn is(self, value: bool) -> Self {
        self.field.criterion = Criterion::Flag(value);
        self
    }
}
