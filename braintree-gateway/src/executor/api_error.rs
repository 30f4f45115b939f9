//! Structured 422 payloads.
//!
//! A rejected request comes back as an `api-error-response` document:
//!
//! ```xml
//! <api-error-response>
//!   <errors>
//!     <errors type="array"/>
//!     <transaction>
//!       <errors type="array">
//!         <error>
//!           <code>81502</code>
//!           <attribute type="symbol">amount</attribute>
//!           <message>Amount is required.</message>
//!         </error>
//!       </errors>
//!       <credit-card>
//!         <errors type="array">...</errors>
//!       </credit-card>
//!     </transaction>
//!   </errors>
//!   <message>Amount is required.</message>
//! </api-error-response>
//! ```
//!
//! The primary message is picked in a fixed order: the payload `message`,
//! then the first top-level error, then the first field error depth-first in
//! document order.

use std::fmt;

use serde::Serialize;

use crate::{
    error::{Result, reason_phrase},
    models::Transaction,
    xml::{XmlDecode, XmlDocument, XmlElement},
};

/// Name of the list node inside every object of the error tree.
const ERRORS_NODE: &str = "errors";

/// One validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Numeric gateway error code, e.g. `81502`.
    pub code: String,
    /// Offending attribute, e.g. `amount`.
    pub attribute: String,
    /// Human-readable message.
    pub message: String,
}

impl XmlDecode for FieldError {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            code: element.value("code")?.unwrap_or_default(),
            attribute: element.value("attribute")?.unwrap_or_default(),
            message: element.value("message")?.unwrap_or_default(),
        })
    }
}

/// A node of the error tree: the errors on one object plus its nested objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    /// Node name of the object (`transaction`, `credit-card`, ...).
    pub object: String,
    /// Errors attached directly to this object.
    pub errors: Vec<FieldError>,
    /// Nested objects, in document order.
    pub nested: Vec<ValidationErrors>,
}

impl ValidationErrors {
    /// Nested object by node name.
    #[must_use]
    pub fn for_object(&self, object: &str) -> Option<&Self> {
        self.nested.iter().find(|nested| nested.object == object)
    }

    /// Errors on this object for `attribute`.
    pub fn on<'a>(&'a self, attribute: &'a str) -> impl Iterator<Item = &'a FieldError> {
        self.errors.iter().filter(move |error| error.attribute == attribute)
    }

    /// Every error in the subtree, depth-first in document order.
    #[must_use]
    pub fn all(&self) -> Vec<&FieldError> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    /// Number of errors in the subtree.
    #[must_use]
    pub fn deep_len(&self) -> usize {
        self.errors.len() + self.nested.iter().map(Self::deep_len).sum::<usize>()
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a FieldError>) {
        out.extend(&self.errors);
        for nested in &self.nested {
            nested.collect_into(out);
        }
    }

    fn first_field_error(&self) -> Option<&FieldError> {
        self.errors.first().or_else(|| self.nested.iter().find_map(Self::first_field_error))
    }
}

impl XmlDecode for ValidationErrors {
    fn decode(element: &XmlElement) -> Result<Self> {
        let nested = element
            .children()
            .iter()
            .filter(|child| child.name() != ERRORS_NODE)
            .map(Self::decode)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            object: element.name().to_owned(),
            errors: element.array_of(ERRORS_NODE, "error")?,
            nested,
        })
    }
}

/// Decoded `api-error-response`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationError {
    message: String,
    errors: ValidationErrors,
    transaction: Option<Box<Transaction>>,
}

impl ValidationError {
    /// Builds an error from its parts, choosing the primary message.
    #[must_use]
    pub fn new(
        payload_message: Option<String>,
        errors: ValidationErrors,
        transaction: Option<Transaction>,
    ) -> Self {
        let message = payload_message
            .filter(|message| !message.trim().is_empty())
            .or_else(|| errors.errors.first().map(|error| error.message.clone()))
            .or_else(|| errors.first_field_error().map(|error| error.message.clone()))
            .unwrap_or_else(|| format!("{} (422)", reason_phrase(422)));

        Self { message, errors, transaction: transaction.map(Box::new) }
    }

    /// Primary message, suitable for display and string matching.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Root of the error tree; its own `errors` are the top-level errors.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The declined transaction, when the gateway included it.
    #[must_use]
    pub fn transaction(&self) -> Option<&Transaction> {
        self.transaction.as_deref()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl XmlDocument for ValidationError {
    const ROOT: &'static str = "api-error-response";
}

impl XmlDecode for ValidationError {
    fn decode(element: &XmlElement) -> Result<Self> {
        let errors = element.element::<ValidationErrors>(ERRORS_NODE)?.unwrap_or_default();
        Ok(Self::new(element.value("message")?, errors, element.element("transaction")?))
    }
}
