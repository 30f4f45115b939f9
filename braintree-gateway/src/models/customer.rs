//! Vault customers.

use serde::Serialize;

use super::CreditCard;
use crate::{
    error::Result,
    xml::{XmlDecode, XmlDocument, XmlElement, XmlEncode},
};

/// A customer record in the vault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Customer identifier, merchant- or gateway-assigned.
    pub id: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Fax number.
    pub fax: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Card to vault alongside a new customer.
    pub credit_card: Option<CreditCard>,
    /// Cards already in the vault for this customer.
    pub credit_cards: Vec<CreditCard>,
}

impl XmlDocument for Customer {
    const ROOT: &'static str = "customer";
}

impl XmlEncode for Customer {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_field("id", self.id.as_ref())
            .optional_field("first-name", self.first_name.as_ref())
            .optional_field("last-name", self.last_name.as_ref())
            .optional_field("company", self.company.as_ref())
            .optional_field("email", self.email.as_ref())
            .optional_field("phone", self.phone.as_ref())
            .optional_field("fax", self.fax.as_ref())
            .optional_field("website", self.website.as_ref())
            .optional_child("credit-card", self.credit_card.as_ref())
            .array("credit-cards", "credit-card", &self.credit_cards)
    }
}

impl XmlDecode for Customer {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: element.value("id")?,
            first_name: element.value("first-name")?,
            last_name: element.value("last-name")?,
            company: element.value("company")?,
            email: element.value("email")?,
            phone: element.value("phone")?,
            fax: element.value("fax")?,
            website: element.value("website")?,
            credit_card: element.element("credit-card")?,
            credit_cards: element.array_of("credit-cards", "credit-card")?,
        })
    }
}

/// Customers matching a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustomerSearchResult {
    /// Matching customers in gateway order.
    pub customers: Vec<Customer>,
}

impl XmlDocument for CustomerSearchResult {
    const ROOT: &'static str = "customers";
}

impl XmlDecode for CustomerSearchResult {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self { customers: element.repeated("customer")? })
    }
}
