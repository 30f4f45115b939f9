//! Vaulted credit cards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Address;
use crate::{
    error::Result,
    xml::{XmlDecode, XmlDocument, XmlElement, XmlEncode},
};

/// A credit card, either sent inline or stored in the vault.
///
/// `number` and `cvv` are write-only: the gateway never returns them, they
/// are skipped when serialized to JSON and redacted from `Debug`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreditCard {
    /// Owning customer.
    pub customer_id: Option<String>,
    /// Vault token.
    pub token: Option<String>,
    /// Full card number (requests only).
    #[serde(skip_serializing)]
    pub number: Option<String>,
    /// Card verification value (requests only).
    #[serde(skip_serializing)]
    pub cvv: Option<String>,
    /// Expiration as `MM/YYYY`.
    pub expiration_date: Option<String>,
    /// Expiration month.
    pub expiration_month: Option<String>,
    /// Expiration year.
    pub expiration_year: Option<String>,
    /// Name printed on the card.
    pub cardholder_name: Option<String>,
    /// Brand, e.g. `Visa`.
    pub card_type: Option<String>,
    /// First six digits.
    pub bin: Option<String>,
    /// Last four digits (`last-4` on the wire).
    pub last_4: Option<String>,
    /// Whether this is the customer's default payment method.
    pub default: Option<bool>,
    /// Whether the card has expired.
    pub expired: Option<bool>,
    /// Billing address attached to the card.
    pub billing_address: Option<Address>,
    /// Vaulting options.
    pub options: Option<CreditCardOptions>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("customer_id", &self.customer_id)
            .field("token", &self.token)
            .field("number", &self.number.as_ref().map(|_| "[REDACTED]"))
            .field("cvv", &self.cvv.as_ref().map(|_| "[REDACTED]"))
            .field("expiration_date", &self.expiration_date)
            .field("cardholder_name", &self.cardholder_name)
            .field("card_type", &self.card_type)
            .field("bin", &self.bin)
            .field("last_4", &self.last_4)
            .field("default", &self.default)
            .field("expired", &self.expired)
            .field("billing_address", &self.billing_address)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl XmlDocument for CreditCard {
    const ROOT: &'static str = "credit-card";
}

impl XmlEncode for CreditCard {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_field("customer-id", self.customer_id.as_ref())
            .optional_field("token", self.token.as_ref())
            .optional_field("number", self.number.as_ref())
            .optional_field("cvv", self.cvv.as_ref())
            .optional_field("expiration-date", self.expiration_date.as_ref())
            .optional_field("expiration-month", self.expiration_month.as_ref())
            .optional_field("expiration-year", self.expiration_year.as_ref())
            .optional_field("cardholder-name", self.cardholder_name.as_ref())
            .optional_field("card-type", self.card_type.as_ref())
            .optional_field("bin", self.bin.as_ref())
            .optional_field("last-4", self.last_4.as_ref())
            .optional_field("default", self.default.as_ref())
            .optional_field("expired", self.expired.as_ref())
            .optional_child("billing-address", self.billing_address.as_ref())
            .optional_child("options", self.options.as_ref())
            .optional_field("created-at", self.created_at.as_ref())
            .optional_field("updated-at", self.updated_at.as_ref())
    }
}

impl XmlDecode for CreditCard {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            customer_id: element.value("customer-id")?,
            token: element.value("token")?,
            number: element.value("number")?,
            cvv: element.value("cvv")?,
            expiration_date: element.value("expiration-date")?,
            expiration_month: element.value("expiration-month")?,
            expiration_year: element.value("expiration-year")?,
            cardholder_name: element.value("cardholder-name")?,
            card_type: element.value("card-type")?,
            bin: element.value("bin")?,
            last_4: element.value("last-4")?,
            default: element.value("default")?,
            expired: element.value("expired")?,
            billing_address: element.element("billing-address")?,
            options: element.element("options")?,
            created_at: element.value("created-at")?,
            updated_at: element.value("updated-at")?,
        })
    }
}

/// Options applied when a card is vaulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreditCardOptions {
    /// Run a verification before storing.
    pub verify_card: Option<bool>,
    /// Make this the customer's default payment method.
    pub make_default: Option<bool>,
    /// Reject the card if it is already in the vault.
    pub fail_on_duplicate_payment_method: Option<bool>,
}

impl XmlEncode for CreditCardOptions {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_field("verify-card", self.verify_card.as_ref())
            .optional_field("make-default", self.make_default.as_ref())
            .optional_field(
                "fail-on-duplicate-payment-method",
                self.fail_on_duplicate_payment_method.as_ref(),
            )
    }
}

impl XmlDecode for CreditCardOptions {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            verify_card: element.value("verify-card")?,
            make_default: element.value("make-default")?,
            fail_on_duplicate_payment_method: element
                .value("fail-on-duplicate-payment-method")?,
        })
    }
}
