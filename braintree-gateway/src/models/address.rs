//! Postal addresses.

use serde::Serialize;

use crate::{
    error::Result,
    xml::{XmlDecode, XmlDocument, XmlElement, XmlEncode},
};

/// A postal address.
///
/// The same record travels as `address` in the vault, as `billing` and
/// `shipping` on a transaction, and as `billing-address` on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Gateway-assigned identifier (vaulted addresses only).
    pub id: Option<String>,
    /// Owning customer.
    pub customer_id: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Street line.
    pub street_address: Option<String>,
    /// Apartment, suite or unit.
    pub extended_address: Option<String>,
    /// City.
    pub locality: Option<String>,
    /// State or province.
    pub region: Option<String>,
    /// Postal or ZIP code.
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code_alpha2: Option<String>,
    /// Country name.
    pub country_name: Option<String>,
}

impl XmlDocument for Address {
    const ROOT: &'static str = "address";
}

impl XmlEncode for Address {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_field("id", self.id.as_ref())
            .optional_field("customer-id", self.customer_id.as_ref())
            .optional_field("first-name", self.first_name.as_ref())
            .optional_field("last-name", self.last_name.as_ref())
            .optional_field("company", self.company.as_ref())
            .optional_field("street-address", self.street_address.as_ref())
            .optional_field("extended-address", self.extended_address.as_ref())
            .optional_field("locality", self.locality.as_ref())
            .optional_field("region", self.region.as_ref())
            .optional_field("postal-code", self.postal_code.as_ref())
            .optional_field("country-code-alpha2", self.country_code_alpha2.as_ref())
            .optional_field("country-name", self.country_name.as_ref())
    }
}

impl XmlDecode for Address {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: element.value("id")?,
            customer_id: element.value("customer-id")?,
            first_name: element.value("first-name")?,
            last_name: element.value("last-name")?,
            company: element.value("company")?,
            street_address: element.value("street-address")?,
            extended_address: element.value("extended-address")?,
            locality: element.value("locality")?,
            region: element.value("region")?,
            postal_code: element.value("postal-code")?,
            country_code_alpha2: element.value("country-code-alpha2")?,
            country_name: element.value("country-name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::xml::{from_document, to_document};

    #[test]
    fn test_encode_under_parent_chosen_name() {
        let address = Address { locality: Some("Chicago".to_owned()), ..Address::default() };
        let element = address.encode("billing");
        assert_eq!(element.name(), "billing");
        assert_eq!(element.child("locality").unwrap().text(), "Chicago");
        assert_eq!(element.children().len(), 1);
    }

    #[test]
    fn test_decode_vault_address() {
        let root = XmlElement::parse(
            br#"<address>
                  <id>ab</id>
                  <customer-id>c1</customer-id>
                  <street-address>1 E Main St</street-address>
                  <extended-address nil="true"/>
                  <country-code-alpha2>US</country-code-alpha2>
                  <created-at type="datetime">2013-10-07T17:26:14Z</created-at>
                </address>"#,
        )
        .unwrap();
        let address: Address = from_document(&root).unwrap();
        assert_eq!(address.id.as_deref(), Some("ab"));
        assert_eq!(address.street_address.as_deref(), Some("1 E Main St"));
        assert_eq!(address.extended_address, None);
        assert_eq!(address.country_code_alpha2.as_deref(), Some("US"));
    }

    #[test]
    fn test_document_root() {
        assert_eq!(to_document(&Address::default()).name(), "address");
    }

    proptest! {
        #[test]
        fn prop_billing_address_round_trip(
            street_address in prop::option::of("[ ]{0,2}[A-Za-z0-9 #&,.]{0,20}[ ]{0,2}"),
            extended_address in prop::option::of(
                prop_oneof![Just(String::new()), "[A-Za-z0-9 ]{1,8}"]
            ),
            postal_code in prop::option::of("[ ]?[0-9]{0,5}[ ]?"),
            region in prop::option::of(prop_oneof![Just(String::new()), Just(" IL ".to_owned())]),
        ) {
            let address = Address {
                street_address,
                extended_address,
                postal_code,
                region,
                ..Address::default()
            };
            let bytes = address.encode("billing").to_xml_bytes().unwrap();
            let decoded = Address::decode(&XmlElement::parse(&bytes).unwrap()).unwrap();
            prop_assert_eq!(decoded, address);
        }
    }
}
