//! Gateway resource records.
//!
//! Each record mirrors one node of the gateway's XML schema. Every field is
//! optional so that a request only carries what the caller set; responses fill
//! in whatever the gateway returned.

/// Declares a string-valued wire enum with an `Unrecognized` fallback.
///
/// The gateway adds values over time; unknown ones decode into
/// `Unrecognized(raw)` instead of failing the whole response.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )*
            /// A value this client does not know yet.
            Unrecognized(String),
        }

        impl $name {
            /// Wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )*
                    Self::Unrecognized(raw) => raw,
                }
            }

            /// Parses a wire value, falling back to `Unrecognized`.
            #[must_use]
            pub fn from_wire(value: &str) -> Self {
                match value {
                    $( $wire => Self::$variant, )*
                    other => Self::Unrecognized(other.to_owned()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $crate::xml::XmlValue for $name {
            fn to_xml_text(&self) -> String {
                self.as_str().to_owned()
            }

            fn from_xml_text(text: &str) -> $crate::error::Result<Self> {
                Ok(Self::from_wire(text.trim()))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from_wire(&raw))
            }
        }
    };
}

pub(crate) use wire_enum;

pub mod address;
pub mod credit_card;
pub mod customer;
pub mod transaction;

pub use address::Address;
pub use credit_card::{CreditCard, CreditCardOptions};
pub use customer::{Customer, CustomerSearchResult};
pub use transaction::{
    DisbursementDetails, EscrowStatus, Transaction, TransactionOptions, TransactionSearchResult,
    TransactionStatus, TransactionType,
};
