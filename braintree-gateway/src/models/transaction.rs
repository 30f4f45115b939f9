//! Transaction records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Address, CreditCard, Customer, wire_enum};
use crate::{
    Amount,
    error::Result,
    xml::{XmlDecode, XmlDocument, XmlElement, XmlEncode},
};

wire_enum! {
    /// Lifecycle state of a transaction.
    pub enum TransactionStatus {
        /// The authorization lapsed before settlement.
        AuthorizationExpired => "authorization_expired",
        /// Authorization is in progress.
        Authorizing => "authorizing",
        /// Funds are held, not yet captured.
        Authorized => "authorized",
        /// Rejected by the gateway's fraud or duplicate rules.
        GatewayRejected => "gateway_rejected",
        /// The processor could not be reached.
        Failed => "failed",
        /// Declined by the processor.
        ProcessorDeclined => "processor_declined",
        /// Funds have moved.
        Settled => "settled",
        /// Settlement is in progress.
        Settling => "settling",
        /// Queued for the next settlement batch.
        SubmittedForSettlement => "submitted_for_settlement",
        /// Cancelled before settlement.
        Voided => "voided",
    }
}

wire_enum! {
    /// Escrow state of a marketplace transaction.
    pub enum EscrowStatus {
        /// Hold requested, not yet applied.
        HoldPending => "hold_pending",
        /// Funds are held in escrow.
        Held => "held",
        /// Release requested.
        ReleasePending => "release_pending",
        /// Funds have been released.
        Released => "released",
        /// The held transaction was refunded.
        Refunded => "refunded",
    }
}

wire_enum! {
    /// Direction of a transaction.
    pub enum TransactionType {
        /// A charge to the customer.
        Sale => "sale",
        /// A payout to the customer.
        Credit => "credit",
    }
}

/// A payment transaction.
///
/// Requests set only the fields they need; the gateway fills in identifiers,
/// status and processor details on the way back.
///
/// # Examples
///
/// ```
/// use braintree_gateway::{Amount, models::Transaction};
///
/// let tx = Transaction {
///     payment_method_token: Some("card-token".to_owned()),
///     ..Transaction::sale(Amount::new(1000, 2))
/// };
/// assert_eq!(tx.amount.unwrap().to_string(), "10.00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transaction {
    /// Gateway-assigned identifier.
    pub id: Option<String>,
    /// Vault customer the transaction belongs to.
    pub customer_id: Option<String>,
    /// Current lifecycle state.
    pub status: Option<TransactionStatus>,
    /// Escrow state, for marketplace transactions.
    pub escrow_status: Option<EscrowStatus>,
    /// Sale or credit (`type` on the wire).
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    /// Transaction amount.
    pub amount: Option<Amount>,
    /// Merchant order reference.
    pub order_id: Option<String>,
    /// Vaulted payment method to charge.
    pub payment_method_token: Option<String>,
    /// Merchant account to process under.
    pub merchant_account_id: Option<String>,
    /// Subscription plan, for recurring transactions.
    pub plan_id: Option<String>,
    /// Inline card details.
    pub credit_card: Option<CreditCard>,
    /// Inline customer details.
    pub customer: Option<Customer>,
    /// Billing address (`billing` on the wire).
    pub billing: Option<Address>,
    /// Shipping address (`shipping` on the wire).
    pub shipping: Option<Address>,
    /// Processing options.
    pub options: Option<TransactionOptions>,
    /// Marketplace service fee, carried as an attribute of the root node.
    pub service_fee_amount: Option<Amount>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// ISO 4217 currency code.
    pub currency_iso_code: Option<String>,
    /// Authorization code returned by the processor.
    pub processor_authorization_code: Option<String>,
    /// Processor response code (`1000` is approved).
    pub processor_response_code: Option<String>,
    /// Human-readable processor response.
    pub processor_response_text: Option<String>,
    /// Settlement funding information.
    pub disbursement_details: Option<DisbursementDetails>,
}

impl Transaction {
    /// A sale for `amount` with nothing else set.
    #[must_use]
    pub fn sale(amount: Amount) -> Self {
        Self { kind: Some(TransactionType::Sale), amount: Some(amount), ..Self::default() }
    }

    /// A credit for `amount` with nothing else set.
    #[must_use]
    pub fn credit(amount: Amount) -> Self {
        Self { kind: Some(TransactionType::Credit), amount: Some(amount), ..Self::default() }
    }
}

impl XmlDocument for Transaction {
    const ROOT: &'static str = "transaction";
}

impl XmlEncode for Transaction {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_attribute("service-fee-amount", self.service_fee_amount.as_ref())
            .optional_field("id", self.id.as_ref())
            .optional_field("customer-id", self.customer_id.as_ref())
            .optional_field("status", self.status.as_ref())
            .optional_field("escrow-status", self.escrow_status.as_ref())
            .optional_field("type", self.kind.as_ref())
            .optional_field("amount", self.amount.as_ref())
            .optional_field("order-id", self.order_id.as_ref())
            .optional_field("payment-method-token", self.payment_method_token.as_ref())
            .optional_field("merchant-account-id", self.merchant_account_id.as_ref())
            .optional_field("plan-id", self.plan_id.as_ref())
            .optional_child("credit-card", self.credit_card.as_ref())
            .optional_child("customer", self.customer.as_ref())
            .optional_child("billing", self.billing.as_ref())
            .optional_child("shipping", self.shipping.as_ref())
            .optional_child("options", self.options.as_ref())
            .optional_field("created-at", self.created_at.as_ref())
            .optional_field("updated-at", self.updated_at.as_ref())
            .optional_field("currency-iso-code", self.currency_iso_code.as_ref())
            .optional_field(
                "processor-authorization-code",
                self.processor_authorization_code.as_ref(),
            )
            .optional_field("processor-response-code", self.processor_response_code.as_ref())
            .optional_field("processor-response-text", self.processor_response_text.as_ref())
            .optional_child("disbursement-details", self.disbursement_details.as_ref())
    }
}

impl XmlDecode for Transaction {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            id: element.value("id")?,
            customer_id: element.value("customer-id")?,
            status: element.value("status")?,
            escrow_status: element.value("escrow-status")?,
            kind: element.value("type")?,
            amount: element.value("amount")?,
            order_id: element.value("order-id")?,
            payment_method_token: element.value("payment-method-token")?,
            merchant_account_id: element.value("merchant-account-id")?,
            plan_id: element.value("plan-id")?,
            credit_card: element.element("credit-card")?,
            customer: element.element("customer")?,
            billing: element.element("billing")?,
            shipping: element.element("shipping")?,
            options: element.element("options")?,
            service_fee_amount: element.attribute_value("service-fee-amount")?,
            created_at: element.value("created-at")?,
            updated_at: element.value("updated-at")?,
            currency_iso_code: element.value("currency-iso-code")?,
            processor_authorization_code: element.value("processor-authorization-code")?,
            processor_response_code: element.value("processor-response-code")?,
            processor_response_text: element.value("processor-response-text")?,
            disbursement_details: element.element("disbursement-details")?,
        })
    }
}

/// Per-request processing flags for a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransactionOptions {
    /// Capture immediately instead of only authorizing.
    pub submit_for_settlement: Option<bool>,
    /// Vault the inline payment details.
    pub store_in_vault: Option<bool>,
    /// Attach the billing address to the vaulted payment method.
    pub add_billing_address_to_payment_method: Option<bool>,
    /// Vault the shipping address.
    pub store_shipping_address_in_vault: Option<bool>,
    /// Hold the funds in escrow after settlement.
    pub hold_in_escrow: Option<bool>,
}

impl XmlEncode for TransactionOptions {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_field("submit-for-settlement", self.submit_for_settlement.as_ref())
            .optional_field("store-in-vault", self.store_in_vault.as_ref())
            .optional_field(
                "add-billing-address-to-payment-method",
                self.add_billing_address_to_payment_method.as_ref(),
            )
            .optional_field(
                "store-shipping-address-in-vault",
                self.store_shipping_address_in_vault.as_ref(),
            )
            .optional_field("hold-in-escrow", self.hold_in_escrow.as_ref())
    }
}

impl XmlDecode for TransactionOptions {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            submit_for_settlement: element.value("submit-for-settlement")?,
            store_in_vault: element.value("store-in-vault")?,
            add_billing_address_to_payment_method: element
                .value("add-billing-address-to-payment-method")?,
            store_shipping_address_in_vault: element.value("store-shipping-address-in-vault")?,
            hold_in_escrow: element.value("hold-in-escrow")?,
        })
    }
}

/// How a settled transaction was funded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisbursementDetails {
    /// Date the funds were disbursed.
    pub disbursement_date: Option<NaiveDate>,
    /// Amount in the settlement currency.
    pub settlement_amount: Option<Amount>,
    /// Settlement currency.
    pub settlement_currency_iso_code: Option<String>,
    /// Exchange rate applied between presentment and settlement currency.
    pub settlement_currency_exchange_rate: Option<Decimal>,
    /// Whether the funds are being held.
    pub funds_held: Option<bool>,
    /// Whether the disbursement succeeded.
    pub success: Option<bool>,
}

impl XmlEncode for DisbursementDetails {
    fn encode(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
            .optional_field("disbursement-date", self.disbursement_date.as_ref())
            .optional_field("settlement-amount", self.settlement_amount.as_ref())
            .optional_field(
                "settlement-currency-iso-code",
                self.settlement_currency_iso_code.as_ref(),
            )
            .optional_field(
                "settlement-currency-exchange-rate",
                self.settlement_currency_exchange_rate.as_ref(),
            )
            .optional_field("funds-held", self.funds_held.as_ref())
            .optional_field("success", self.success.as_ref())
    }
}

impl XmlDecode for DisbursementDetails {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            disbursement_date: element.value("disbursement-date")?,
            settlement_amount: element.value("settlement-amount")?,
            settlement_currency_iso_code: element.value("settlement-currency-iso-code")?,
            settlement_currency_exchange_rate: element
                .value("settlement-currency-exchange-rate")?,
            funds_held: element.value("funds-held")?,
            success: element.value("success")?,
        })
    }
}

/// One page of a transaction search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionSearchResult {
    /// 1-based page index.
    pub current_page_number: u32,
    /// Maximum number of transactions per page.
    pub page_size: u32,
    /// Matches across all pages.
    pub total_items: u32,
    /// Transactions on this page.
    pub transactions: Vec<Transaction>,
}

impl XmlDocument for TransactionSearchResult {
    const ROOT: &'static str = "credit-card-transactions";
}

impl XmlDecode for TransactionSearchResult {
    fn decode(element: &XmlElement) -> Result<Self> {
        Ok(Self {
            current_page_number: element.required_value("current-page-number")?,
            page_size: element.required_value("page-size")?,
            total_items: element.required_value("total-items")?,
            transactions: element.repeated("transaction")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::GatewayError,
        xml::{from_document, to_document},
    };

    const SETTLED: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<transaction service-fee-amount="0.50">
  <id>4yjxgn</id>
  <status>settled</status>
  <type>sale</type>
  <currency-iso-code>USD</currency-iso-code>
  <amount>7.00</amount>
  <merchant-account-id>acme</merchant-account-id>
  <order-id nil="true"></order-id>
  <created-at type="datetime">2013-10-07T17:26:14Z</created-at>
  <refund-ids type="array"/>
  <processor-authorization-code>YCSBWR</processor-authorization-code>
  <processor-response-code>1000</processor-response-code>
  <processor-response-text>Approved</processor-response-text>
  <tax-exempt type="boolean">false</tax-exempt>
  <disbursement-details>
    <disbursement-date type="date">2013-10-08</disbursement-date>
    <settlement-amount>7.00</settlement-amount>
    <settlement-currency-iso-code>USD</settlement-currency-iso-code>
    <settlement-currency-exchange-rate>1</settlement-currency-exchange-rate>
    <funds-held type="boolean">false</funds-held>
  </disbursement-details>
</transaction>"#;

    #[test]
    fn test_decode_gateway_document() {
        let root = XmlElement::parse(SETTLED).unwrap();
        let tx: Transaction = from_document(&root).unwrap();

        assert_eq!(tx.id.as_deref(), Some("4yjxgn"));
        assert_eq!(tx.status, Some(TransactionStatus::Settled));
        assert_eq!(tx.kind, Some(TransactionType::Sale));
        assert_eq!(tx.amount, Some(Amount::new(700, 2)));
        assert_eq!(tx.service_fee_amount, Some(Amount::new(50, 2)));
        assert_eq!(tx.order_id, None);
        assert_eq!(tx.processor_response_code.as_deref(), Some("1000"));
        assert_eq!(tx.created_at.unwrap().to_rfc3339(), "2013-10-07T17:26:14+00:00");

        let details = tx.disbursement_details.unwrap();
        assert_eq!(details.disbursement_date, NaiveDate::from_ymd_opt(2013, 10, 8));
        assert_eq!(details.settlement_currency_exchange_rate, Some(Decimal::ONE));
        assert_eq!(details.funds_held, Some(false));
        assert_eq!(details.success, None);
    }

    #[test]
    fn test_encode_omits_unset_fields() {
        let tx = Transaction {
            payment_method_token: Some("tok".to_owned()),
            options: Some(TransactionOptions {
                submit_for_settlement: Some(false),
                ..TransactionOptions::default()
            }),
            ..Transaction::sale(Amount::new(1000, 2))
        };
        let element = to_document(&tx);

        let names: Vec<&str> = element.children().iter().map(XmlElement::name).collect();
        assert_eq!(names, ["type", "amount", "payment-method-token", "options"]);
        assert_eq!(element.child("amount").unwrap().text(), "10.00");
        assert!(element.attributes().is_empty());

        let options = element.child("options").unwrap();
        assert_eq!(options.children().len(), 1);
        assert_eq!(options.child("submit-for-settlement").unwrap().text(), "false");
    }

    #[test]
    fn test_service_fee_is_attribute() {
        let tx = Transaction {
            service_fee_amount: Some(Amount::new(100, 2)),
            ..Transaction::sale(Amount::new(1000, 2))
        };
        let element = to_document(&tx);
        assert_eq!(element.attribute("service-fee-amount"), Some("1.00"));
        assert!(element.child("service-fee-amount").is_none());
    }

    #[test]
    fn test_encode_decode_preserves_nested_records() {
        let tx = Transaction {
            billing: Some(Address {
                postal_code: Some("60622".to_owned()),
                ..Address::default()
            }),
            customer: Some(Customer { first_name: Some("Erik".to_owned()), ..Customer::default() }),
            ..Transaction::credit(Amount::new(-250, 2))
        };
        let bytes = to_document(&tx).to_xml_bytes().unwrap();
        let decoded: Transaction = from_document(&XmlElement::parse(&bytes).unwrap()).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let root =
            XmlElement::parse(b"<transaction><status>settlement_pending</status></transaction>")
                .unwrap();
        let tx: Transaction = from_document(&root).unwrap();
        let status = tx.status.unwrap();
        assert_eq!(status, TransactionStatus::Unrecognized("settlement_pending".to_owned()));
        assert_eq!(status.to_string(), "settlement_pending");
    }

    #[test]
    fn test_malformed_amount_fails() {
        let root = XmlElement::parse(b"<transaction><amount>ten</amount></transaction>").unwrap();
        assert!(matches!(from_document::<Transaction>(&root), Err(GatewayError::Decode(_))));
    }

    #[test]
    fn test_search_result_page() {
        let root = XmlElement::parse(
            br#"<credit-card-transactions type="collection">
                  <current-page-number type="integer">1</current-page-number>
                  <page-size type="integer">50</page-size>
                  <total-items type="integer">2</total-items>
                  <transaction><id>a</id></transaction>
                  <transaction><id>b</id></transaction>
                </credit-card-transactions>"#,
        )
        .unwrap();
        let page: TransactionSearchResult = from_document(&root).unwrap();
        assert_eq!(page.page_size, 50);
        assert_eq!(page.total_items, 2);
        let ids: Vec<_> = page.transactions.iter().filter_map(|tx| tx.id.as_deref()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_search_result_requires_paging() {
        let root = XmlElement::parse(b"<credit-card-transactions/>").unwrap();
        assert!(from_document::<TransactionSearchResult>(&root).is_err());
    }
}
