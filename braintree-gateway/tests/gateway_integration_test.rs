//! End-to-end tests of the resource gateways over a scripted transport.

mod support;

use std::time::Duration;

use braintree_gateway::{
    Amount, GatewayError, SearchQuery,
    executor::{Operation, Request},
    models::{Address, CreditCard, Customer, Transaction, TransactionStatus},
    transport::Method,
};
use support::{Reply, client, transport};

const AUTHORIZED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<transaction>
  <id>tx_1</id>
  <status>authorized</status>
  <type>sale</type>
  <amount>20.00</amount>
  <currency-iso-code>USD</currency-iso-code>
  <created-at type="datetime">2024-03-01T10:00:00Z</created-at>
</transaction>"#;

const SUBMITTED: &str = r"<transaction>
  <id>tx_1</id>
  <status>submitted_for_settlement</status>
  <amount>10.00</amount>
</transaction>";

const VOIDED: &str = r"<transaction>
  <id>tx_1</id>
  <status>voided</status>
  <amount>10.00</amount>
</transaction>";

#[tokio::test]
async fn test_authorize_submit_void_flow() {
    let braintree = client(
        "sandbox",
        [Reply::ok(201, AUTHORIZED), Reply::ok(200, SUBMITTED), Reply::ok(200, VOIDED)],
    );
    let transactions = braintree.transaction();

    let sale = Transaction {
        payment_method_token: Some("card_1".to_owned()),
        ..Transaction::sale(Amount::new(2000, 2))
    };
    let authorized = transactions.create(&sale).await.expect("create should succeed");
    assert_eq!(authorized.status, Some(TransactionStatus::Authorized));
    let id = authorized.id.expect("gateway assigns an id");

    let submitted = transactions
        .submit_for_settlement(&id, Some(Amount::new(1000, 2)))
        .await
        .expect("submit should succeed");
    assert_eq!(submitted.status, Some(TransactionStatus::SubmittedForSettlement));
    let amount = submitted.amount.expect("amount is echoed");
    assert_eq!(amount, Amount::new(1000, 2));
    assert_eq!(amount.to_string(), "10.00");

    let voided = transactions.void(&id).await.expect("void should succeed");
    assert_eq!(voided.status, Some(TransactionStatus::Voided));

    let requests = transport(&braintree).requests();
    let routes: Vec<(Method, String)> =
        requests.iter().map(|r| (r.method.clone(), r.url.path().to_owned())).collect();
    assert_eq!(
        routes,
        [
            (Method::POST, "/merchants/merchant_1/transactions".to_owned()),
            (
                Method::PUT,
                "/merchants/merchant_1/transactions/tx_1/submit_for_settlement".to_owned(),
            ),
            (Method::PUT, "/merchants/merchant_1/transactions/tx_1/void".to_owned()),
        ]
    );

    let create_body = String::from_utf8(requests[0].body.clone().unwrap()).unwrap();
    assert!(create_body.contains("<amount>20.00</amount>"));
    assert!(create_body.contains("<type>sale</type>"));
    assert!(create_body.contains("<payment-method-token>card_1</payment-method-token>"));
    assert!(!create_body.contains("<id>"), "unset fields stay off the wire");
    let submit_body = String::from_utf8(requests[1].body.clone().unwrap()).unwrap();
    assert!(submit_body.contains("<transaction><amount>10.00</amount></transaction>"));
    assert!(requests[2].body.is_none());
}

#[tokio::test]
async fn test_full_settlement_sends_no_body() {
    let braintree = client("sandbox", [Reply::ok(200, SUBMITTED)]);
    braintree
        .transaction()
        .submit_for_settlement("tx_1", None)
        .await
        .expect("submit should succeed");

    let requests = transport(&braintree).requests();
    assert!(requests[0].body.is_none());
    assert!(requests[0].header("content-type").is_none());
}

#[tokio::test]
async fn test_validation_error_message() {
    let payload = r#"<api-error-response>
      <errors>
        <errors type="array"/>
        <transaction>
          <errors type="array">
            <error>
              <code>81502</code>
              <attribute type="symbol">amount</attribute>
              <message>Amount is required.</message>
            </error>
          </errors>
        </transaction>
      </errors>
      <message>Amount is required.</message>
    </api-error-response>"#;
    let braintree = client("sandbox", [Reply::ok(422, payload)]);

    let err = braintree.transaction().create(&Transaction::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "Amount is required.");
    assert_eq!(err.status(), Some(422));

    let validation = err.validation().expect("422 carries structured errors");
    let field = validation
        .errors()
        .for_object("transaction")
        .and_then(|tx| tx.on("amount").next())
        .expect("amount error is present");
    assert_eq!(field.code, "81502");
}

#[tokio::test]
async fn test_not_found() {
    let braintree = client("sandbox", [Reply::ok(404, "")]);
    let err = braintree.transaction().find("missing").await.unwrap_err();
    assert!(matches!(err, GatewayError::NotFound));
    assert_eq!(err.to_string(), "Not Found (404)");
}

#[tokio::test]
async fn test_settle_is_blocked_in_production() {
    let braintree = client("production", [Reply::ok(200, VOIDED)]);
    let err = braintree.transaction().settle("tx_1").await.unwrap_err();

    assert!(matches!(err, GatewayError::EnvironmentRestricted));
    assert_eq!(err.to_string(), "Operation not allowed in production environment");
    assert_eq!(transport(&braintree).calls(), 0);
}

#[tokio::test]
async fn test_settle_runs_in_sandbox() {
    let reply = Reply::ok(200, r"<transaction><status>settled</status></transaction>");
    let braintree = client("sandbox", [reply]);
    let settled = braintree.transaction().settle("tx_1").await.expect("settle should succeed");
    assert_eq!(settled.status, Some(TransactionStatus::Settled));
    assert_eq!(transport(&braintree).calls(), 1);
}

#[tokio::test]
async fn test_undocumented_success_status_is_an_error() {
    let braintree = client("sandbox", [Reply::ok(200, AUTHORIZED)]);
    let err = braintree.transaction().create(&Transaction::default()).await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidResponse { status: 200, .. }));
    assert_eq!(err.to_string(), "OK (200)");
}

#[tokio::test]
async fn test_server_and_auth_failures() {
    let braintree = client(
        "sandbox",
        [Reply::ok(503, ""), Reply::ok(401, ""), Reply::ok(403, "")],
    );
    let transactions = braintree.transaction();

    let err = transactions.find("tx_1").await.unwrap_err();
    assert_eq!(err.to_string(), "Service Unavailable (503)");
    assert!(matches!(transactions.find("tx_1").await, Err(GatewayError::Authentication)));
    assert!(matches!(transactions.find("tx_1").await, Err(GatewayError::Authorization)));
}

#[tokio::test]
async fn test_transport_failure_is_surfaced() {
    let braintree = client("sandbox", [Reply::Fail("connection reset".to_owned())]);
    let err = braintree.transaction().find("tx_1").await.unwrap_err();
    assert!(matches!(err, GatewayError::TransportError(ref m) if m == "connection reset"));
}

#[tokio::test]
async fn test_refund_creates_credit() {
    let braintree = client(
        "sandbox",
        [Reply::ok(
            201,
            r"<transaction><id>tx_2</id><type>credit</type><amount>2.50</amount></transaction>",
        )],
    );
    let credit = braintree
        .transaction()
        .refund("tx_1", Some(Amount::new(250, 2)))
        .await
        .expect("refund should succeed");
    assert_eq!(credit.id.as_deref(), Some("tx_2"));

    let requests = transport(&braintree).requests();
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert!(request.url.path().ends_with("/transactions/tx_1/refund"));
}

#[tokio::test]
async fn test_transaction_search() {
    let results = r#"<credit-card-transactions type="collection">
      <current-page-number type="integer">1</current-page-number>
      <page-size type="integer">50</page-size>
      <total-items type="integer">1</total-items>
      <transaction><id>tx_1</id><status>settled</status></transaction>
    </credit-card-transactions>"#;
    let braintree = client("sandbox", [Reply::ok(200, results)]);

    let mut query = SearchQuery::new();
    query.add_text_field("customer-first-name").is("Ann");
    query.add_range_field("amount").between(Amount::new(500, 2), Amount::new(2000, 2));
    query.add_boolean_field("refund").is(false);
    query.add_text_field("order-id");

    let page = braintree.transaction().search(&query).await.expect("search should succeed");
    assert_eq!(page.total_items, 1);
    assert_eq!(page.transactions[0].id.as_deref(), Some("tx_1"));

    let body = transport(&braintree).last_body();
    assert!(body.contains(
        "<search><customer-first-name><is>Ann</is></customer-first-name>\
         <amount><min>5.00</min><max>20.00</max></amount>\
         <refund>false</refund></search>"
    ));
    let requests = transport(&braintree).requests();
    assert!(requests[0].url.path().ends_with("/transactions/advanced_search"));
}

#[tokio::test]
async fn test_cancellation() {
    let braintree = client("sandbox", [Reply::Hang]);
    let request = Request::new(Operation::Find, Method::GET, ["transactions", "tx_1"]);

    let err = braintree
        .executor()
        .execute_cancellable(request, tokio::time::sleep(Duration::from_millis(20)))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Cancelled));
    assert_eq!(transport(&braintree).calls(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_executor() {
    let replies =
        (0..8).map(|i| Reply::Respond(200, format!("<transaction><id>tx_{i}</id></transaction>")));
    let braintree = client("sandbox", replies);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let braintree = braintree.clone();
            tokio::spawn(async move { braintree.transaction().find(&format!("tx_{i}")).await })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task should not panic").expect("find should succeed");
    }
    assert_eq!(transport(&braintree).calls(), 8);
}

#[tokio::test]
async fn test_headers() {
    let braintree = client("sandbox", [Reply::ok(200, VOIDED)]);
    braintree.transaction().find("tx_1").await.expect("find should succeed");

    let requests = transport(&braintree).requests();
    let request = &requests[0];
    assert_eq!(request.header("authorization"), Some("Basic cHViOnByaXY="));
    assert_eq!(request.header("accept"), Some("application/xml"));
    assert_eq!(request.header("x-apiversion"), Some("6"));
    assert_eq!(
        request.url.as_str(),
        "https://api.sandbox.braintreegateway.com/merchants/merchant_1/transactions/tx_1"
    );
}

#[tokio::test]
async fn test_empty_id_is_rejected_locally() {
    let braintree = client("sandbox", []);
    let err = braintree.transaction().void("").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidInput(_)));
    assert!(err.is_local());
    assert_eq!(transport(&braintree).calls(), 0);
}

#[tokio::test]
async fn test_ids_are_percent_encoded() {
    let braintree = client("sandbox", [Reply::ok(200, "<customer><id>a/b</id></customer>")]);
    braintree.customer().find("a/b").await.expect("find should succeed");
    assert!(transport(&braintree).requests()[0].url.path().ends_with("/customers/a%2Fb"));
}

#[tokio::test]
async fn test_vault_routes() {
    let braintree = client(
        "sandbox",
        [
            Reply::ok(201, "<customer><id>c1</id><first-name>Ann</first-name></customer>"),
            Reply::ok(201, "<credit-card><token>card_1</token><last-4>1111</last-4></credit-card>"),
            Reply::ok(200, "<address><id>a1</id><postal-code>60622</postal-code></address>"),
            Reply::ok(200, ""),
            Reply::ok(
                200,
                r#"<customers type="array"><customer><id>c1</id></customer></customers>"#,
            ),
        ],
    );

    let customer = braintree
        .customer()
        .create(&Customer { first_name: Some("Ann".to_owned()), ..Customer::default() })
        .await
        .expect("customer create");
    assert_eq!(customer.id.as_deref(), Some("c1"));

    let card = braintree
        .credit_card()
        .create(&CreditCard {
            customer_id: Some("c1".to_owned()),
            number: Some("4111111111111111".to_owned()),
            ..CreditCard::default()
        })
        .await
        .expect("card create");
    assert_eq!(card.last_4.as_deref(), Some("1111"));

    let address = braintree
        .address()
        .update(
            "c1",
            "a1",
            &Address { postal_code: Some("60622".to_owned()), ..Address::default() },
        )
        .await
        .expect("address update");
    assert_eq!(address.postal_code.as_deref(), Some("60622"));

    braintree.credit_card().delete("card_1").await.expect("card delete");

    let mut query = SearchQuery::new();
    query.add_text_field("id").is("c1");
    let found = braintree.customer().search(&query).await.expect("customer search");
    assert_eq!(found.customers.len(), 1);

    let routes: Vec<(Method, String)> = transport(&braintree)
        .requests()
        .iter()
        .map(|r| {
            let path = r.url.path().trim_start_matches("/merchants/merchant_1/");
            (r.method.clone(), path.to_owned())
        })
        .collect();
    assert_eq!(
        routes,
        [
            (Method::POST, "customers".to_owned()),
            (Method::POST, "payment_methods".to_owned()),
            (Method::PUT, "customers/c1/addresses/a1".to_owned()),
            (Method::DELETE, "payment_methods/card_1".to_owned()),
            (Method::POST, "customers/advanced_search".to_owned()),
        ]
    );
}
