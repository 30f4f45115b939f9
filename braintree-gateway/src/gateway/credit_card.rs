use std::sync::Arc;

use super::check_id;
use crate::{
    error::Result,
    executor::{Executor, Operation, Request},
    models::CreditCard,
    transport::{HttpTransport, Method, Transport},
};

const PAYMENT_METHODS: &str = "payment_methods";

/// Vaulted credit cards, addressed by token.
#[derive(Debug)]
pub struct CreditCardGateway<T = HttpTransport> {
    executor: Arc<Executor<T>>,
}

impl<T: Transport> CreditCardGateway<T> {
    pub(crate) fn new(executor: Arc<Executor<T>>) -> Self {
        Self { executor }
    }

    /// Vaults a card for an existing customer.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn create(&self, card: &CreditCard) -> Result<CreditCard> {
        let request =
            Request::new(Operation::Create, Method::POST, [PAYMENT_METHODS]).with_body(card);
        self.executor.execute(request).await?.decode()
    }

    /// Fetches a card by token.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn find(&self, token: &str) -> Result<CreditCard> {
        let token = check_id("payment method token", token)?;
        let request = Request::new(Operation::Find, Method::GET, [PAYMENT_METHODS, token]);
        self.executor.execute(request).await?.decode()
    }

    /// Updates the fields set in `card`.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn update(&self, token: &str, card: &CreditCard) -> Result<CreditCard> {
        let token = check_id("payment method token", token)?;
        let request =
            Request::new(Operation::Update, Method::PUT, [PAYMENT_METHODS, token]).with_body(card);
        self.executor.execute(request).await?.decode()
    }

    /// Removes a card from the vault.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn delete(&self, token: &str) -> Result<()> {
        let token = check_id("payment method token", token)?;
        let request = Request::new(Operation::Delete, Method::DELETE, [PAYMENT_METHODS, token]);
        self.executor.execute(request).await.map(drop)
    }
}
