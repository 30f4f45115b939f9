use std::sync::Arc;

use super::check_id;
use crate::{
    error::Result,
    executor::{Executor, Operation, Request},
    models::{Customer, CustomerSearchResult},
    search::SearchQuery,
    transport::{HttpTransport, Method, Transport},
};

const CUSTOMERS: &str = "customers";

/// Vault customers.
#[derive(Debug)]
pub struct CustomerGateway<T = HttpTransport> {
    executor: Arc<Executor<T>>,
}

impl<T: Transport> CustomerGateway<T> {
    pub(crate) fn new(executor: Arc<Executor<T>>) -> Self {
        Self { executor }
    }

    /// Creates a customer, optionally vaulting a card with it.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn create(&self, customer: &Customer) -> Result<Customer> {
        let request =
            Request::new(Operation::Create, Method::POST, [CUSTOMERS]).with_body(customer);
        self.executor.execute(request).await?.decode()
    }

    /// Fetches a customer with its vaulted cards.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn find(&self, id: &str) -> Result<Customer> {
        let id = check_id("customer id", id)?;
        let request = Request::new(Operation::Find, Method::GET, [CUSTOMERS, id]);
        self.executor.execute(request).await?.decode()
    }

    /// Updates the fields set in `customer`.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn update(&self, id: &str, customer: &Customer) -> Result<Customer> {
        let id = check_id("customer id", id)?;
        let request =
            Request::new(Operation::Update, Method::PUT, [CUSTOMERS, id]).with_body(customer);
        self.executor.execute(request).await?.decode()
    }

    /// Deletes a customer and everything vaulted under it.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = check_id("customer id", id)?;
        let request = Request::new(Operation::Delete, Method::DELETE, [CUSTOMERS, id]);
        self.executor.execute(request).await.map(drop)
    }

    /// Runs an advanced search.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn search(&self, query: &SearchQuery) -> Result<CustomerSearchResult> {
        let request = Request::new(Operation::Search, Method::POST, [CUSTOMERS, "advanced_search"])
            .with_body(query);
        self.executor.execute(request).await?.decode()
    }
}
