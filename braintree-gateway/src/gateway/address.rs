use std::sync::Arc;

use super::check_id;
use crate::{
    error::Result,
    executor::{Executor, Operation, Request},
    models::Address,
    transport::{HttpTransport, Method, Transport},
};

const CUSTOMERS: &str = "customers";
const ADDRESSES: &str = "addresses";

/// Addresses, nested under their customer.
#[derive(Debug)]
pub struct AddressGateway<T = HttpTransport> {
    executor: Arc<Executor<T>>,
}

impl<T: Transport> AddressGateway<T> {
    pub(crate) fn new(executor: Arc<Executor<T>>) -> Self {
        Self { executor }
    }

    /// Adds an address to a customer.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn create(&self, customer_id: &str, address: &Address) -> Result<Address> {
        let customer_id = check_id("customer id", customer_id)?;
        let request =
            Request::new(Operation::Create, Method::POST, [CUSTOMERS, customer_id, ADDRESSES])
                .with_body(address);
        self.executor.execute(request).await?.decode()
    }

    /// Fetches one address of a customer.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn find(&self, customer_id: &str, id: &str) -> Result<Address> {
        let request = Request::new(Operation::Find, Method::GET, segments(customer_id, id)?);
        self.executor.execute(request).await?.decode()
    }

    /// Updates the fields set in `address`.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn update(&self, customer_id: &str, id: &str, address: &Address) -> Result<Address> {
        let request = Request::new(Operation::Update, Method::PUT, segments(customer_id, id)?)
            .with_body(address);
        self.executor.execute(request).await?.decode()
    }

    /// Removes an address.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn delete(&self, customer_id: &str, id: &str) -> Result<()> {
        let request = Request::new(Operation::Delete, Method::DELETE, segments(customer_id, id)?);
        self.executor.execute(request).await.map(drop)
    }
}

fn segments<'a>(customer_id: &'a str, id: &'a str) -> Result<[&'a str; 4]> {
    Ok([CUSTOMERS, check_id("customer id", customer_id)?, ADDRESSES, check_id("address id", id)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayError;

    #[test]
    fn test_segments() {
        assert_eq!(segments("c1", "a1").unwrap(), ["customers", "c1", "addresses", "a1"]);
        assert!(matches!(segments("", "a1"), Err(GatewayError::InvalidInput(_))));
        assert!(matches!(segments("c1", " "), Err(GatewayError::InvalidInput(_))));
    }
}
