//! Resource gateways and the [`Braintree`] entry point.
//!
//! Each gateway is a thin table of routes over one shared [`Executor`]: it
//! picks the [`Operation`](crate::executor::Operation), verb and path, hands
//! the typed body to the executor, and decodes the success payload. Status
//! handling lives entirely in the executor.
//!
//! # Examples
//!
//! ```no_run
//! use braintree_gateway::{Amount, Braintree, GatewayConfig, models::Transaction};
//!
//! # async fn example() -> braintree_gateway::Result<()> {
//! let config = GatewayConfig::from_env()?;
//! let braintree = Braintree::from_config(&config)?;
//!
//! let authorized = braintree
//!     .transaction()
//!     .create(&Transaction {
//!         payment_method_token: Some("card-token".to_owned()),
//!         ..Transaction::sale(Amount::new(1000, 2))
//!     })
//!     .await?;
//!
//! if let Some(id) = authorized.id.as_deref() {
//!     braintree.transaction().submit_for_settlement(id, None).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod address;
mod credit_card;
mod customer;
mod transaction;

use std::{fmt, sync::Arc};

pub use address::AddressGateway;
pub use credit_card::CreditCardGateway;
pub use customer::CustomerGateway;
pub use transaction::TransactionGateway;

use crate::{
    config::GatewayConfig,
    error::{GatewayError, Result},
    executor::Executor,
    transport::{HttpTransport, Transport},
};

/// Client for one merchant account.
///
/// Cloning is cheap; all clones share the same executor.
pub struct Braintree<T = HttpTransport> {
    executor: Arc<Executor<T>>,
}

impl Braintree<HttpTransport> {
    /// Builds a client over the default HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the configuration is invalid or
    /// a credential cannot be resolved, or [`GatewayError::TransportError`] if
    /// the HTTP client cannot be built.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Braintree<T> {
    /// Builds a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the configuration is invalid or
    /// a credential cannot be resolved.
    pub fn with_transport(config: &GatewayConfig, transport: T) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials()?;
        let executor =
            Executor::new(config.environment, &config.merchant_id, credentials, transport)?;
        Ok(Self::new(executor))
    }

    /// Wraps an existing executor.
    #[must_use]
    pub fn new(executor: Executor<T>) -> Self {
        Self { executor: Arc::new(executor) }
    }

    /// Transactions.
    #[must_use]
    pub fn transaction(&self) -> TransactionGateway<T> {
        TransactionGateway::new(Arc::clone(&self.executor))
    }

    /// Vaulted credit cards.
    #[must_use]
    pub fn credit_card(&self) -> CreditCardGateway<T> {
        CreditCardGateway::new(Arc::clone(&self.executor))
    }

    /// Vault customers.
    #[must_use]
    pub fn customer(&self) -> CustomerGateway<T> {
        CustomerGateway::new(Arc::clone(&self.executor))
    }

    /// Customer addresses.
    #[must_use]
    pub fn address(&self) -> AddressGateway<T> {
        AddressGateway::new(Arc::clone(&self.executor))
    }

    /// Shared executor.
    #[must_use]
    pub fn executor(&self) -> &Arc<Executor<T>> {
        &self.executor
    }
}

impl<T> Clone for Braintree<T> {
    fn clone(&self) -> Self {
        Self { executor: Arc::clone(&self.executor) }
    }
}

impl<T> fmt::Debug for Braintree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Braintree").field("executor", &self.executor).finish()
    }
}

/// Rejects ids that would collapse or escape their path segment.
pub(crate) fn check_id<'a>(kind: &str, id: &'a str) -> Result<&'a str> {
    match id.trim() {
        "" => Err(GatewayError::InvalidInput(format!("{kind} must not be empty"))),
        "." | ".." => Err(GatewayError::InvalidInput(format!("{kind} {id:?} is not a valid id"))),
        _ => Ok(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_id() {
        assert_eq!(check_id("transaction id", "abc123").unwrap(), "abc123");
        assert!(matches!(check_id("transaction id", ""), Err(GatewayError::InvalidInput(_))));
        assert!(matches!(check_id("transaction id", "   "), Err(GatewayError::InvalidInput(_))));
        assert!(matches!(check_id("token", ".."), Err(GatewayError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_id_message() {
        let err = check_id("customer id", "").unwrap_err();
        assert!(err.to_string().contains("customer id must not be empty"));
    }
}
