use std::sync::Arc;

use tracing::instrument;

use super::check_id;
use crate::{
    amount::Amount,
    error::Result,
    executor::{Executor, Operation, Request},
    models::{Transaction, TransactionSearchResult},
    search::SearchQuery,
    transport::{HttpTransport, Method, Transport},
};

const TRANSACTIONS: &str = "transactions";

/// Transaction lifecycle: authorize, settle, void, refund, search.
#[derive(Debug)]
pub struct TransactionGateway<T = HttpTransport> {
    executor: Arc<Executor<T>>,
}

impl<T: Transport> TransactionGateway<T> {
    pub(crate) fn new(executor: Arc<Executor<T>>) -> Self {
        Self { executor }
    }

    /// Creates (authorizes) a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`](crate::GatewayError::Validation)
    /// when the gateway rejects the request; the declined transaction, if
    /// any, is available from the validation error.
    pub async fn create(&self, transaction: &Transaction) -> Result<Transaction> {
        let request =
            Request::new(Operation::Create, Method::POST, [TRANSACTIONS]).with_body(transaction);
        self.executor.execute(request).await?.decode()
    }

    /// Fetches a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`](crate::GatewayError::NotFound) for
    /// an unknown id, or `InvalidInput` for an empty one.
    pub async fn find(&self, id: &str) -> Result<Transaction> {
        let id = check_id("transaction id", id)?;
        let request = Request::new(Operation::Find, Method::GET, [TRANSACTIONS, id]);
        self.executor.execute(request).await?.decode()
    }

    /// Queues an authorized transaction for capture.
    ///
    /// With `amount` set, only that much is captured; otherwise the full
    /// authorized amount is.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    #[instrument(skip(self, amount), fields(partial = amount.is_some()))]
    pub async fn submit_for_settlement(
        &self,
        id: &str,
        amount: Option<Amount>,
    ) -> Result<Transaction> {
        let id = check_id("transaction id", id)?;
        let request = with_amount(
            Request::new(
                Operation::SubmitForSettlement,
                Method::PUT,
                [TRANSACTIONS, id, "submit_for_settlement"],
            ),
            amount,
        );
        self.executor.execute(request).await?.decode()
    }

    /// Voids an authorized or submitted transaction.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn void(&self, id: &str) -> Result<Transaction> {
        let id = check_id("transaction id", id)?;
        let request = Request::new(Operation::Void, Method::PUT, [TRANSACTIONS, id, "void"]);
        self.executor.execute(request).await?.decode()
    }

    /// Forces settlement. Sandbox only.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EnvironmentRestricted`](crate::GatewayError::EnvironmentRestricted)
    /// in production, without contacting the gateway.
    pub async fn settle(&self, id: &str) -> Result<Transaction> {
        let id = check_id("transaction id", id)?;
        let request = Request::new(Operation::Settle, Method::PUT, [TRANSACTIONS, id, "settle"]);
        self.executor.execute(request).await?.decode()
    }

    /// Refunds a settled transaction, fully or by `amount`.
    ///
    /// Returns the new credit transaction.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    #[instrument(skip(self, amount), fields(partial = amount.is_some()))]
    pub async fn refund(&self, id: &str, amount: Option<Amount>) -> Result<Transaction> {
        let id = check_id("transaction id", id)?;
        let request = with_amount(
            Request::new(Operation::Refund, Method::POST, [TRANSACTIONS, id, "refund"]),
            amount,
        );
        self.executor.execute(request).await?.decode()
    }

    /// Runs an advanced search.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`](crate::GatewayError).
    pub async fn search(&self, query: &SearchQuery) -> Result<TransactionSearchResult> {
        let segments = [TRANSACTIONS, "advanced_search"];
        let request = Request::new(Operation::Search, Method::POST, segments).with_body(query);
        self.executor.execute(request).await?.decode()
    }
}

/// Attaches `<transaction><amount>..</amount></transaction>` when set.
fn with_amount(request: Request, amount: Option<Amount>) -> Request {
    match amount {
        Some(amount) => {
            request.with_body(&Transaction { amount: Some(amount), ..Transaction::default() })
        }
        None => request,
    }
}
