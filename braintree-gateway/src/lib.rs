//! Braintree Gateway: an async client for the Braintree payment API.
//!
//! The crate turns typed domain objects into authenticated XML requests,
//! dispatches them, and hands back either a typed result or a classified
//! [`GatewayError`]. It provides:
//!
//! - **Exact amounts**: [`Amount`] keeps magnitude and scale, so `10.00`
//!   goes out as `10.00`, never as a rounded float
//! - **XML codec**: a small element tree with explicit presence through
//!   `Option`, dash-case node names and `type` / `nil` annotations
//! - **Search**: [`SearchQuery`] builds advanced-search documents from text,
//!   range, multi-value and boolean predicates
//! - **One dispatch point**: the [`Executor`] owns authentication, the
//!   per-operation success status table, the production gate for
//!   sandbox-only calls, and 422 error decoding
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Braintree facade                             │
//! │  transaction() credit_card() customer() ...  │
//! └───────────────┬──────────────────────────────┘
//!                 │ Request { operation, verb, path, body }
//! ┌───────────────▼──────────────────────────────┐
//! │ Executor                                     │
//! │  gate → URL → headers → encode → classify    │
//! └───────────────┬──────────────────────────────┘
//!                 │ TransportRequest
//! ┌───────────────▼──────────────────────────────┐
//! │ Transport (HttpTransport over reqwest)       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use braintree_gateway::{Amount, Braintree, GatewayConfig, GatewayError, models::Transaction};
//!
//! # async fn example() -> braintree_gateway::Result<()> {
//! let config = GatewayConfig::from_file("braintree.toml")?;
//! let braintree = Braintree::from_config(&config)?;
//!
//! let sale = Transaction {
//!     payment_method_token: Some("card-token".to_owned()),
//!     ..Transaction::sale(Amount::new(1000, 2))
//! };
//!
//! match braintree.transaction().create(&sale).await {
//!     Ok(tx) => println!("authorized {:?}", tx.id),
//!     Err(GatewayError::Validation(error)) => eprintln!("rejected: {error}"),
//!     Err(other) => return Err(other),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! environment = "sandbox"
//! merchant_id = "your_merchant_id"
//!
//! [auth]
//! type = "api_keys"
//! public_key = "your_public_key"
//! private_key_env = "BRAINTREE_PRIVATE_KEY"
//!
//! [http]
//! timeout_secs = 30
//! ```
//!
//! # Error Handling
//!
//! Every failure is a [`GatewayError`]. Status-derived errors display as
//! `"{reason} ({status})"`; validation errors display their primary message
//! and carry the full error tree. Nothing is retried.

#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod amount;
pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod models;
pub mod search;
pub mod transport;
pub mod xml;

pub use amount::Amount;
pub use config::{Environment, GatewayConfig};
pub use credentials::{AccessToken, ApiKeys, CredentialProvider};
pub use error::{GatewayError, Result};
pub use executor::{Executor, Operation, ValidationError};
pub use gateway::Braintree;
pub use search::SearchQuery;
pub use transport::{HttpTransport, Transport};
