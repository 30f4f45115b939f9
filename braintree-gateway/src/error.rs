//! Error types for the Braintree gateway client.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose error
//! type is [`GatewayError`]. Classification of HTTP statuses happens in one
//! place (the [`Executor`](crate::executor::Executor)); resource gateways never
//! reinterpret status codes.
//!
//! # Error Categories
//!
//! - **Network** ([`GatewayError::HttpError`], [`GatewayError::TransportError`]):
//!   the round trip itself failed
//! - **Wire** ([`GatewayError::Decode`], [`GatewayError::InvalidResponse`]):
//!   the remote answered with something this client cannot use
//! - **Remote rejection** ([`GatewayError::Validation`], [`GatewayError::NotFound`],
//!   [`GatewayError::Authentication`], [`GatewayError::Authorization`],
//!   [`GatewayError::Server`])
//! - **Local preconditions** ([`GatewayError::EnvironmentRestricted`],
//!   [`GatewayError::InvalidInput`], [`GatewayError::InvalidSearchValue`],
//!   [`GatewayError::ConfigError`]): no request was sent
//! - **Cancellation** ([`GatewayError::Cancelled`])
//!
//! None of these are retried automatically. Payment operations must not be
//! re-issued silently, so retry policy belongs to the caller.
//!
//! # Examples
//!
//! ```
//! use braintree_gateway::error::{GatewayError, Result};
//!
//! fn require_id(id: &str) -> Result<&str> {
//!     if id.is_empty() {
//!         return Err(GatewayError::InvalidInput("id must not be empty".to_owned()));
//!     }
//!     Ok(id)
//! }
//!
//! assert!(require_id("").is_err());
//! ```

use thiserror::Error;

use crate::executor::ValidationError;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Message used when a sandbox-only operation is attempted in production.
pub const ENVIRONMENT_RESTRICTED_MESSAGE: &str = "Operation not allowed in production environment";

/// Errors that can occur while talking to the Braintree gateway.
///
/// Status-derived variants display as `"{reason phrase} ({status})"`, e.g.
/// `"Not Found (404)"`. [`Validation`](Self::Validation) displays the flattened
/// primary message of the remote error payload so callers can keep matching on
/// strings while the structured detail stays available.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed below the protocol level.
    ///
    /// Wraps [`reqwest::Error`] verbatim: DNS, connect, TLS and timeout
    /// failures all end up here.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The transport refused to send the request or a custom transport failed.
    #[error("transport error: {0}")]
    TransportError(String),

    /// The response body was not the well-formed document the operation expects.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The status code is not documented for the operation.
    #[error("{reason} ({status})")]
    InvalidResponse {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
    },

    /// The gateway rejected the request with per-field validation errors (422).
    #[error("{0}")]
    Validation(Box<ValidationError>),

    /// The requested resource does not exist (404).
    #[error("Not Found (404)")]
    NotFound,

    /// Credentials were rejected (401).
    #[error("Unauthorized (401)")]
    Authentication,

    /// Credentials are valid but lack permission for the operation (403).
    #[error("Forbidden (403)")]
    Authorization,

    /// The gateway failed internally (5xx).
    #[error("{reason} ({status})")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Reason phrase for the status.
        reason: String,
    },

    /// The operation is only allowed in the sandbox; no request was sent.
    #[error("{}", ENVIRONMENT_RESTRICTED_MESSAGE)]
    EnvironmentRestricted,

    /// The caller cancelled the request while it was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// A caller-supplied argument failed local validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A multi-value search predicate was given a value outside its valid set.
    #[error("invalid value '{value}' for search field '{field}'")]
    InvalidSearchValue {
        /// Search field name.
        field: String,
        /// Rejected value.
        value: String,
    },

    /// Gateway configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl GatewayError {
    /// Builds the error for a status code outside the operation's documented set.
    pub fn invalid_response(status: u16) -> Self {
        Self::InvalidResponse { status, reason: reason_phrase(status) }
    }

    /// Builds the error for a 5xx status.
    pub fn server(status: u16) -> Self {
        Self::Server { status, reason: reason_phrase(status) }
    }

    /// Returns the HTTP status the error was classified from, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Validation(_) => Some(422),
            Self::NotFound => Some(404),
            Self::Authentication => Some(401),
            Self::Authorization => Some(403),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the structured validation detail for a 422 rejection.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the request never left the process.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::EnvironmentRestricted
                | Self::InvalidInput(_)
                | Self::InvalidSearchValue { .. }
                | Self::ConfigError(_)
        )
    }
}

/// Returns the canonical reason phrase for a status, or `"Unknown Status"`.
pub(crate) fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        assert_eq!(GatewayError::NotFound.to_string(), "Not Found (404)");
    }

    #[test]
    fn test_environment_restricted_display() {
        assert_eq!(
            GatewayError::EnvironmentRestricted.to_string(),
            "Operation not allowed in production environment"
        );
    }

    #[test]
    fn test_server_error_display() {
        assert_eq!(GatewayError::server(500).to_string(), "Internal Server Error (500)");
        assert_eq!(GatewayError::server(503).to_string(), "Service Unavailable (503)");
    }

    #[test]
    fn test_invalid_response_display() {
        assert_eq!(GatewayError::invalid_response(302).to_string(), "Found (302)");
        assert_eq!(GatewayError::invalid_response(299).to_string(), "Unknown Status (299)");
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(GatewayError::NotFound.status(), Some(404));
        assert_eq!(GatewayError::Authentication.status(), Some(401));
        assert_eq!(GatewayError::Authorization.status(), Some(403));
        assert_eq!(GatewayError::server(502).status(), Some(502));
        assert_eq!(GatewayError::Cancelled.status(), None);
    }

    #[test]
    fn test_local_errors() {
        assert!(GatewayError::EnvironmentRestricted.is_local());
        assert!(GatewayError::InvalidInput("x".to_owned()).is_local());
        assert!(!GatewayError::NotFound.is_local());
        assert!(!GatewayError::Cancelled.is_local());
    }

    #[test]
    fn test_invalid_search_value_display() {
        let error = GatewayError::InvalidSearchValue {
            field: "status".to_owned(),
            value: "bogus".to_owned(),
        };
        assert_eq!(error.to_string(), "invalid value 'bogus' for search field 'status'");
    }
}
