//! Transport abstraction.
//!
//! The [`Executor`](crate::executor::Executor) builds a fully-formed
//! [`TransportRequest`] (method, URL, headers, body) and hands it to a
//! [`Transport`], which performs the exchange and returns the status, headers
//! and raw body. Status classification is not the transport's job: every
//! status that came back over the wire is a successful exchange here.
//!
//! [`HttpTransport`] is the production implementation over `reqwest`.
//! Tests substitute their own implementation to count or script calls.
//!
//! # Examples
//!
//! ```rust,no_run
//! use braintree_gateway::transport::{HttpTransport, Method, Transport, TransportRequest, Url};
//!
//! # async fn example() -> braintree_gateway::error::Result<()> {
//! let transport = HttpTransport::new()?;
//! let request = TransportRequest {
//!     method: Method::GET,
//!     url: Url::parse("https://api.sandbox.braintreegateway.com/merchants/m1/transactions/abc")
//!         .expect("valid URL"),
//!     headers: vec![("Accept".to_owned(), "application/xml".to_owned())],
//!     body: None,
//! };
//!
//! let response = transport.send(request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use std::fmt;

pub use reqwest::Method;
pub use url::Url;
use zeroize::Zeroize;

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// A request ready to go on the wire.
///
/// Header values carry the credential, so they are zeroized when the request
/// is dropped and `Authorization` is redacted from `Debug`.
#[derive(Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: Url,
    /// Header name/value pairs, in order.
    pub headers: Vec<(String, String)>,
    /// Encoded body, if the request carries one.
    pub body: Option<Vec<u8>>,
}

impl TransportRequest {
    /// Looks up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn scrub(&mut self) {
        for (_, value) in &mut self.headers {
            value.zeroize();
        }
    }
}

impl Drop for TransportRequest {
    fn drop(&mut self) {
        self.scrub();
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                let shown = if is_sensitive(key) { "[REDACTED]" } else { value.as_str() };
                (key.as_str(), shown)
            })
            .collect();
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// Headers whose values are credentials.
pub(crate) fn is_sensitive(name: &str) -> bool {
    name.eq_ignore_ascii_case("authorization")
}

/// Response from a transport exchange.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

/// Performs one HTTP exchange.
///
/// Implementations must be safe to share across tasks: the executor holds a
/// single transport and calls it concurrently.
///
/// # Errors
///
/// An implementation returns an error only when no HTTP response was
/// obtained (connection, TLS, timeout, or a request it refuses to send).
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns error if the request is refused locally or the exchange fails.
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;

    /// Returns the protocol name for logging.
    ///
    /// Examples: "http/1.1", "http/2", "mock"
    fn protocol_name(&self) -> &'static str;
}
