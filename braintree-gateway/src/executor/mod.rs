//! Authenticated dispatch and response classification.
//!
//! The [`Executor`] is the single place that talks to the gateway. For each
//! [`Request`] it:
//!
//! 1. rejects sandbox-only operations in production without sending anything
//! 2. builds `{base}/merchants/{merchant_id}/{path}`
//! 3. attaches `Authorization`, `Accept`, `Content-Type`, `X-ApiVersion` and
//!    `User-Agent`
//! 4. encodes the body, sends it and classifies the status with the
//!    [operation table](status)
//! 5. returns the raw [`Response`] on success, or a classified
//!    [`GatewayError`]; 422 payloads are decoded into [`ValidationError`]
//!
//! The executor holds only immutable configuration, so one instance is
//! shared across tasks behind an `Arc`.

pub mod api_error;
pub mod status;

use std::{fmt, future::Future, sync::Arc};

use tracing::{Span, info, instrument, warn};
use url::Url;

pub use api_error::{FieldError, ValidationError, ValidationErrors};
pub use status::{Operation, OperationRule, StatusClass, classify};

use crate::{
    config::Environment,
    credentials::CredentialProvider,
    error::{GatewayError, Result},
    transport::{HttpTransport, Method, Transport, TransportRequest},
    xml::{XmlDecode, XmlDocument, XmlElement, XmlEncode, from_document, to_document},
};

/// Gateway API version sent with every request.
pub const API_VERSION: &str = "6";

const XML_CONTENT_TYPE: &str = "application/xml";

/// One gateway call, before authentication and encoding.
#[derive(Debug, Clone)]
pub struct Request {
    operation: Operation,
    method: Method,
    segments: Vec<String>,
    body: Option<XmlElement>,
}

impl Request {
    /// Creates a request for `segments` below the merchant path.
    ///
    /// Segments are percent-encoded when the URL is built, so ids may hold
    /// any character.
    pub fn new<I, S>(operation: Operation, method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation,
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
        }
    }

    /// Attaches a domain object as the body, under its document root.
    #[must_use]
    pub fn with_body<T: XmlEncode + XmlDocument>(mut self, body: &T) -> Self {
        self.body = Some(to_document(body));
        self
    }

    /// Operation this request performs.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path below the merchant, unencoded, for logs.
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Body element, if any.
    #[must_use]
    pub fn body(&self) -> Option<&XmlElement> {
        self.body.as_ref()
    }
}

/// A successful response, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status (always the operation's expected status).
    pub status: u16,
    /// Raw body.
    pub body: Vec<u8>,
}

impl Response {
    /// Decodes the body as `T`, checking the document root.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Decode`] if the body is not a well-formed `T`.
    pub fn decode<T: XmlDecode + XmlDocument>(&self) -> Result<T> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Err(GatewayError::Decode(format!(
                "expected <{}> document, got an empty body",
                T::ROOT
            )));
        }
        from_document(&XmlElement::parse(&self.body)?)
    }
}

/// Sends requests to one merchant account.
pub struct Executor<T = HttpTransport> {
    environment: Environment,
    merchant_id: String,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
    transport: T,
    user_agent: String,
}

impl<T> fmt::Debug for Executor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("environment", &self.environment)
            .field("merchant_id", &self.merchant_id)
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Executor<T> {
    /// Creates an executor for `merchant_id` in `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the merchant id is empty or the
    /// environment URL cannot hold a path.
    pub fn new(
        environment: Environment,
        merchant_id: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        transport: T,
    ) -> Result<Self> {
        let merchant_id = merchant_id.into();
        if merchant_id.trim().is_empty() {
            return Err(GatewayError::ConfigError("merchant_id must not be empty".to_owned()));
        }

        let mut base_url = environment.url()?;
        base_url
            .path_segments_mut()
            .map_err(|()| GatewayError::ConfigError("base URL cannot hold a path".to_owned()))?
            .pop_if_empty()
            .extend(["merchants", merchant_id.as_str()]);

        Ok(Self {
            environment,
            merchant_id,
            base_url,
            credentials,
            transport,
            user_agent: format!("braintree-gateway-rust/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Configured environment.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Configured merchant.
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for a request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the base URL cannot hold a path.
    pub fn url_for(&self, request: &Request) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::ConfigError("base URL cannot hold a path".to_owned()))?
            .extend(&request.segments);
        Ok(url)
    }

    /// Sends `request` and classifies the response.
    ///
    /// # Errors
    ///
    /// See [`GatewayError`]; every failure class maps to one variant.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        self.execute_cancellable(request, std::future::pending()).await
    }

    /// Like [`execute`](Self::execute), but gives up as soon as `cancel`
    /// completes.
    ///
    /// The in-flight exchange is dropped, which aborts the HTTP request.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Cancelled`] if `cancel` finished first.
    #[instrument(
        name = "gateway.execute",
        skip(self, request, cancel),
        fields(
            operation = %request.operation,
            method = %request.method,
            path = %request.path(),
            status = tracing::field::Empty,
        )
    )]
    pub async fn execute_cancellable<C>(&self, request: Request, cancel: C) -> Result<Response>
    where
        C: Future<Output = ()> + Send,
    {
        let operation = request.operation;

        if operation.sandbox_only() && self.environment == Environment::Production {
            warn!("sandbox-only operation rejected in production");
            return Err(GatewayError::EnvironmentRestricted);
        }

        let wire = self.prepare(&request)?;

        let response = tokio::select! {
            result = self.transport.send(wire) => result?,
            () = cancel => {
                warn!("request cancelled by caller");
                return Err(GatewayError::Cancelled);
            }
        };

        Span::current().record("status", response.status);
        let class = classify(operation, response.status);

        match class {
            StatusClass::Success => {
                info!(protocol = self.transport.protocol_name(), "gateway call succeeded");
                Ok(Response { status: response.status, body: response.body })
            }
            StatusClass::ValidationFailure => {
                let root = XmlElement::parse(&response.body)?;
                let error: ValidationError = from_document(&root)?;
                warn!(
                    error_count = error.errors().deep_len(),
                    reason = error.message(),
                    "gateway rejected request"
                );
                Err(GatewayError::Validation(Box::new(error)))
            }
            other => {
                warn!(class = ?other, "gateway call failed");
                Err(match other {
                    StatusClass::AuthenticationFailure => GatewayError::Authentication,
                    StatusClass::AuthorizationFailure => GatewayError::Authorization,
                    StatusClass::NotFound => GatewayError::NotFound,
                    StatusClass::ServerError => GatewayError::server(response.status),
                    _ => GatewayError::invalid_response(response.status),
                })
            }
        }
    }

    fn prepare(&self, request: &Request) -> Result<TransportRequest> {
        let url = self.url_for(request)?;

        // Moved rather than copied: the request zeroizes its header values on drop.
        let mut authorization = self.credentials.authorization();
        let authorization = std::mem::take(&mut *authorization);

        let mut headers = vec![
            ("Authorization".to_owned(), authorization),
            ("Accept".to_owned(), XML_CONTENT_TYPE.to_owned()),
            ("X-ApiVersion".to_owned(), API_VERSION.to_owned()),
            ("User-Agent".to_owned(), self.user_agent.clone()),
        ];

        let body = match &request.body {
            Some(element) => {
                headers.push(("Content-Type".to_owned(), XML_CONTENT_TYPE.to_owned()));
                Some(element.to_xml_bytes()?)
            }
            None => None,
        };

        Ok(TransportRequest { method: request.method.clone(), url, headers, body })
    }
}
