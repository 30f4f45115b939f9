//! HTTP transport implementation.
//!
//! This module provides HTTP/1.1 and HTTP/2 transport using reqwest.

use std::sync::LazyLock;

use reqwest::{Client, ClientBuilder, header::HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{GatewayError, Result},
    transport::{Transport, TransportRequest, TransportResponse, is_sensitive},
};

/// Client for [`HttpTransport::new`], shared so default transports share
/// one connection pool.
static DEFAULT_HTTP_CLIENT: LazyLock<reqwest::Result<Client>> =
    LazyLock::new(|| client_builder(&HttpConfig::default()).build());

fn client_builder(config: &HttpConfig) -> ClientBuilder {
    let builder = Client::builder()
        .pool_max_idle_per_host(config.max_idle_connections)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .gzip(config.compress);

    match config.http_version {
        HttpVersion::Http1 => builder.http1_only(),
        HttpVersion::Http2 => builder.http2_prior_knowledge(),
        HttpVersion::Auto => builder,
    }
}

/// Validates URL for security constraints.
///
/// Plain HTTP is only accepted for loopback hosts (a local development
/// gateway); everything else must be HTTPS.
fn validate_url(url: &Url) -> Result<()> {
    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(url) => Ok(()),
        "http" => Err(GatewayError::TransportError(
            "plain HTTP is only allowed for localhost".to_owned(),
        )),
        other => Err(GatewayError::TransportError(format!("unsupported URL scheme: {other}"))),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    if name.contains('\r') || name.contains('\n') || name.contains('\0') {
        return Err(GatewayError::TransportError(
            "Invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains('\r') || value.contains('\n') || value.contains('\0') {
        return Err(GatewayError::TransportError(
            "Invalid header value: control characters not allowed".to_owned(),
        ));
    }
    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling, keep-alive, and HTTP/2 multiplexing.
/// Cloning is cheap and shares the connection pool.
///
/// # Examples
///
/// ```
/// use braintree_gateway::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig { http_version: HttpVersion::Http1, ..HttpConfig::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Uses a shared singleton client for connection pooling efficiency.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransportError`] if the TLS backend could not
    /// be initialized.
    pub fn new() -> Result<Self> {
        let client = DEFAULT_HTTP_CLIENT
            .as_ref()
            .map_err(|e| {
                GatewayError::TransportError(format!("failed to build HTTP client: {e}"))
            })?
            .clone();
        Ok(Self { client, http_version: HttpVersion::Auto })
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of bounds or HTTP client
    /// creation fails.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let client = client_builder(config).build().map_err(GatewayError::HttpError)?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(
        skip(self, request),
        fields(method = %request.method, host = request.url.host_str(), path = request.url.path())
    )]
    async fn execute_request(&self, mut request: TransportRequest) -> Result<TransportResponse> {
        validate_url(&request.url)?;

        for (key, value) in &request.headers {
            validate_header(key, value)?;
        }

        let mut builder = self.client.request(request.method.clone(), request.url.clone());
        for (key, value) in &request.headers {
            let mut header = HeaderValue::from_str(value).map_err(|_| {
                GatewayError::TransportError(format!("invalid value for header {key}"))
            })?;
            header.set_sensitive(is_sensitive(key));
            builder = builder.header(key.as_str(), header);
        }
        if let Some(body) = request.body.take() {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();

        let body = response.bytes().await.map_err(GatewayError::HttpError)?.to_vec();
        debug!(status, body_len = body.len(), "exchange complete");

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.execute_request(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
