//! Credential providers.
//!
//! The executor asks a [`CredentialProvider`] for the `Authorization` header
//! value on every call. Where the credential material comes from (a config
//! file, the environment, a secret store) is the caller's concern.
//!
//! Secrets are held in [`Zeroizing`] buffers and never appear in `Debug`
//! output. The header value is moved into the
//! [`TransportRequest`](crate::transport::TransportRequest), which zeroizes it
//! on drop. `reqwest` keeps its own copy for the exchange, marked sensitive.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

use crate::error::{GatewayError, Result};

/// Supplies the `Authorization` header for gateway requests.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Returns the full header value, scheme included.
    fn authorization(&self) -> Zeroizing<String>;
}

/// Merchant API key pair, sent as HTTP Basic authentication.
#[derive(Clone)]
pub struct ApiKeys {
    public_key: String,
    private_key: Zeroizing<String>,
}

impl ApiKeys {
    /// Creates a key pair.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if either key is blank or the
    /// public key contains `:`.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Result<Self> {
        let public_key = public_key.into();
        let private_key = Zeroizing::new(private_key.into());

        if public_key.trim().is_empty() {
            return Err(GatewayError::ConfigError("public key must not be empty".to_owned()));
        }
        if public_key.contains(':') {
            return Err(GatewayError::ConfigError("public key must not contain ':'".to_owned()));
        }
        if private_key.trim().is_empty() {
            return Err(GatewayError::ConfigError("private key must not be empty".to_owned()));
        }

        Ok(Self { public_key, private_key })
    }

    /// Public half of the key pair.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeys")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl CredentialProvider for ApiKeys {
    fn authorization(&self) -> Zeroizing<String> {
        let pair = Zeroizing::new(format!("{}:{}", self.public_key, self.private_key.as_str()));
        Zeroizing::new(format!("Basic {}", STANDARD.encode(pair.as_bytes())))
    }
}

/// OAuth access token, sent as a bearer token.
#[derive(Clone)]
pub struct AccessToken {
    token: Zeroizing<String>,
}

impl AccessToken {
    /// Wraps a token.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(GatewayError::ConfigError("access token must not be empty".to_owned()));
        }
        Ok(Self { token })
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken").field("token", &"[REDACTED]").finish()
    }
}

impl CredentialProvider for AccessToken {
    fn authorization(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("Bearer {}", self.token.as_str()))
    }
}
