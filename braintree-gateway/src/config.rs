//! Gateway configuration.
//!
//! A [`GatewayConfig`] names the target [`Environment`], the merchant, the
//! credentials and the HTTP client settings. It loads from TOML or from the
//! process environment.
//!
//! # Examples
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
//! timeout_secs = 60
//! ```

use std::{fmt, path::Path, str::FromStr, sync::Arc};

use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::{
    credentials::{AccessToken, ApiKeys, CredentialProvider},
    error::{GatewayError, Result},
    transport::HttpConfig,
};

/// Environment variable selecting the environment.
pub const ENV_ENVIRONMENT: &str = "BRAINTREE_ENVIRONMENT";
/// Environment variable holding the merchant id.
pub const ENV_MERCHANT_ID: &str = "BRAINTREE_MERCHANT_ID";
/// Environment variable holding the public key.
pub const ENV_PUBLIC_KEY: &str = "BRAINTREE_PUBLIC_KEY";
/// Environment variable holding the private key.
pub const ENV_PRIVATE_KEY: &str = "BRAINTREE_PRIVATE_KEY";

/// Deployment target of the remote gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// A gateway running on the local machine.
    Development,
    /// The sandbox, where test-only operations such as settle are allowed.
    Sandbox,
    /// Live processing.
    Production,
}

impl Environment {
    /// Scheme, host and port of the gateway.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost:3000",
            Self::Sandbox => "https://api.sandbox.braintreegateway.com:443",
            Self::Production => "https://api.braintreegateway.com:443",
        }
    }

    /// Lowercase name, as written in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    /// Parsed [`base_url`](Self::base_url).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the URL does not parse.
    pub fn url(self) -> Result<Url> {
        Url::parse(self.base_url())
            .map_err(|e| GatewayError::ConfigError(format!("invalid base URL for {self}: {e}")))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(GatewayError::ConfigError(format!(
                "unknown environment '{other}' (expected development, sandbox or production)"
            ))),
        }
    }
}

/// Root gateway configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Target environment.
    pub environment: Environment,

    /// Merchant identifier, the `{merchant_id}` in every request path.
    pub merchant_id: String,

    /// Credential source.
    pub auth: AuthConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

impl GatewayConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if parsing or validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| GatewayError::ConfigError(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if the file cannot be read or
    /// does not hold a valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GatewayError::ConfigError(format!(
                "cannot read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Builds a configuration from the `BRAINTREE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if a variable is missing or holds
    /// an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from variables supplied by `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| GatewayError::ConfigError(format!("{name} is not set")))
        };

        let config = Self {
            environment: require(ENV_ENVIRONMENT)?.parse()?,
            merchant_id: require(ENV_MERCHANT_ID)?,
            auth: AuthConfig::ApiKeys {
                public_key: Some(require(ENV_PUBLIC_KEY)?),
                public_key_env: None,
                private_key: Some(Zeroizing::new(require(ENV_PRIVATE_KEY)?)),
                private_key_env: None,
            },
            http: HttpConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        validate_merchant_id(&self.merchant_id)?;
        self.auth.validate()?;
        self.http.validate()
    }

    /// Resolves the configured credentials, reading `*_env` variables.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if a referenced variable is unset
    /// or the credential material is invalid.
    pub fn credentials(&self) -> Result<Arc<dyn CredentialProvider>> {
        self.auth.resolve(|name| std::env::var(name).ok())
    }
}

/// Where the credentials come from.
///
/// Literal values and environment variable names are alternatives for each
/// secret; exactly one of them must be given.
#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// Public/private API key pair (HTTP Basic).
    ApiKeys {
        /// Literal public key.
        #[serde(default)]
        public_key: Option<String>,
        /// Variable holding the public key.
        #[serde(default)]
        public_key_env: Option<String>,
        /// Literal private key.
        #[serde(default, deserialize_with = "deserialize_secret")]
        private_key: Option<Zeroizing<String>>,
        /// Variable holding the private key.
        #[serde(default)]
        private_key_env: Option<String>,
    },
    /// OAuth access token (Bearer).
    AccessToken {
        /// Literal token.
        #[serde(default, deserialize_with = "deserialize_secret")]
        token: Option<Zeroizing<String>>,
        /// Variable holding the token.
        #[serde(default)]
        token_env: Option<String>,
    },
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |secret: &Option<Zeroizing<String>>| secret.as_ref().map(|_| "[REDACTED]");
        match self {
            Self::ApiKeys { public_key, public_key_env, private_key, private_key_env } => f
                .debug_struct("ApiKeys")
                .field("public_key", public_key)
                .field("public_key_env", public_key_env)
                .field("private_key", &redacted(private_key))
                .field("private_key_env", private_key_env)
                .finish(),
            Self::AccessToken { token, token_env } => f
                .debug_struct("AccessToken")
                .field("token", &redacted(token))
                .field("token_env", token_env)
                .finish(),
        }
    }
}

impl AuthConfig {
    /// Checks that every secret has exactly one source and that variable
    /// names are well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if any value is invalid.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::ApiKeys { public_key, public_key_env, private_key, private_key_env } => {
                check_source("public_key", public_key.is_some(), public_key_env.as_deref())?;
                check_source("private_key", private_key.is_some(), private_key_env.as_deref())
            }
            Self::AccessToken { token, token_env } => {
                check_source("token", token.is_some(), token_env.as_deref())
            }
        }
    }

    /// Builds the credential provider, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ConfigError`] if a referenced variable is unset
    /// or the credential material is invalid.
    pub fn resolve(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Arc<dyn CredentialProvider>> {
        let read = |literal: Option<&str>, env: Option<&str>| -> Result<Zeroizing<String>> {
            match (literal, env) {
                (Some(value), _) => Ok(Zeroizing::new(value.to_owned())),
                (None, Some(name)) => lookup(name).map(Zeroizing::new).ok_or_else(|| {
                    GatewayError::ConfigError(format!("environment variable {name} is not set"))
                }),
                (None, None) => {
                    Err(GatewayError::ConfigError("credential source missing".to_owned()))
                }
            }
        };

        match self {
            Self::ApiKeys { public_key, public_key_env, private_key, private_key_env } => {
                let public = read(public_key.as_deref(), public_key_env.as_deref())?;
                let private = read(
                    private_key.as_ref().map(|secret| secret.as_str()),
                    private_key_env.as_deref(),
                )?;
                Ok(Arc::new(ApiKeys::new(public.as_str(), private.as_str())?))
            }
            Self::AccessToken { token, token_env } => {
                let token =
                    read(token.as_ref().map(|secret| secret.as_str()), token_env.as_deref())?;
                Ok(Arc::new(AccessToken::new(token.as_str())?))
            }
        }
    }
}

fn deserialize_secret<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Zeroizing<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(Zeroizing::new))
}

fn check_source(name: &str, has_literal: bool, env: Option<&str>) -> Result<()> {
    match (has_literal, env) {
        (true, Some(_)) => Err(GatewayError::ConfigError(format!(
            "{name} and {name}_env are mutually exclusive"
        ))),
        (false, None) => {
            Err(GatewayError::ConfigError(format!("{name} or {name}_env is required")))
        }
        (false, Some(var)) => validate_env_var_name(var),
        (true, None) => Ok(()),
    }
}

/// Validates an environment variable name.
fn validate_env_var_name(name: &str) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        return Err(GatewayError::ConfigError(
            "environment variable name cannot be empty".to_owned(),
        ));
    };

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(GatewayError::ConfigError(format!(
            "environment variable name must start with letter or underscore: {name}"
        )));
    }

    if let Some(ch) = name.chars().find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(GatewayError::ConfigError(format!(
            "environment variable name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}

fn validate_merchant_id(merchant_id: &str) -> Result<()> {
    if merchant_id.trim().is_empty() {
        return Err(GatewayError::ConfigError("merchant_id must not be empty".to_owned()));
    }
    if let Some(ch) = merchant_id.chars().find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(GatewayError::ConfigError(format!(
            "merchant_id contains invalid character '{ch}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SANDBOX_TOML: &str = r#"
        environment = "sandbox"
        merchant_id = "m1"

        [auth]
        type = "api_keys"
        public_key = "pub"
        private_key = "priv"
    "#;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_environment_base_urls() {
        assert_eq!(Environment::Development.base_url(), "http://localhost:3000");
        assert_eq!(
            Environment::Sandbox.base_url(),
            "https://api.sandbox.braintreegateway.com:443"
        );
        assert_eq!(Environment::Production.base_url(), "https://api.braintreegateway.com:443");
        assert!(Environment::Production.url().is_ok());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("Sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!(" production ".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!("qa".parse::<Environment>(), Err(GatewayError::ConfigError(_))));
    }

    #[test]
    fn test_from_toml_minimal() {
        let config = GatewayConfig::from_toml(SANDBOX_TOML).unwrap();
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.merchant_id, "m1");
        assert_eq!(config.http, HttpConfig::default());

        let header = config.credentials().unwrap().authorization();
        assert_eq!(header.as_str(), "Basic cHViOnByaXY=");
    }

    #[test]
    fn test_from_toml_with_http_section() {
        let toml = format!("{SANDBOX_TOML}\n[http]\ntimeout_secs = 30\nmax_idle_connections = 4\n");
        let config = GatewayConfig::from_toml(&toml).unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.max_idle_connections, 4);
        assert!(config.http.compress);
    }

    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(GatewayConfig::from_toml("environment = \"sandbox\"").is_err());
        assert!(GatewayConfig::from_toml(&SANDBOX_TOML.replace("m1", "m/1")).is_err());
        assert!(GatewayConfig::from_toml(&SANDBOX_TOML.replace("sandbox", "staging")).is_err());
        let slow_connect =
            format!("{SANDBOX_TOML}\n[http]\ntimeout_secs = 5\nconnect_timeout_secs = 9\n");
        assert!(GatewayConfig::from_toml(&slow_connect).is_err());
    }

    #[test]
    fn test_auth_from_env_names() {
        let auth: AuthConfig = toml::from_str(
            r#"
            type = "api_keys"
            public_key_env = "BT_PUB"
            private_key_env = "BT_PRIV"
            "#,
        )
        .unwrap();
        assert!(auth.validate().is_ok());

        let provider = auth.resolve(lookup(&[("BT_PUB", "pub"), ("BT_PRIV", "priv")])).unwrap();
        assert_eq!(provider.authorization().as_str(), "Basic cHViOnByaXY=");

        let missing = auth.resolve(lookup(&[("BT_PUB", "pub")]));
        assert!(matches!(missing, Err(GatewayError::ConfigError(msg)) if msg.contains("BT_PRIV")));
    }

    #[test]
    fn test_auth_source_rules() {
        let both: AuthConfig = toml::from_str(
            "type = \"access_token\"\ntoken = \"t\"\ntoken_env = \"TOKEN\"",
        )
        .unwrap();
        assert!(both.validate().is_err());

        let neither: AuthConfig = toml::from_str("type = \"access_token\"").unwrap();
        assert!(neither.validate().is_err());

        let bad_name: AuthConfig =
            toml::from_str("type = \"access_token\"\ntoken_env = \"1TOKEN\"").unwrap();
        assert!(bad_name.validate().is_err());
    }

    #[test]
    fn test_access_token_config() {
        let auth: AuthConfig = toml::from_str("type = \"access_token\"\ntoken = \"abc\"").unwrap();
        let provider = auth.resolve(|_| None).unwrap();
        assert_eq!(provider.authorization().as_str(), "Bearer abc");
    }

    #[test]
    fn test_auth_debug_redacts_secrets() {
        let config = GatewayConfig::from_toml(SANDBOX_TOML).unwrap();
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("pub"));
        assert!(!debug_str.contains("priv\""));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_lookup() {
        let config = GatewayConfig::from_lookup(lookup(&[
            (ENV_ENVIRONMENT, "production"),
            (ENV_MERCHANT_ID, "m1"),
            (ENV_PUBLIC_KEY, "pub"),
            (ENV_PRIVATE_KEY, "priv"),
        ]))
        .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.credentials().is_ok());

        let err = GatewayConfig::from_lookup(lookup(&[(ENV_ENVIRONMENT, "sandbox")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MERCHANT_ID));
    }
}
