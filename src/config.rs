//! Merchant credentials and client settings.

use crate::constants::{DEFAULT_SALT_INDEX, DEFAULT_TIMEOUT_SECS, PRODUCTION_HOST, SANDBOX_HOST};
use crate::errors::{PhonePeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// How the pay page hands the customer back to `redirect_url`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RedirectMode {
    /// Browser POSTs the transaction result to the redirect URL
    #[default]
    Post,
    /// Browser is sent to the redirect URL with a GET
    Redirect,
}

impl RedirectMode {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectMode::Post => "POST",
            RedirectMode::Redirect => "REDIRECT",
        }
    }
}

impl fmt::Display for RedirectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RedirectMode {
    type Err = PhonePeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POST" => Ok(RedirectMode::Post),
            "REDIRECT" => Ok(RedirectMode::Redirect),
            other => Err(PhonePeError::ConfigError(format!(
                "unknown redirect mode '{other}', expected POST or REDIRECT"
            ))),
        }
    }
}

/// Well-known gateway hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// PhonePe UAT
    Sandbox,
    /// PhonePe live
    Production,
}

impl Environment {
    /// Base URL of the environment.
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_HOST,
            Environment::Production => PRODUCTION_HOST,
        }
    }
}

/// Configuration for a [`PhonePeClient`](crate::client::PhonePeClient).
///
/// The salt is key material: it is hashed into every checksum but never sent
/// and never printed by `Debug`.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Merchant identifier issued by PhonePe
    pub merchant_id: String,

    /// Shared secret ("salt key")
    pub salt: String,

    /// Version of the salt the gateway should verify against
    pub salt_index: u32,

    /// Gateway base URL, e.g. [`SANDBOX_HOST`]
    pub host: String,

    /// Where the customer lands after the pay page
    pub redirect_url: String,

    /// Server-to-server callback URL
    pub webhook_url: String,

    /// How the customer is redirected
    pub redirect_mode: RedirectMode,

    /// Upper bound on each HTTP exchange
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Creates a configuration with salt index 1, POST redirects and a 30 second timeout.
    ///
    /// No validation happens here; see [`GatewayConfig::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use phonepe_pg::config::{GatewayConfig, RedirectMode};
    ///
    /// let config = GatewayConfig::new(
    ///     "PGTESTPAYUAT",
    ///     "099eb0cd-02cf-4e2a-8aca-3e6c6aff0399",
    ///     "https://api-preprod.phonepe.com/apis/pg-sandbox",
    ///     "https://shop.example.com/return",
    ///     "https://shop.example.com/phonepe/callback",
    /// );
    /// assert_eq!(config.salt_index, 1);
    /// assert_eq!(config.redirect_mode, RedirectMode::Post);
    /// ```
    pub fn new(
        merchant_id: impl Into<String>,
        salt: impl Into<String>,
        host: impl Into<String>,
        redirect_url: impl Into<String>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            salt: salt.into(),
            salt_index: DEFAULT_SALT_INDEX,
            host: host.into(),
            redirect_url: redirect_url.into(),
            webhook_url: webhook_url.into(),
            redirect_mode: RedirectMode::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the salt index.
    pub fn with_salt_index(mut self, salt_index: u32) -> Self {
        self.salt_index = salt_index;
        self
    }

    /// Sets the redirect mode.
    pub fn with_redirect_mode(mut self, mode: RedirectMode) -> Self {
        self.redirect_mode = mode;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Points the configuration at one of the well-known hosts.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.host = environment.host().to_string();
        self
    }

    /// Builds a configuration from `PHONEPE_*` environment variables.
    ///
    /// Required: `PHONEPE_MERCHANT_ID`, `PHONEPE_SALT`, `PHONEPE_REDIRECT_URL`,
    /// `PHONEPE_WEBHOOK_URL`. Optional: `PHONEPE_SALT_INDEX` (1),
    /// `PHONEPE_HOST` (sandbox), `PHONEPE_REDIRECT_MODE` (POST),
    /// `PHONEPE_TIMEOUT_SECS` (30).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| PhonePeError::ConfigError(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("PHONEPE_MERCHANT_ID")?,
            required("PHONEPE_SALT")?,
            lookup("PHONEPE_HOST").unwrap_or_else(|| SANDBOX_HOST.to_string()),
            required("PHONEPE_REDIRECT_URL")?,
            required("PHONEPE_WEBHOOK_URL")?,
        );

        if let Some(index) = lookup("PHONEPE_SALT_INDEX") {
            config.salt_index = index.trim().parse().map_err(|_| {
                PhonePeError::ConfigError(format!("PHONEPE_SALT_INDEX is not a number: {index}"))
            })?;
        }
        if let Some(mode) = lookup("PHONEPE_REDIRECT_MODE") {
            config.redirect_mode = mode.parse()?;
        }
        if let Some(secs) = lookup("PHONEPE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PhonePeError::ConfigError(format!("PHONEPE_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Checks the invariants the gateway relies on.
    pub fn validate(&self) -> Result<()> {
        if self.merchant_id.trim().is_empty() {
            return Err(PhonePeError::ConfigError("merchant id is empty".to_string()));
        }
        if self.salt.is_empty() {
            return Err(PhonePeError::ConfigError("salt is empty".to_string()));
        }
        if self.salt_index == 0 {
            return Err(PhonePeError::ConfigError(
                "salt index must be a positive integer".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(PhonePeError::ConfigError("request timeout is zero".to_string()));
        }
        Url::parse(&self.host)?;
        Ok(())
    }

    /// Absolute URL for an API path, keeping any path prefix of the host.
    pub(crate) fn endpoint(&self, api_path: &str) -> Result<Url> {
        let url = format!("{}{}", self.host.trim_end_matches('/'), api_path);
        Ok(Url::parse(&url)?)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("salt", &"<redacted>")
            .field("salt_index", &self.salt_index)
            .field("host", &self.host)
            .field("redirect_url", &self.redirect_url)
            .field("webhook_url", &self.webhook_url)
            .field("redirect_mode", &self.redirect_mode)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample() -> GatewayConfig {
        GatewayConfig::new(
            "M001",
            "mysalt",
            "https://api-preprod.phonepe.com/apis/pg-sandbox/",
            "https://shop.test/return",
            "https://shop.test/callback",
        )
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.salt_index, 1);
        assert_eq!(config.redirect_mode, RedirectMode::Post);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = sample()
            .with_salt_index(2)
            .with_redirect_mode(RedirectMode::Redirect)
            .with_timeout(Duration::from_secs(5))
            .with_environment(Environment::Production);

        assert_eq!(config.salt_index, 2);
        assert_eq!(config.redirect_mode, RedirectMode::Redirect);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.host, PRODUCTION_HOST);
    }

    #[test]
    fn test_endpoint_keeps_host_prefix() {
        let url = sample().endpoint("/pg/v1/pay").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api-preprod.phonepe.com/apis/pg-sandbox/pg/v1/pay"
        );
    }

    #[test]
    fn test_debug_redacts_salt() {
        let printed = format!("{:?}", sample());
        assert!(!printed.contains("mysalt"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(sample().with_salt_index(0).validate().is_err());

        let mut config = sample();
        config.salt.clear();
        assert!(config.validate().is_err());

        let mut config = sample();
        config.host = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(PhonePeError::UrlParseError(_))
        ));
    }

    #[test]
    fn test_redirect_mode_parsing() {
        assert_eq!("post".parse::<RedirectMode>().unwrap(), RedirectMode::Post);
        assert_eq!(
            " REDIRECT ".parse::<RedirectMode>().unwrap(),
            RedirectMode::Redirect
        );
        assert!("GET".parse::<RedirectMode>().is_err());
        assert_eq!(
            serde_json::to_string(&RedirectMode::Redirect).unwrap(),
            "\"REDIRECT\""
        );
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PHONEPE_MERCHANT_ID", "M001"),
            ("PHONEPE_SALT", "mysalt"),
            ("PHONEPE_REDIRECT_URL", "https://shop.test/return"),
            ("PHONEPE_WEBHOOK_URL", "https://shop.test/callback"),
            ("PHONEPE_SALT_INDEX", "2"),
            ("PHONEPE_REDIRECT_MODE", "redirect"),
            ("PHONEPE_TIMEOUT_SECS", "10"),
        ]
        .into_iter()
        .collect();

        let config =
            GatewayConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.merchant_id, "M001");
        assert_eq!(config.host, SANDBOX_HOST);
        assert_eq!(config.salt_index, 2);
        assert_eq!(config.redirect_mode, RedirectMode::Redirect);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_lookup_missing_required() {
        let err = GatewayConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("PHONEPE_MERCHANT_ID"));
    }
}
