//! Client configuration.

use std::fmt;

use crate::error::ApiError;
use crate::session::Credentials;

pub const DEFAULT_BASE_URL: &str = "https://api.wiebetaaltwat.nl";
pub const DEFAULT_API_VERSION: &str = "2";

/// Where to connect and how to sign in.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as the `accept-version` header on every request.
    pub api_version: String,
    pub credentials: Credentials,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a config from the environment.
    ///
    /// Reads `WBW_COOKIE`, or `WBW_EMAIL` and `WBW_PASSWORD`, plus an optional
    /// `WBW_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let credentials = Credentials::resolve(
            lookup("WBW_EMAIL"),
            lookup("WBW_PASSWORD"),
            lookup("WBW_COOKIE"),
        )
        .map_err(|_| {
            ApiError::Configuration(
                "WieBetaaltWat not configured. Set WBW_COOKIE, or WBW_EMAIL and WBW_PASSWORD."
                    .into(),
            )
        })?;

        let mut config = Self::new(credentials);
        if let Some(base_url) = lookup("WBW_BASE_URL").filter(|u| !u.is_empty()) {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_production() {
        let config = ClientConfig::from_lookup(env(&[("WBW_COOKIE", "tok")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_version, "2");
        assert_eq!(config.credentials, Credentials::Cookie("tok".into()));
    }

    #[test]
    fn base_url_can_be_overridden() {
        let config = ClientConfig::from_lookup(env(&[
            ("WBW_EMAIL", "a@b.nl"),
            ("WBW_PASSWORD", "pw"),
            ("WBW_BASE_URL", "http://127.0.0.1:3000"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn empty_environment_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn debug_redacts_password() {
        let config = ClientConfig::new(Credentials::Password {
            email: "a@b.nl".into(),
            password: "hunter2".into(),
        });
        let debug = format!("{config:?}");
        assert!(debug.contains("a@b.nl"));
        assert!(!debug.contains("hunter2"));
    }
}
