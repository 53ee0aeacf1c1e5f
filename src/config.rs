//! Settings loading and logging initialization.
//!
//! Secrets are taken from the environment (`OMNEX_ACCESS_KEY`,
//! `OMNEX_SECRET_KEY`), never from the settings file; everything else comes
//! from TOML. [`Credentials`] is the immutable per-adapter slice of this;
//! two adapters with different flags (testnet and mainnet, say) can coexist
//! in one process because nothing here is global.

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Error, Result};

/// Immutable connection identity for one adapter instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    /// Use the venue's testnet endpoints.
    #[serde(default)]
    pub testnet: bool,
    /// Optional HTTP(S) proxy for REST calls.
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Credentials {
    /// Credentials for unauthenticated (public-data) use.
    #[must_use]
    pub fn public() -> Self {
        Self::default()
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validate_for_private_calls(&self) -> Result<()> {
        if self.access_key.is_empty() {
            return Err(Error::validation("access_key", "empty"));
        }
        if self.secret_key.is_empty() {
            return Err(Error::validation("secret_key", "empty"));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

/// Top-level settings file.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from a TOML file, with environment overrides for keys.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let content = std::fs::read_to_string(path).map_err(Error::ConfigRead)?;
        let mut settings: Self = toml::from_str(&content).map_err(Error::ConfigParse)?;

        // Keys come from the environment when present (never logged).
        if let Ok(key) = std::env::var("OMNEX_ACCESS_KEY") {
            settings.credentials.access_key = key;
        }
        if let Ok(key) = std::env::var("OMNEX_SECRET_KEY") {
            settings.credentials.secret_key = key;
        }

        Ok(settings)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_default_to_public_mainnet() {
        let creds = Credentials::public();
        assert!(!creds.testnet);
        assert!(creds.proxy_url.is_none());
        assert!(creds.validate_for_private_calls().is_err());
    }

    #[test]
    fn settings_parse_from_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [credentials]
            access_key = "ak"
            secret_key = "sk"
            testnet = true

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert!(settings.credentials.testnet);
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.credentials.validate_for_private_calls().is_ok());
    }
}
