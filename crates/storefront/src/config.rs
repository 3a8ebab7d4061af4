//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `CLEMENTINE_CATALOG_URL` - Base URL of the product catalog API
//!   (default: `https://fakestoreapi.com/`)
//! - `CLEMENTINE_CART_PATH` - Path of the durable cart slot file
//!   (default: `clementine-cart.json`)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default base URL of the product catalog API.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/";

const DEFAULT_CART_PATH: &str = "clementine-cart.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the product catalog API
    pub catalog_url: Url,
    /// Path of the durable key-value store file
    pub cart_path: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url =
            parse_catalog_url(&get_env_or_default("CLEMENTINE_CATALOG_URL", DEFAULT_CATALOG_URL))?;
        let cart_path = PathBuf::from(get_env_or_default("CLEMENTINE_CART_PATH", DEFAULT_CART_PATH));

        Ok(Self {
            catalog_url,
            cart_path,
        })
    }
}

fn parse_catalog_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar("CLEMENTINE_CATALOG_URL".to_string(), e.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_url_parses() {
        let url = parse_catalog_url(DEFAULT_CATALOG_URL).expect("default must parse");
        assert_eq!(url.as_str(), "https://fakestoreapi.com/");
    }

    #[test]
    fn test_invalid_catalog_url_is_rejected() {
        let err = parse_catalog_url("not a url").expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CLEMENTINE_CATALOG_URL"));
    }
}
