//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `UWINFLY_CATALOG_URL` - URL of the product catalog JSON document
//!
//! ## Optional
//! - `UWINFLY_DATA_DIR` - Directory for the file-backed store (default:
//!   `./data`)
//! - `UWINFLY_CATALOG_TIMEOUT_SECS` - Catalog fetch timeout, >= 1
//!   (default: 10)
//! - `UWINFLY_ADMIN_EMAIL` - Seed admin account email (default:
//!   `admin@uwinfly.id`)
//! - `UWINFLY_ADMIN_PASSWORD` - Seed admin account password (default:
//!   `admin` - the demo credential, change it anywhere real)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use uwinfly_core::Email;

use crate::services::auth::AdminSeed;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ADMIN_NAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "admin@uwinfly.id";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory for the file-backed key-value store
    pub data_dir: PathBuf,
    /// URL of the catalog document
    pub catalog_url: String,
    /// Catalog fetch timeout
    pub catalog_timeout: Duration,
    /// Seed admin display name (also its login identifier)
    pub admin_name: String,
    /// Seed admin email
    pub admin_email: Email,
    /// Seed admin password
    pub admin_password: SecretString,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let catalog_url = require_env("UWINFLY_CATALOG_URL")?;

        let data_dir = std::env::var("UWINFLY_DATA_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let catalog_timeout = match std::env::var("UWINFLY_CATALOG_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::InvalidEnvVar(
                        "UWINFLY_CATALOG_TIMEOUT_SECS".to_owned(),
                        format!("not a number: {raw}"),
                    )
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "UWINFLY_CATALOG_TIMEOUT_SECS".to_owned(),
                        "must be at least 1".to_owned(),
                    ));
                }
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS),
        };

        let admin_email_raw = std::env::var("UWINFLY_ADMIN_EMAIL")
            .unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_owned());
        let admin_email = Email::parse(&admin_email_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("UWINFLY_ADMIN_EMAIL".to_owned(), e.to_string())
        })?;

        let admin_password = SecretString::from(
            std::env::var("UWINFLY_ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_owned()),
        );

        Ok(Self {
            data_dir,
            catalog_url,
            catalog_timeout,
            admin_name: DEFAULT_ADMIN_NAME.to_owned(),
            admin_email,
            admin_password,
        })
    }

    /// The admin bootstrap parameters for `AuthService::seed_admin`.
    #[must_use]
    pub fn admin_seed(&self) -> AdminSeed {
        AdminSeed {
            name: self.admin_name.clone(),
            email: self.admin_email.clone(),
            password: self.admin_password.clone(),
        }
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}
