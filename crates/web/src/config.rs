//! Application configuration loaded from environment variables.
//!
//! Configuration is read once at startup. A `.env` file in `KEY=VALUE`
//! format is loaded first via dotenvy (blank lines and `#` comments are
//! ignored, one layer of matching quotes is stripped); variables already
//! present in the process environment always win, so the load is idempotent.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DB_HOST` - `PostgreSQL` host
//! - `DB_NAME` - Database name
//! - `DB_USER` - Database user
//! - `DB_PASS` - Database password
//!
//! ## Optional
//! - `DB_PORT` - Database port (default: 5432)
//! - `APP_HOST` - Bind address (default: 127.0.0.1)
//! - `APP_PORT` - Listen port (default: 3000)
//! - `APP_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `APP_DEBUG` - Expose error detail to clients (default: false)
//! - `DEFAULT_LANGUAGE` - Fallback UI language code (default: en)
//! - `LOCALES_DIR` - Translation table directory (default: crates/web/locales)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Whether error detail is exposed to clients
    pub debug: bool,
    /// Fallback UI language code
    pub default_language: String,
    /// Directory holding per-language translation tables
    pub locales_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// `PostgreSQL` connection settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database name
    pub name: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: SecretString,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database = DatabaseConfig::from_env()?;
        let host = get_env_or_default("APP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_PORT".to_owned(), e.to_string()))?;
        let base_url = get_env_or_default("APP_BASE_URL", "http://localhost:3000");
        let debug = parse_bool("APP_DEBUG", &get_env_or_default("APP_DEBUG", "false"))?;
        let default_language = get_env_or_default("DEFAULT_LANGUAGE", "en");
        let locales_dir = PathBuf::from(get_env_or_default("LOCALES_DIR", "crates/web/locales"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database,
            host,
            port,
            base_url,
            debug,
            default_language,
            locales_dir,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: get_required_env("DB_HOST")?,
            port: get_env_or_default("DB_PORT", "5432")
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("DB_PORT".to_owned(), e.to_string()))?,
            name: get_required_env("DB_NAME")?,
            user: get_required_env("DB_USER")?,
            password: get_required_env("DB_PASS").map(SecretString::from)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
///
/// An empty value counts as missing so a stray `KEY=` line in `.env`
/// fails at startup instead of at first use.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_owned())),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parse a boolean flag value ("1"/"true"/"yes"/"on", case-insensitive).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_parse_bool_truthy() {
        for v in ["1", "true", "TRUE", "yes", "on"] {
            assert!(parse_bool("APP_DEBUG", v).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_falsy() {
        for v in ["0", "false", "False", "no", "off"] {
            assert!(!parse_bool("APP_DEBUG", v).unwrap());
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        assert!(matches!(
            parse_bool("APP_DEBUG", "maybe"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_required_env_missing() {
        assert!(matches!(
            get_required_env("THISTLE_TEST_DOES_NOT_EXIST"),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_required_env_empty_counts_as_missing() {
        // set_var is unsafe in edition 2024; fine in single-purpose test code
        unsafe { std::env::set_var("THISTLE_TEST_EMPTY_VAR", "") };
        assert!(matches!(
            get_required_env("THISTLE_TEST_EMPTY_VAR"),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_env_or_default_falls_back() {
        assert_eq!(
            get_env_or_default("THISTLE_TEST_DOES_NOT_EXIST", "5432"),
            "5432"
        );
    }

    // The KEY=VALUE file format contract: comments and blank lines are
    // ignored, a single layer of matching quotes is stripped.
    #[test]
    fn test_env_file_format_roundtrip() {
        let file = "\
# this comment line is never loaded as a key
GREETING=\"value with spaces\"

SINGLE='quoted'
PLAIN=bare
";
        let vars: HashMap<String, String> = dotenvy::from_read_iter(file.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(vars.get("GREETING").unwrap(), "value with spaces");
        assert_eq!(vars.get("SINGLE").unwrap(), "quoted");
        assert_eq!(vars.get("PLAIN").unwrap(), "bare");
        assert!(!vars.keys().any(|k| k.starts_with('#')));
        assert_eq!(vars.len(), 3);
    }
}
