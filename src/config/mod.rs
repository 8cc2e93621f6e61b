//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `WARIKAN` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use warikan_ledger::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.listen_addr());
//! ```

mod auth;
mod database;
mod error;
mod ledger;
mod server;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use ledger::LedgerConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listener, environment and HTTP layer settings
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection. Absent means the in-memory store.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Bearer token validation
    pub auth: AuthConfig,

    /// Retry, tolerance and paging tunables
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `WARIKAN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `WARIKAN__SERVER__LISTEN=0.0.0.0:8080` -> `server.listen = "0.0.0.0:8080"`
    /// - `WARIKAN__DATABASE__URL=...` -> `database.url = ...`
    /// - `WARIKAN__LEDGER__MAX_WRITE_ATTEMPTS=3` -> `ledger.max_write_attempts = 3`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("WARIKAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.ledger.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "WARIKAN__AUTH__JWT_SECRET",
        "WARIKAN__DATABASE__URL",
        "WARIKAN__SERVER__LISTEN",
        "WARIKAN__SERVER__ENVIRONMENT",
        "WARIKAN__LEDGER__MAX_WRITE_ATTEMPTS",
        "WARIKAN__LEDGER__SETTLEMENT_TOLERANCE",
    ];

    fn set_minimal_env() {
        env::set_var("WARIKAN__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_minimal_config_uses_memory_store() {
        let config = load_with(&[]).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.server.listen, "0.0.0.0:8080");
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.ledger.max_write_attempts, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_section_enables_postgres() {
        let config = load_with(&[("WARIKAN__DATABASE__URL", "postgres://localhost/warikan")])
            .unwrap();

        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url, "postgres://localhost/warikan");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ledger_overrides() {
        let config = load_with(&[
            ("WARIKAN__LEDGER__MAX_WRITE_ATTEMPTS", "3"),
            ("WARIKAN__LEDGER__SETTLEMENT_TOLERANCE", "1"),
        ])
        .unwrap();

        assert_eq!(config.ledger.max_write_attempts, 3);
        assert_eq!(config.ledger.settlement_tolerance, 1);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let config = load_with(&[("WARIKAN__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_LEN))
        );
    }

    #[test]
    fn test_custom_listen_address() {
        let config = load_with(&[("WARIKAN__SERVER__LISTEN", "127.0.0.1:3000")]).unwrap();
        assert_eq!(config.server.listen_addr().unwrap().port(), 3000);
    }
}
