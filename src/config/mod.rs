//! Application configuration module
//!
//! Configuration is read from environment variables with the `DELIBERATION`
//! prefix; nested values are separated by double underscores. A `.env` file
//! is honoured during development.
//!
//! # Example
//!
//! ```no_run
//! use deliberation::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod assistant;
mod database;
mod error;
mod logging;

pub use assistant::{AssistantConfig, AssistantProvider};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection
    pub database: DatabaseConfig,

    /// Text-completion provider used for suggestions
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `DELIBERATION__DATABASE__URL=...` -> `database.url = ...`
    /// - `DELIBERATION__ASSISTANT__PROVIDER=groq` -> `assistant.provider = Groq`
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
                    .prefix("DELIBERATION")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.assistant.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DELIBERATION__DATABASE__URL",
        "DELIBERATION__DATABASE__MAX_CONNECTIONS",
        "DELIBERATION__ASSISTANT__PROVIDER",
        "DELIBERATION__ASSISTANT__API_KEY",
        "DELIBERATION__ASSISTANT__MODEL",
        "DELIBERATION__LOGGING__FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var(
            "DELIBERATION__DATABASE__URL",
            "postgresql://test@localhost/deliberation",
        );
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_minimal_environment_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/deliberation");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.assistant.provider, AssistantProvider::Disabled);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_assistant_section() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DELIBERATION__ASSISTANT__PROVIDER", "groq");
        env::set_var("DELIBERATION__ASSISTANT__API_KEY", "gsk_test");
        env::set_var("DELIBERATION__ASSISTANT__MODEL", "mixtral");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.assistant.provider, AssistantProvider::Groq);
        assert_eq!(
            config.assistant.api_key.as_ref().map(|k| k.expose_secret().clone()),
            Some("gsk_test".to_string())
        );
        assert_eq!(config.assistant.resolved_model().as_deref(), Some("mixtral"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_logging_and_pool_size_are_parsed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DELIBERATION__LOGGING__FORMAT", "json");
        env::set_var("DELIBERATION__DATABASE__MAX_CONNECTIONS", "25");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.database.max_connections, 25);
    }

    #[test]
    fn missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }

    #[test]
    fn enabled_assistant_without_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("DELIBERATION__ASSISTANT__PROVIDER", "openai");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::MissingRequired(
                "ASSISTANT__API_KEY"
            )))
        ));
    }
}
