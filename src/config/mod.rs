pub mod app_conf;
pub mod database_conf;
pub mod email_conf;
pub mod content_conf;
pub mod auth_conf;


pub use app_conf::AppConfig;
pub use database_conf::DatabaseConfig;
pub use email_conf::EmailConfig;
pub use content_conf::ContentConfig;
pub use auth_conf::AuthConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
