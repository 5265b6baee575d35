use std::env;
use tracing::{error, info};

use crate::config::ConfigError;

/// Session-provider configuration. Admin authentication is delegated to
/// an external OAuth/session provider; the backend only calls its
/// userinfo endpoint with the caller's bearer token.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub userinfo_url: String,
    pub request_timeout_secs: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading auth configuration from environment variables");

        let userinfo_url = env::var("AUTH_USERINFO_URL").map_err(|_| {
            error!("AUTH_USERINFO_URL environment variable not found");
            ConfigError::EnvVarNotFound("AUTH_USERINFO_URL".to_string())
        })?;

        let request_timeout_secs = env::var("AUTH_REQUEST_TIMEOUT")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .unwrap_or(5);

        let config = AuthConfig { userinfo_url, request_timeout_secs };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AuthConfig {
            userinfo_url: "http://localhost:9999/userinfo".to_string(),
            request_timeout_secs: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.userinfo_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "Auth userinfo URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        assert!(AuthConfig::from_test_env().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_url() {
        let mut config = AuthConfig::from_test_env();
        config.userinfo_url = "".to_string();
        assert!(config.validate().is_err());
    }
}
