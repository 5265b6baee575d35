use std::env;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub admin_email: String,
    /// Remote catalog source; absent means serve the bundled copy.
    pub catalog_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "support@atelier.example".to_string());
        let catalog_url = env::var("QUOTE_CATALOG_URL").ok().filter(|s| !s.is_empty());
        AppConfig { host, port, environment, admin_email, catalog_url }
    }

    /// Development builds surface error details in 500 response bodies.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
