use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_response: ApiResponseConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

/// Defaults for the standard response envelope. Read-only after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponseConfig {
    pub use_standard_payload: bool,
    pub default_version: String,
    pub root_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
    pub seed_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("API_STANDARD_PAYLOAD") {
            self.api_response.use_standard_payload =
                v.parse().unwrap_or(self.api_response.use_standard_payload);
        }
        if let Ok(v) = env::var("API_STANDARD_PAYLOAD_VERSION") {
            self.api_response.default_version = v;
        }
        if let Ok(v) = env::var("API_STANDARD_PAYLOAD_ROOT_KEY") {
            self.api_response.root_key = v;
        }

        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("NEXGEO_SEED") {
            self.database.seed_on_startup = v.parse().unwrap_or(self.database.seed_on_startup);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours =
                v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api_response: ApiResponseConfig {
                use_standard_payload: false,
                default_version: env!("CARGO_PKG_VERSION").to_string(),
                root_key: "nexsoft".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
                seed_on_startup: false,
            },
            security: SecurityConfig {
                // Dev-only fallback; any real deployment sets JWT_SECRET
                jwt_secret: "nexgeo-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api_response: ApiResponseConfig {
                use_standard_payload: false,
                default_version: env!("CARGO_PKG_VERSION").to_string(),
                root_key: "nexsoft".to_string(),
            },
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
                seed_on_startup: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert!(!config.api_response.use_standard_payload);
        assert_eq!(config.api_response.root_key, "nexsoft");
        assert_eq!(config.security.jwt_expiry_hours, 24 * 7);
    }

    #[test]
    fn production_requires_explicit_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 24);
    }
}
