//! API configuration

use serde::Deserialize;

use core_kernel::{CoreError, Timezone};

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_JWT_EXPIRATION_SECS: u64 = 365 * 24 * 60 * 60;

/// API configuration
///
/// Every field can be set through an `API_`-prefixed environment variable,
/// e.g. `API_PORT=9090` or `API_CLINIC_TIMEZONE=Asia/Ho_Chi_Minh`. Unset
/// fields keep their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Database URL
    pub database_url: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Log level
    pub log_level: String,
    /// IANA zone where the clinic's day starts
    pub clinic_timezone: String,
    /// Reject payment status changes outside the transition table
    pub strict_payment_transitions: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/clinic".to_string(),
            db_max_connections: 10,
            log_level: "info".to_string(),
            clinic_timezone: "UTC".to_string(),
            strict_payment_transitions: false,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured clinic timezone
    pub fn timezone(&self) -> Result<Timezone, CoreError> {
        self.clinic_timezone
            .parse()
            .map_err(|e: core_kernel::TemporalError| CoreError::configuration(e.to_string()))
    }

    /// Checks values the server cannot start without
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(CoreError::configuration("jwt_secret must not be empty"));
        }
        if self.jwt_expiration_secs == 0 || self.jwt_expiration_secs > MAX_JWT_EXPIRATION_SECS {
            return Err(CoreError::configuration(format!(
                "jwt_expiration_secs must be between 1 and {MAX_JWT_EXPIRATION_SECS}"
            )));
        }
        if self.db_max_connections == 0 {
            return Err(CoreError::configuration("db_max_connections must be at least 1"));
        }
        self.timezone()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert!(!config.strict_payment_transitions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timezone_parses_iana_name() {
        let config = ApiConfig {
            clinic_timezone: "Asia/Ho_Chi_Minh".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(config.timezone().unwrap().0.name(), "Asia/Ho_Chi_Minh");
    }

    #[test]
    fn test_unknown_timezone_is_configuration_error() {
        let config = ApiConfig {
            clinic_timezone: "Mars/Olympus".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = ApiConfig {
            jwt_secret: "  ".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_lifetime_bounds() {
        for jwt_expiration_secs in [0, MAX_JWT_EXPIRATION_SECS + 1, u64::MAX] {
            let config = ApiConfig {
                jwt_expiration_secs,
                ..ApiConfig::default()
            };
            assert!(matches!(config.validate(), Err(CoreError::Configuration(_))));
        }

        let config = ApiConfig {
            jwt_expiration_secs: MAX_JWT_EXPIRATION_SECS,
            ..ApiConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
