use common::secret::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default bcrypt cost factor (about 200ms per hash on current hardware).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest bcrypt cost accepted from configuration.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest bcrypt cost accepted from configuration.
pub const MAX_BCRYPT_COST: u32 = 14;

/// Minimum length of the token signing secret in bytes (256 bits).
pub const MIN_JWT_SECRET_BYTES: usize = 32;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
pub const DEFAULT_DB_MIN_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_MAX_LIFETIME_SECONDS: u64 = 1800;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECONDS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Deployment environment. Production switches logging to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

/// Immutable service configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    /// HS256 signing secret. Rotating it invalidates every outstanding token.
    pub jwt_secret: SecretString,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
    pub environment: Environment,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_max_lifetime: Duration,
    pub db_acquire_timeout: Duration,
    pub request_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("JWT_SECRET too short: expected at least {min} bytes, got {actual}")]
    WeakJwtSecret { min: usize, actual: usize },

    #[error("Invalid BCRYPT_COST {0}: must be between 10 and 14")]
    InvalidBcryptCost(u32),

    #[error("Invalid value for {var}: {value}")]
    InvalidNumber { var: String, value: String },

    #[error("Invalid database pool settings: {0}")]
    InvalidPoolSettings(String),

    #[error("Invalid ENVIRONMENT: {0}")]
    InvalidEnvironment(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::WeakJwtSecret {
                min: MIN_JWT_SECRET_BYTES,
                actual: jwt_secret.len(),
            });
        }
        let jwt_secret = SecretString::from(jwt_secret.clone());

        let bcrypt_cost = parse_or(vars, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(bcrypt_cost));
        }

        let allowed_origins = vars
            .get("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        let environment = match vars.get("ENVIRONMENT") {
            Some(value) => value.parse()?,
            None => Environment::Development,
        };

        let db_max_connections = parse_or(vars, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let db_min_connections = parse_or(vars, "DB_MIN_CONNECTIONS", DEFAULT_DB_MIN_CONNECTIONS)?;

        if db_max_connections == 0 {
            return Err(ConfigError::InvalidPoolSettings(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if db_min_connections > db_max_connections {
            return Err(ConfigError::InvalidPoolSettings(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                db_min_connections, db_max_connections
            )));
        }

        let db_max_lifetime = Duration::from_secs(parse_or(
            vars,
            "DB_MAX_LIFETIME_SECONDS",
            DEFAULT_DB_MAX_LIFETIME_SECONDS,
        )?);
        let db_acquire_timeout = Duration::from_secs(parse_or(
            vars,
            "DB_ACQUIRE_TIMEOUT_SECONDS",
            DEFAULT_DB_ACQUIRE_TIMEOUT_SECONDS,
        )?);
        let request_timeout = Duration::from_secs(parse_or(
            vars,
            "REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?);

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret,
            bcrypt_cost,
            allowed_origins,
            environment,
            db_max_connections,
            db_min_connections,
            db_max_lifetime,
            db_acquire_timeout,
            request_timeout,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Length of the signing secret, for startup logging without exposing it.
    pub fn jwt_secret_len(&self) -> usize {
        self.jwt_secret.expose_secret().len()
    }
}

fn parse_or<T: FromStr>(
    vars: &HashMap<String, String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber {
                var: var.to_string(),
                value: value.clone(),
            }),
        None => Ok(default),
    }
}
