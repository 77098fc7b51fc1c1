use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::lending::PolicyConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the credit approval service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub lending: PolicyConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            lending: load_policy()?,
        })
    }
}

fn load_policy() -> Result<PolicyConfig, ConfigError> {
    let defaults = PolicyConfig::default();

    let affordability_ratio = match env::var("APP_AFFORDABILITY_RATIO") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|ratio| *ratio > 0.0 && *ratio <= 1.0)
            .ok_or(ConfigError::InvalidAffordabilityRatio)?,
        Err(_) => defaults.affordability_ratio,
    };

    let days_per_tenure_month = match env::var("APP_DAYS_PER_TENURE_MONTH") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|days| *days > 0)
            .ok_or(ConfigError::InvalidDaysPerTenureMonth)?,
        Err(_) => defaults.days_per_tenure_month,
    };

    Ok(PolicyConfig {
        affordability_ratio,
        days_per_tenure_month,
    })
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAffordabilityRatio,
    InvalidDaysPerTenureMonth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAffordabilityRatio => {
                write!(f, "APP_AFFORDABILITY_RATIO must be a number in (0, 1]")
            }
            ConfigError::InvalidDaysPerTenureMonth => {
                write!(f, "APP_DAYS_PER_TENURE_MONTH must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidAffordabilityRatio
            | ConfigError::InvalidDaysPerTenureMonth => None,
        }
    }
}
