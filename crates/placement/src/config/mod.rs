use crate::workflows::placement::scoring::{
    default_proximity_keywords, MatchingConfig, MatchingConfigError, ScoringVariant,
    DEFAULT_CAPACITY, DEFAULT_SUPERVISOR_QUOTA,
};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub matching: MatchingConfig,
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
            matching: load_matching()?,
        })
    }
}

fn load_matching() -> Result<MatchingConfig, ConfigError> {
    let scoring_variant = match env::var("PLACEMENT_SCORING_VARIANT") {
        Ok(raw) => ScoringVariant::parse(&raw).ok_or(ConfigError::InvalidVariant(raw))?,
        Err(_) => ScoringVariant::default(),
    };

    let supervisor_quota = optional_number("PLACEMENT_SUPERVISOR_QUOTA")
        .map_err(|_| ConfigError::InvalidQuota)?
        .unwrap_or(DEFAULT_SUPERVISOR_QUOTA);
    let capacity_default = optional_number("PLACEMENT_CAPACITY_DEFAULT")
        .map_err(|_| ConfigError::InvalidCapacityDefault)?
        .unwrap_or(DEFAULT_CAPACITY);

    let proximity_keywords = match env::var("PLACEMENT_PROXIMITY_KEYWORDS") {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default_proximity_keywords(),
    };

    let matching = MatchingConfig {
        scoring_variant,
        field_weight: optional_weight("PLACEMENT_FIELD_WEIGHT")?,
        geography_weight: optional_weight("PLACEMENT_GEOGRAPHY_WEIGHT")?,
        special_weight: optional_weight("PLACEMENT_SPECIAL_WEIGHT")?,
        preference_weight: optional_weight("PLACEMENT_PREFERENCE_WEIGHT")?,
        supervisor_quota,
        capacity_default,
        proximity_keywords,
    };
    matching.validate()?;

    Ok(matching)
}

fn optional_number(key: &'static str) -> Result<Option<u32>, std::num::ParseIntError> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().parse::<u32>())
        .transpose()
}

fn optional_weight(key: &'static str) -> Result<Option<f64>, ConfigError> {
    env::var(key)
        .ok()
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidWeight(key))
        })
        .transpose()
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
    InvalidVariant(String),
    InvalidWeight(&'static str),
    InvalidQuota,
    InvalidCapacityDefault,
    Matching(MatchingConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidVariant(value) => write!(
                f,
                "PLACEMENT_SCORING_VARIANT must be 'a' or 'b' (got '{}')",
                value
            ),
            ConfigError::InvalidWeight(key) => write!(f, "{} must be a decimal number", key),
            ConfigError::InvalidQuota => {
                write!(f, "PLACEMENT_SUPERVISOR_QUOTA must be a whole number")
            }
            ConfigError::InvalidCapacityDefault => {
                write!(f, "PLACEMENT_CAPACITY_DEFAULT must be a whole number")
            }
            ConfigError::Matching(err) => write!(f, "invalid matching options: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Matching(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatchingConfigError> for ConfigError {
    fn from(value: MatchingConfigError) -> Self {
        Self::Matching(value)
    }
}
