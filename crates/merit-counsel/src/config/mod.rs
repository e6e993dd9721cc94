use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::counselling::allocation::DEFAULT_SEAT_SUCCESS_RATE;
use crate::counselling::preferences::DEFAULT_PREFERENCE_LIMIT;
use crate::counselling::EligibilityConfig;

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
    pub counselling: CounsellingConfig,
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
            counselling: CounsellingConfig::from_env()?,
        })
    }
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

/// Engine dials for the catalog source, seat draw, list capacity, percentile pool,
/// batch width and eligibility thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct CounsellingConfig {
    /// CSV catalog; `None` serves the built-in sample catalog.
    pub catalog_path: Option<PathBuf>,
    pub seat_success_rate: f64,
    pub seed: Option<u64>,
    pub max_preferences: usize,
    pub candidate_pool: u32,
    pub batch_workers: usize,
    pub eligibility: EligibilityConfig,
}

impl Default for CounsellingConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            seat_success_rate: DEFAULT_SEAT_SUCCESS_RATE,
            seed: None,
            max_preferences: DEFAULT_PREFERENCE_LIMIT,
            candidate_pool: 200_000,
            batch_workers: 4,
            eligibility: EligibilityConfig::default(),
        }
    }
}

impl CounsellingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let catalog_path = env::var("COUNSEL_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let seat_success_rate = match env::var("COUNSEL_SEAT_SUCCESS_RATE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|rate| (0.0..=1.0).contains(rate))
                .ok_or(ConfigError::InvalidSuccessRate(raw))?,
            Err(_) => defaults.seat_success_rate,
        };

        let seed = match env::var("COUNSEL_SEED") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        variable: "COUNSEL_SEED",
                        value: raw,
                    })?,
            ),
            Err(_) => None,
        };

        let eligibility = match env::var("COUNSEL_PASS_MARK") {
            Ok(raw) => EligibilityConfig {
                minimum_pass_mark: raw
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .filter(|mark| (1..=100).contains(mark))
                    .ok_or(ConfigError::InvalidPassMark(raw))?,
                ..defaults.eligibility
            },
            Err(_) => defaults.eligibility,
        };

        Ok(Self {
            catalog_path,
            seat_success_rate,
            seed,
            max_preferences: positive_var("COUNSEL_MAX_PREFERENCES", defaults.max_preferences)?,
            candidate_pool: positive_var("COUNSEL_CANDIDATE_POOL", defaults.candidate_pool)?,
            batch_workers: positive_var("COUNSEL_BATCH_WORKERS", defaults.batch_workers)?,
            eligibility,
        })
    }
}

fn positive_var<T>(variable: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Ok(raw) = env::var(variable) else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber {
            variable,
            value: raw,
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSuccessRate(String),
    InvalidPassMark(String),
    InvalidNumber { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSuccessRate(value) => write!(
                f,
                "COUNSEL_SEAT_SUCCESS_RATE must be a number between 0 and 1 (got '{value}')"
            ),
            ConfigError::InvalidPassMark(value) => write!(
                f,
                "COUNSEL_PASS_MARK must be a whole number between 1 and 100 (got '{value}')"
            ),
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a positive integer (got '{value}')")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSuccessRate(_)
            | ConfigError::InvalidPassMark(_)
            | ConfigError::InvalidNumber { .. } => None,
        }
    }
}
