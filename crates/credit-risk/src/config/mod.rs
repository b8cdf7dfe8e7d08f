use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::scoring::{RiskPolicy, DEFAULT_INCOME_CEILING, DEFAULT_LOAN_PERIOD_MONTHS};
use crate::workflow::{WorkflowConfig, DEFAULT_ALERT_TIMEOUT};

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
    pub risk: RiskPolicy,
    pub workflow: WorkflowConfig,
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
            risk: load_risk_policy()?,
            workflow: load_workflow_config()?,
        })
    }
}

fn load_risk_policy() -> Result<RiskPolicy, ConfigError> {
    let loan_period_months = match env::var("RISK_LOAN_PERIOD_MONTHS") {
        Ok(raw) => raw
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|months| *months > 0)
            .ok_or(ConfigError::InvalidLoanPeriod { value: raw })?,
        Err(_) => DEFAULT_LOAN_PERIOD_MONTHS,
    };

    let loan_to_income_ceiling = match env::var("RISK_INCOME_CEILING") {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|ceiling| ceiling.is_finite() && *ceiling > 0.0)
            .ok_or(ConfigError::InvalidIncomeCeiling { value: raw })?,
        Err(_) => DEFAULT_INCOME_CEILING,
    };

    Ok(RiskPolicy {
        loan_period_months,
        loan_to_income_ceiling,
    })
}

fn load_workflow_config() -> Result<WorkflowConfig, ConfigError> {
    let alert_timeout = match env::var("WORKFLOW_ALERT_TIMEOUT_MS") {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
            .ok_or(ConfigError::InvalidAlertTimeout { value: raw })?,
        Err(_) => DEFAULT_ALERT_TIMEOUT,
    };

    Ok(WorkflowConfig { alert_timeout })
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
    InvalidLoanPeriod { value: String },
    InvalidIncomeCeiling { value: String },
    InvalidAlertTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLoanPeriod { value } => write!(
                f,
                "RISK_LOAN_PERIOD_MONTHS must be a positive integer, got '{value}'"
            ),
            ConfigError::InvalidIncomeCeiling { value } => write!(
                f,
                "RISK_INCOME_CEILING must be a positive number, got '{value}'"
            ),
            ConfigError::InvalidAlertTimeout { value } => write!(
                f,
                "WORKFLOW_ALERT_TIMEOUT_MS must be a positive number of milliseconds, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLoanPeriod { .. }
            | ConfigError::InvalidIncomeCeiling { .. }
            | ConfigError::InvalidAlertTimeout { .. } => None,
        }
    }
}
