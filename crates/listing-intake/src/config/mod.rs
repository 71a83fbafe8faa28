use std::env;
use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::form::{parse_flag, ListingLimits, MessageCatalog, NoticeTexts, SchemaValidator};

pub const DEFAULT_SUBMIT_URL: &str = "http://127.0.0.1:3000/api/submit-property";

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

/// Top-level configuration for the listing intake.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub submission: SubmissionConfig,
    pub validation: ValidationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let endpoint_value =
            env::var("LISTING_SUBMIT_URL").unwrap_or_else(|_| DEFAULT_SUBMIT_URL.to_string());
        let endpoint = parse_endpoint(&endpoint_value)?;

        let notice_duration = env::var("LISTING_NOTICE_DURATION_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidNoticeDuration)?;

        let require_consent = match env::var("LISTING_REQUIRE_CONSENT") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                name: "LISTING_REQUIRE_CONSENT",
            })?,
            Err(_) => true,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            submission: SubmissionConfig {
                endpoint,
                notice_duration,
                notices: NoticeTexts::default(),
            },
            validation: ValidationConfig {
                limits: ListingLimits::default(),
                messages: MessageCatalog::default(),
                require_consent,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where listings are posted and how the outcome is announced.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub endpoint: Url,
    pub notice_duration: Duration,
    pub notices: NoticeTexts,
}

/// Inputs of the schema validator.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub limits: ListingLimits,
    pub messages: MessageCatalog,
    pub require_consent: bool,
}

impl ValidationConfig {
    pub fn validator(&self) -> SchemaValidator {
        SchemaValidator::listing(&self.limits, self.messages.clone(), self.require_consent)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub fn parse_endpoint(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|err| ConfigError::InvalidEndpoint {
        value: value.to_string(),
        reason: err.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            value: value.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidEndpoint { value: String, reason: String },
    InvalidNoticeDuration,
    InvalidFlag { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidEndpoint { value, reason } => {
                write!(f, "LISTING_SUBMIT_URL '{}' is not a usable URL: {}", value, reason)
            }
            ConfigError::InvalidNoticeDuration => {
                write!(f, "LISTING_NOTICE_DURATION_MS must be a whole number of milliseconds")
            }
            ConfigError::InvalidFlag { name } => write!(f, "{} must be true or false", name),
        }
    }
}

impl std::error::Error for ConfigError {}
