//! Configuration from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default notification auto-hide duration in milliseconds.
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Which generation service implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Http,
    Fake,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL the generation endpoints are resolved against.
    pub api_base_url: Url,
    /// Per-request timeout. `None` waits for the transport to give up.
    pub request_timeout: Option<Duration>,
    /// How long a notification stays visible before it is dismissed.
    pub notification_auto_hide: Duration,
    /// Initial state of the image generation toggle.
    pub image_generation_enabled: bool,
    pub service: ServiceKind,
}

impl AppConfig {
    /// Build a configuration with defaults for everything but the base URL.
    pub fn new(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(api_base_url)?,
            request_timeout: None,
            notification_auto_hide: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            image_generation_enabled: true,
            service: ServiceKind::Http,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `AIAWW_API_BASE_URL`: base URL of the generation services
    ///
    /// Optional:
    /// - `AIAWW_REQUEST_TIMEOUT_SECS`: request timeout (default: none)
    /// - `AIAWW_NOTIFICATION_MS`: notification auto-hide (default: 3000)
    /// - `AIAWW_IMAGE_GENERATION`: "false" or "0" starts with images off
    /// - `AIAWW_SERVICE`: "http" (default) or "fake"
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = env::var("AIAWW_API_BASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("AIAWW_API_BASE_URL".to_string()))?;
        Self::from_env_with_base_url(&base)
    }

    /// Load configuration from environment variables, taking the base URL
    /// from the caller instead of `AIAWW_API_BASE_URL`.
    pub fn from_env_with_base_url(api_base_url: &str) -> Result<Self, ConfigError> {
        let mut config = Self::new(api_base_url)?;

        if let Some(secs) = parse_env::<u64>("AIAWW_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(ms) = parse_env::<u64>("AIAWW_NOTIFICATION_MS")? {
            config.notification_auto_hide = Duration::from_millis(ms);
        }

        if let Ok(value) = env::var("AIAWW_IMAGE_GENERATION") {
            config.image_generation_enabled = parse_flag(&value);
        }

        if let Ok(value) = env::var("AIAWW_SERVICE") {
            config.service = parse_service_kind(&value)?;
        }

        Ok(config)
    }
}

/// Parse a base URL, treating its last path segment as a directory.
///
/// `http://host/app` and `http://host/app/` both resolve `api/x` to
/// `http://host/app/api/x`.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

fn parse_env<T: std::str::FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: var.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim(), "false" | "0")
}

fn parse_service_kind(value: &str) -> Result<ServiceKind, ConfigError> {
    match value.trim() {
        "http" => Ok(ServiceKind::Http),
        "fake" => Ok(ServiceKind::Fake),
        other => Err(ConfigError::InvalidValue {
            var: "AIAWW_SERVICE".to_string(),
            value: other.to_string(),
        }),
    }
}
