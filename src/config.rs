use log::{info, warn};
use url::Url;

use crate::error::ConfigError;

pub const ENDPOINT_VAR: &str = "EMAILER_API_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: Url,
}

impl AppConfig {
    /// Resolves the classifier endpoint from the runtime environment, falling
    /// back to the value embedded by build.rs.
    pub fn load() -> Result<Self, ConfigError> {
        let raw = get_env_var(ENDPOINT_VAR).ok_or(ConfigError::Missing(ENDPOINT_VAR))?;
        Self::from_endpoint(&raw)
    }

    pub fn from_endpoint(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidUrl {
            var: ENDPOINT_VAR,
            value: raw.to_string(),
        };

        let endpoint = Url::parse(raw.trim()).map_err(|_| invalid())?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid());
        }

        Ok(Self { endpoint })
    }
}

fn get_env_var(key: &str) -> Option<String> {
    // Load .env file if it exists for development
    let _ = dotenvy::dotenv();

    if let Ok(value) = std::env::var(key) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }

    let embedded = match key {
        ENDPOINT_VAR => option_env!("EMAILER_API_URL"),
        _ => None,
    };

    embedded
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

pub fn log_environment_status() {
    match get_env_var(ENDPOINT_VAR) {
        Some(url) => info!("{}: {}", ENDPOINT_VAR, url),
        None => warn!("{}: Not available (neither runtime nor embedded)", ENDPOINT_VAR),
    }
}
