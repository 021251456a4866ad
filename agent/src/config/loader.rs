use rust_decimal::Decimal;
use std::path::Path;
use thiserror::Error;
use url::Url;

use super::types::AgentConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid endpoint: {0}")]
    InvalidUri(#[from] url::ParseError),
    #[error("Unsupported endpoint scheme: {0} (expected ws)")]
    UnsupportedScheme(String),
    #[error("Missing team secret")]
    MissingTeamSecret,
    #[error("Multiplier must be positive, got {0}")]
    InvalidMultiplier(Decimal),
    #[error("Reconnect delay must be a finite, non-negative number of seconds, got {0}")]
    InvalidReconnectDelay(f64),
}

/// Load agent configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AgentConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<AgentConfig, ConfigError> {
    let config: AgentConfig = serde_json::from_str(json)?;
    Ok(config)
}

impl AgentConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.multiplier <= Decimal::ZERO {
            return Err(ConfigError::InvalidMultiplier(self.multiplier));
        }
        if !self.reconnect_delay_secs.is_finite() || self.reconnect_delay_secs < 0.0 {
            return Err(ConfigError::InvalidReconnectDelay(self.reconnect_delay_secs));
        }
        self.connection_target().map(|_| ())
    }

    /// Endpoint with the credential appended as a query parameter
    pub fn connection_target(&self) -> Result<Url, ConfigError> {
        if self.team_secret.is_empty() {
            return Err(ConfigError::MissingTeamSecret);
        }

        let mut url = Url::parse(&self.uri)?;
        if url.scheme() != "ws" {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        url.query_pairs_mut()
            .append_pair("team_secret", &self.team_secret);
        Ok(url)
    }
}
