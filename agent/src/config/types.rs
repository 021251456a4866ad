use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exchange endpoint used when neither the CLI nor a config file names one
pub const DEFAULT_URI: &str = "ws://192.168.100.10:9001/trade";

/// What the supervisor does after the stream closes abnormally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Exit non-zero and let the process supervisor restart us
    #[default]
    ExitProcess,
    /// Sleep `reconnect_delay` and reconnect in-process
    Reconnect,
}

/// Agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// WebSocket endpoint, without the credential query string
    #[serde(default = "default_uri")]
    pub uri: String,
    /// Credential appended to the endpoint as `team_secret`
    #[serde(default)]
    pub team_secret: String,
    /// Discount applied to intrinsic value before comparing with the ask
    #[serde(default = "default_multiplier")]
    pub multiplier: Decimal,
    /// Seconds to wait before reconnecting; only read under `Reconnect`
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: f64,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
}

impl AgentConfig {
    pub fn new(uri: impl Into<String>, team_secret: impl Into<String>) -> Self {
        AgentConfig {
            uri: uri.into(),
            team_secret: team_secret.into(),
            multiplier: default_multiplier(),
            reconnect_delay_secs: default_reconnect_delay(),
            restart_policy: RestartPolicy::default(),
        }
    }

    pub fn with_multiplier(mut self, multiplier: Decimal) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_reconnect_delay_secs(mut self, secs: f64) -> Self {
        self.reconnect_delay_secs = secs;
        self
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.reconnect_delay_secs).unwrap_or_default()
    }
}

// Default value functions for serde
fn default_uri() -> String {
    DEFAULT_URI.to_string()
}

fn default_multiplier() -> Decimal {
    Decimal::new(85, 2)
}

fn default_reconnect_delay() -> f64 {
    0.1
}
