//! Command line interface
//!
//! ```text
//! option-buyer [MULTIPLIER] [RECONNECT_DELAY] [--uri URI] [--team-secret SECRET]
//!              [--config PATH] [--reconnect] [--log-level FILTER]
//! ```
//!
//! Positional values and flags override the JSON config file, which in turn
//! overrides the built-in defaults (multiplier 0.85, delay 0.1s).

use clap::Parser;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::config::{AgentConfig, ConfigError, DEFAULT_URI, RestartPolicy, load_config};

#[derive(Parser, Debug)]
#[command(author, version, about = "Buys options quoted below their discounted intrinsic value")]
pub struct Cli {
    /// Multiplier applied to intrinsic value (default: 0.85)
    #[arg(value_name = "MULTIPLIER")]
    pub multiplier: Option<Decimal>,

    /// Reconnect delay in seconds (default: 0.1)
    #[arg(value_name = "RECONNECT_DELAY")]
    pub reconnect_delay: Option<f64>,

    /// Exchange WebSocket endpoint, without the credential
    #[arg(long, env = "OPTION_BUYER_URI")]
    pub uri: Option<String>,

    /// Team credential appended to the endpoint as `team_secret`
    #[arg(long, env = "OPTION_BUYER_TEAM_SECRET", hide_env_values = true)]
    pub team_secret: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Reconnect in-process after an abnormal close instead of exiting
    #[arg(long)]
    pub reconnect: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(short, long, default_value = "option_buyer=info,options_core=info")]
    pub log_level: String,
}

impl Cli {
    /// Merge file configuration and command line overrides
    pub fn into_config(self) -> Result<AgentConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => AgentConfig::new(DEFAULT_URI, String::new()),
        };

        if let Some(uri) = self.uri {
            config.uri = uri;
        }
        if let Some(secret) = self.team_secret {
            config.team_secret = secret;
        }
        if let Some(multiplier) = self.multiplier {
            config.multiplier = multiplier;
        }
        if let Some(delay) = self.reconnect_delay {
            config.reconnect_delay_secs = delay;
        }
        if self.reconnect {
            config.restart_policy = RestartPolicy::Reconnect;
        }

        config.validate()?;
        Ok(config)
    }
}
