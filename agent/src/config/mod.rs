mod loader;
mod types;

pub use loader::{ConfigError, load_config, load_config_from_str};
pub use types::{AgentConfig, DEFAULT_URI, RestartPolicy};
