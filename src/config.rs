//! Service configuration read from the effective environment.

use serde::Deserialize;

use crate::cascade::EffectiveEnvironment;
use crate::service::ServiceName;

/// Variables echoed by the root endpoint, in display order.
pub const REPORTED_VARIABLES: [&str; 6] = [
    "DATABASE_URL",
    "REDIS_URL",
    "DEBUG",
    "LOG_LEVEL",
    "API_KEY",
    "NODE_ENV",
];

/// Variables `Config` is read from. Everything else in the environment is ignored.
pub const CONFIG_VARIABLES: [&str; 2] = ["PORT", "RUST_LOG"];

/// Service configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// HTTP listen port. Falls back to the service default.
    #[serde(default)]
    pub port: Option<u16>,

    /// Log filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Extract configuration from an environment after the cascade is applied.
    ///
    /// Empty values count as unset, so `PORT=` falls back to the default.
    pub fn from_environment(environment: &EffectiveEnvironment) -> Result<Self, envy::Error> {
        envy::from_iter(CONFIG_VARIABLES.iter().filter_map(|name| {
            environment
                .get(name)
                .filter(|value| !value.is_empty())
                .map(|value| (name.to_string(), value.to_string()))
        }))
    }

    /// Port to listen on: CLI override, then `PORT`, then the service default.
    pub fn effective_port(&self, service: ServiceName, cli_port: Option<u16>) -> u16 {
        cli_port
            .or(self.port)
            .unwrap_or_else(|| service.default_port())
    }
}
