//! Config structures
use repocommon::prelude::*;

use std::path::Path;
use std::time::Duration;

use repocommon::Unused;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Name of the config file looked up in the `-C` directory
pub static CONFIG_FILE: &str = "Testrepo.toml";

/// Config data read from Testrepo.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The `[ping]` section
    #[serde(default)]
    pub ping: Ping,

    #[serde(flatten, default)]
    pub unused: Unused,
}

error_context!(pub LoadConfig, |r| -> Error {
    errorln!("Failed", "Loading {}", CONFIG_FILE);
    r.change_context(Error::Config)
});
impl Config {
    /// Load the config from `dir`, or use defaults if there is no config file
    ///
    /// Prints formatted error message when failed
    pub fn load(dir: impl AsRef<Path>) -> ResultIn<Self, LoadConfig> {
        let path = dir.as_ref().join(CONFIG_FILE);
        match system::read_file_if_exists(path)? {
            Some(config) => Self::parse(&config),
            None => Ok(Self::default()),
        }
    }

    /// Parse config from TOML source
    pub fn parse(source: &str) -> ResultIn<Self, LoadConfig> {
        // print pretty toml error
        let config: Self = toml::from_str(source).map_err(|e| {
            for line in e.to_string().lines() {
                errorln!("Error", "{}", line);
            }
            e
        })?;
        config.unused.check();
        config.ping.unused.check_prefixed("ping");

        Ok(config)
    }
}

/// Config in the `[ping]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Ping {
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// User agent sent with the request
    pub user_agent: Option<String>,

    #[serde(flatten, default)]
    pub unused: Unused,
}

impl Ping {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS))
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or(concat!("testrepo/", env!("CARGO_PKG_VERSION")))
    }
}
