use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

fn baudrate_default() -> u32 { return 300 }
fn timeout_default() -> u64 { return 20 }

/// Serial settings for one meter. The line framing itself is fixed to
/// 7 data bits, even parity, 2 stop bits and is not configurable.
#[derive(Deserialize, Serialize, Clone)]
pub struct MeterConfig {
    pub port: String,
    #[serde(default="baudrate_default")]
    pub baudrate: u32,
    #[serde(default="timeout_default")]
    pub timeout_secs: u64,
    /* One-shot read when unset */
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct Config {
    pub meter: MeterConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read the config on config/multical.yaml or multical.yaml: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse the config file: {0}")]
    Parse(#[from] serde_yml::Error),
}

impl Config {
    /// Check the two usual locations for the config file.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new("config/multical.yaml").exists() {
            return Self::load_from(Path::new("config/multical.yaml"));
        }
        Self::load_from(Path::new("multical.yaml"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let c: Config = serde_yml::from_str(&contents)?;
        debug!("Loaded config for meter on {}", c.meter.port);
        Ok(c)
    }
}
