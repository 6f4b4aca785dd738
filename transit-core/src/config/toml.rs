//! TOML configuration parsing

use alloc::string::{String, ToString};
use core::fmt;

use super::types::BoardConfig;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Document is not valid TOML or does not match the schema
    Toml(String),
    /// A value is out of range; names the offending key
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(msg) => write!(f, "invalid config: {}", msg),
            Self::InvalidValue(key) => write!(f, "invalid value for {}", key),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Toml(msg) => defmt::write!(f, "invalid config: {=str}", msg.as_str()),
            Self::InvalidValue(key) => defmt::write!(f, "invalid value for {=str}", key),
        }
    }
}

/// Parse and validate a board configuration
pub fn parse_config(input: &str) -> Result<BoardConfig, ConfigError> {
    let config: BoardConfig =
        toml::from_str(input).map_err(|e| ConfigError::Toml(e.message().to_string()))?;
    config.validate()?;
    Ok(config)
}
