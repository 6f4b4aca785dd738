//! Configuration
//!
//! Board configuration is a TOML document; every table and key is
//! optional and falls back to the reference device's values.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ConfigError};
pub use types::*;
