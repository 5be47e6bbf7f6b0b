//! Configuration loading and parsing
//!
//! Loads the kiosk configuration from a TOML file or the embedded defaults.

pub mod loader;

pub use loader::{load_config, ConfigSource, CONFIG_ENV};
