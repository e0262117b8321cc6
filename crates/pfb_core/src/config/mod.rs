//! Configuration management.
//!
//! Settings live in a TOML file split into sections; the manager
//! handles loading, atomic saves, and section-level updates.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, InferenceSettings, LiveSettings, LoggingSettings, PathSettings, ScanSettings,
    Settings,
};
