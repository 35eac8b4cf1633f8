//! Configuration management for Slideshow Builder.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Normalization on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use ssb_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/slideshow.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Default zoom segments: {}", config.settings().effects.zoom_count);
//!
//! config.settings_mut().effects.zoom_count = 3;
//! config.update_section(ConfigSection::Effects).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ConfigSection, DiscoverySettings, EffectSettings, LoggingSettings, PathSettings, Settings,
    ToolSettings,
};
