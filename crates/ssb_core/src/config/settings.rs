//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    /// External tool locations.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Default effect counts offered to the user.
    #[serde(default)]
    pub effects: EffectSettings,

    /// Which file extensions count as images and audio.
    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for per-run and application log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Last input folder used, offered as the default next time.
    #[serde(default)]
    pub last_input_folder: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
            last_input_folder: String::new(),
        }
    }
}

/// External tool configuration. Empty paths mean "search PATH".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default)]
    pub ffmpeg_path: String,

    #[serde(default)]
    pub ffprobe_path: String,
}

/// Default effect group sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectSettings {
    #[serde(default = "default_effect_count")]
    pub zoom_count: u32,

    #[serde(default = "default_effect_count")]
    pub pan_count: u32,

    #[serde(default = "default_effect_count")]
    pub shake_count: u32,
}

fn default_effect_count() -> u32 {
    2
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            zoom_count: default_effect_count(),
            pan_count: default_effect_count(),
            shake_count: default_effect_count(),
        }
    }
}

/// Extension lists used when scanning the input folder.
///
/// Matching is case-insensitive and extensions are given without the dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,
}

fn default_image_extensions() -> Vec<String> {
    vec!["jpg".to_string()]
}

fn default_audio_extensions() -> Vec<String> {
    vec!["mp3".to_string()]
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
            audio_extensions: default_audio_extensions(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written to run logs.
    #[serde(default)]
    pub level: LogLevel,

    /// Hide encoder output unless a segment fails.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Progress line step percentage in compact mode.
    #[serde(default = "default_progress_step")]
    pub progress_step: u32,

    /// Encoder output lines shown after a failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_progress_step() -> u32 {
    20
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            progress_step: default_progress_step(),
            error_tail: default_error_tail(),
            show_timestamps: true,
        }
    }
}

impl LoggingSettings {
    /// Build the run logger configuration from these settings.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            progress_step: self.progress_step,
            error_tail: self.error_tail as usize,
            show_timestamps: self.show_timestamps,
        }
    }
}

impl Settings {
    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.paths.logs_folder)
    }
}

/// Config sections for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Tools,
    Effects,
    Discovery,
    Logging,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Tools => "tools",
            ConfigSection::Effects => "effects",
            ConfigSection::Discovery => "discovery",
            ConfigSection::Logging => "logging",
        }
    }

    pub fn all() -> [ConfigSection; 5] {
        [
            ConfigSection::Paths,
            ConfigSection::Tools,
            ConfigSection::Effects,
            ConfigSection::Discovery,
            ConfigSection::Logging,
        ]
    }

    /// Comment written above the section in a freshly generated file.
    pub(crate) fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Working folders",
            ConfigSection::Tools => "# External tools (empty = search PATH)",
            ConfigSection::Effects => "# Default number of segments per motion effect",
            ConfigSection::Discovery => "# File extensions paired by base name",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}
