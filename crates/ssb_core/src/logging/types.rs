//! Logging types and configuration.

use serde::{Deserialize, Serialize};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

/// Configuration for run logger behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to output.
    pub level: LogLevel,
    /// Compact mode: encoder output only goes to the tail buffer and
    /// progress lines are thinned out.
    pub compact: bool,
    /// Progress step percentage for compact mode.
    pub progress_step: u32,
    /// Number of encoder output lines kept for the failure tail.
    pub error_tail: usize,
    /// Prefix lines with a wall-clock timestamp.
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            progress_step: 20,
            error_tail: 20,
            show_timestamps: true,
        }
    }
}

/// Callback receiving every formatted log line of a run.
///
/// Invoked from the worker thread.
pub type GuiLogCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Markers that make a run log easy to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    /// Encoder invocation: `$ ffmpeg ...`
    Command,
    /// Pipeline step banner: `=== Rendering segments ===`
    Step,
    /// Per-segment header: `--- Processing segment: 3 ---`
    Segment,
    /// Final video written: `[DONE]`
    Done,
    Warning,
    Error,
}

impl MessagePrefix {
    pub fn format(&self, message: &str) -> String {
        match self {
            MessagePrefix::Command => format!("$ {}", message),
            MessagePrefix::Step => format!("=== {} ===", message),
            MessagePrefix::Segment => format!("--- {} ---", message),
            MessagePrefix::Done => format!("[DONE] {}", message),
            MessagePrefix::Warning => format!("[WARNING] {}", message),
            MessagePrefix::Error => format!("[ERROR] {}", message),
        }
    }
}
