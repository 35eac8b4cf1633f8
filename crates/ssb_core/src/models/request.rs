//! Run requests and the user-facing form they are built from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::effect::EffectCounts;

/// Everything the orchestrator needs to start a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Folder holding `<key>.jpg` / `<key>.mp3` pairs. Outputs go here too.
    pub input_dir: PathBuf,
    pub counts: EffectCounts,
    /// Fixed seed for the effect shuffle. `None` draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl RunRequest {
    pub fn new(input_dir: impl Into<PathBuf>, counts: EffectCounts) -> Self {
        Self {
            input_dir: input_dir.into(),
            counts,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Short name for this run, used for the run log file.
    pub fn run_name(&self) -> String {
        self.input_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "slideshow".to_string())
    }
}

/// How a rejected form should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Form validation failures. The pipeline never starts when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select an input folder.")]
    MissingFolder,

    #[error("Please enter valid numbers for effects ({field}: '{value}').")]
    InvalidCount { field: &'static str, value: String },
}

impl FormError {
    pub fn severity(&self) -> Severity {
        match self {
            FormError::MissingFolder => Severity::Warning,
            FormError::InvalidCount { .. } => Severity::Error,
        }
    }

    /// Dialog-style title for the message.
    pub fn title(&self) -> &'static str {
        match self {
            FormError::MissingFolder => "Missing Input",
            FormError::InvalidCount { .. } => "Error",
        }
    }
}

/// Raw field values as a form collects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunForm {
    pub folder: String,
    pub zoom: String,
    pub pan: String,
    pub shake: String,
    pub seed: Option<u64>,
}

impl RunForm {
    /// Validate the fields and build a request.
    ///
    /// The folder is checked first, then counts in zoom, pan, shake order.
    pub fn into_request(self) -> Result<RunRequest, FormError> {
        let folder = self.folder.trim();
        if folder.is_empty() {
            return Err(FormError::MissingFolder);
        }

        let counts = EffectCounts {
            zoom: parse_count("zoom", &self.zoom)?,
            pan: parse_count("pan", &self.pan)?,
            shake: parse_count("shake", &self.shake)?,
        };

        Ok(RunRequest {
            input_dir: Path::new(folder).to_path_buf(),
            counts,
            seed: self.seed,
        })
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<usize, FormError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| FormError::InvalidCount {
            field,
            value: value.to_string(),
        })
}
