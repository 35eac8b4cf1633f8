//! Recording fakes for the encoder and probe seams.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Settings;
use crate::encoder::{
    read_manifest, Encoder, EncoderError, EncoderResult, MediaProbe, RenderJob,
};
use crate::logging::{LogConfig, RunLogger};
use crate::models::{EffectCounts, RunRequest};
use crate::orchestrator::Context;

/// One call made against [`FakeEncoder`].
#[derive(Debug, Clone)]
pub enum EncoderCall {
    Render(RenderJob),
    Concat {
        manifest: PathBuf,
        output: PathBuf,
        /// Clip paths in the manifest when concat ran.
        listed: Vec<String>,
    },
}

/// Encoder that writes placeholder files instead of running ffmpeg.
#[derive(Default)]
pub struct FakeEncoder {
    calls: Mutex<Vec<EncoderCall>>,
    failing: HashSet<String>,
    empty: HashSet<String>,
    fail_concat: bool,
}

impl FakeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render of `key` exits with an error and writes nothing.
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    /// Render of `key` "succeeds" but leaves a zero-byte clip.
    pub fn empty_output(mut self, key: &str) -> Self {
        self.empty.insert(key.to_string());
        self
    }

    pub fn failing_concat(mut self) -> Self {
        self.fail_concat = true;
        self
    }

    pub fn calls(&self) -> Vec<EncoderCall> {
        self.calls.lock().clone()
    }

    pub fn render_jobs(&self) -> Vec<RenderJob> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                EncoderCall::Render(job) => Some(job.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clip paths seen by the concat call, if any.
    pub fn concatenated(&self) -> Option<Vec<String>> {
        self.calls.lock().iter().find_map(|c| match c {
            EncoderCall::Concat { listed, .. } => Some(listed.clone()),
            _ => None,
        })
    }
}

fn clip_key(output: &Path) -> String {
    output
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_start_matches("part_").to_string())
        .unwrap_or_default()
}

impl Encoder for FakeEncoder {
    fn render(&self, job: &RenderJob, logger: &RunLogger) -> EncoderResult<()> {
        self.calls.lock().push(EncoderCall::Render(job.clone()));
        let key = clip_key(&job.output);

        if self.failing.contains(&key) {
            logger.output_line("Error opening input files: Invalid data found", true);
            return Err(EncoderError::command_failed("ffmpeg", 1, "Invalid data found"));
        }

        let contents: &[u8] = if self.empty.contains(&key) { b"" } else { b"clip" };
        fs::write(&job.output, contents).map_err(|e| EncoderError::io("writing clip", e))
    }

    fn concatenate(&self, manifest: &Path, output: &Path, _logger: &RunLogger) -> EncoderResult<()> {
        let listed = read_manifest(manifest).unwrap_or_default();
        self.calls.lock().push(EncoderCall::Concat {
            manifest: manifest.to_path_buf(),
            output: output.to_path_buf(),
            listed,
        });

        if self.fail_concat {
            return Err(EncoderError::command_failed("ffmpeg", 1, "Invalid argument"));
        }
        fs::write(output, b"video").map_err(|e| EncoderError::io("writing output", e))
    }
}

/// Probe that returns configured durations keyed by audio base name.
pub struct FakeProbe {
    default_secs: f64,
    durations: HashMap<String, f64>,
    failing: HashSet<String>,
}

impl FakeProbe {
    pub fn new(default_secs: f64) -> Self {
        Self {
            default_secs,
            durations: HashMap::new(),
            failing: HashSet::new(),
        }
    }

    pub fn with_duration(mut self, key: &str, secs: f64) -> Self {
        self.durations.insert(key.to_string(), secs);
        self
    }

    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }
}

impl MediaProbe for FakeProbe {
    fn duration_secs(&self, path: &Path) -> EncoderResult<f64> {
        let key = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if self.failing.contains(key) {
            return Err(EncoderError::probe(path, "no duration in format section"));
        }
        Ok(self.durations.get(key).copied().unwrap_or(self.default_secs))
    }
}

/// Write `<key>.jpg` and `<key>.mp3` placeholders for each key.
pub fn segment_folder(dir: &Path, keys: &[&str]) {
    for key in keys {
        fs::write(dir.join(format!("{}.jpg", key)), b"jpg").unwrap();
        fs::write(dir.join(format!("{}.mp3", key)), b"mp3").unwrap();
    }
}

/// Settings whose logs go to `logs_dir`, without timestamps.
pub fn test_settings(logs_dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.paths.logs_folder = logs_dir.to_string_lossy().to_string();
    settings.logging.show_timestamps = false;
    settings
}

/// A context over `input_dir` with counts 1/1/1 and a fixed seed.
pub fn fake_context(input_dir: &Path, encoder: Arc<FakeEncoder>, probe: Arc<FakeProbe>) -> Context {
    let logs = input_dir.join("logs");
    let settings = test_settings(&logs);
    let config = LogConfig {
        show_timestamps: false,
        ..LogConfig::default()
    };
    let logger = RunLogger::new("test", &logs, config, None).unwrap();
    let request = RunRequest::new(input_dir, EffectCounts::new(1, 1, 1)).with_seed(7);

    Context::new(request, settings, Arc::new(logger), encoder, probe)
}
