//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::effects::EffectAssignment;
use crate::encoder::{Encoder, MediaProbe};
use crate::logging::RunLogger;
use crate::models::{RunLayout, RunRequest, Segment, SegmentKey, SegmentRender};

/// Progress callback: overall percent complete, 0.0 to 100.0.
pub type ProgressCallback = Box<dyn Fn(f64) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Contains the run request and shared resources that steps can read
/// but not modify. Mutable state goes in `RunState`.
pub struct Context {
    pub request: RunRequest,
    pub settings: Settings,
    /// Artifact paths under the input folder.
    pub layout: RunLayout,
    /// Per-run logger.
    pub logger: Arc<RunLogger>,
    pub encoder: Arc<dyn Encoder>,
    pub probe: Arc<dyn MediaProbe>,
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    pub fn new(
        request: RunRequest,
        settings: Settings,
        logger: Arc<RunLogger>,
        encoder: Arc<dyn Encoder>,
        probe: Arc<dyn MediaProbe>,
    ) -> Self {
        let layout = RunLayout::new(&request.input_dir);
        Self {
            request,
            settings,
            layout,
            logger,
            encoder,
            probe,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Like [`Self::with_progress_callback`] but accepts `None`.
    pub fn maybe_progress_callback(mut self, callback: Option<ProgressCallback>) -> Self {
        self.progress_callback = callback;
        self
    }

    /// Report progress to the callback (if set) and the run log.
    pub fn report_progress(&self, percent: f64) {
        let percent = percent.clamp(0.0, 100.0);
        if let Some(ref callback) = self.progress_callback {
            callback(percent);
        }
        self.logger.progress(percent);
    }

    pub fn run_name(&self) -> &str {
        self.logger.run_name()
    }
}

/// Mutable run state that accumulates results from pipeline steps.
///
/// Write-once: each step fills its own section and later steps only read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunState {
    pub run_id: String,
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery: Option<DiscoveryOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<EffectAssignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concat: Option<ConcatOutput>,
}

impl RunState {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Discovered segments, empty before discovery ran.
    pub fn segments(&self) -> &[Segment] {
        self.discovery
            .as_ref()
            .map(|d| d.segments.as_slice())
            .unwrap_or(&[])
    }

    pub fn keys(&self) -> Vec<SegmentKey> {
        self.segments().iter().map(|s| s.key.clone()).collect()
    }
}

/// Output from the Discover step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryOutput {
    /// Matched pairs in numeric key order.
    pub segments: Vec<Segment>,
    pub unmatched_images: Vec<String>,
    pub unmatched_audio: Vec<String>,
}

/// Output from the Render step, one record per segment in numeric order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderOutput {
    pub segments: Vec<SegmentRender>,
}

impl RenderOutput {
    /// Clips that were produced, in numeric key order.
    pub fn produced_clips(&self) -> Vec<PathBuf> {
        self.segments
            .iter()
            .filter(|r| r.produced)
            .map(|r| r.clip_path.clone())
            .collect()
    }

    pub fn rendered_keys(&self) -> Vec<SegmentKey> {
        self.segments
            .iter()
            .filter(|r| r.produced)
            .map(|r| r.key.clone())
            .collect()
    }

    pub fn failed_keys(&self) -> Vec<SegmentKey> {
        self.segments
            .iter()
            .filter(|r| !r.produced)
            .map(|r| r.key.clone())
            .collect()
    }
}

/// Output from the Concatenate step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcatOutput {
    pub manifest_path: PathBuf,
    pub output_path: PathBuf,
    /// Number of clips listed in the manifest.
    pub clip_count: usize,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Nothing to do; not an error.
    Skipped(String),
}
