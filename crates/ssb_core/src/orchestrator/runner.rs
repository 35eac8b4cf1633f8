//! Slideshow runner: turns a request into a finished video.
//!
//! Builds the per-run logger and pipeline context, runs the steps, and
//! condenses the run state into a [`RunResult`].

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Settings;
use crate::effects::EffectAssignment;
use crate::encoder::{Encoder, FfmpegEncoder, FfprobeProbe, MediaProbe, ToolPaths};
use crate::logging::{GuiLogCallback, LogLevel, RunLoggerBuilder};
use crate::models::{RunRequest, Segment, SegmentKey, SegmentRender};

use super::errors::{PipelineError, PipelineResult, StepError};
use super::types::{Context, ProgressCallback, RunState};
use super::{create_plan_pipeline, create_standard_pipeline};

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: String,
    pub output_path: PathBuf,
    pub manifest_path: PathBuf,
    pub log_path: PathBuf,
    pub assignment: EffectAssignment,
    /// Per-segment outcomes in numeric key order.
    pub segments: Vec<SegmentRender>,
}

impl RunResult {
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

/// Discovery and effect assignment without rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub input_dir: PathBuf,
    pub segments: Vec<Segment>,
    pub assignment: EffectAssignment,
    pub unmatched_images: Vec<String>,
    pub unmatched_audio: Vec<String>,
}

type SharedLogCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Runs slideshow requests through the pipeline.
///
/// # Example
///
/// ```ignore
/// let runner = SlideshowRunner::from_tools(settings, &tools);
/// let result = runner.run(request, log_callback, progress_callback)?;
/// println!("Wrote {}", result.output_path.display());
/// ```
pub struct SlideshowRunner {
    settings: Settings,
    encoder: Arc<dyn Encoder>,
    probe: Arc<dyn MediaProbe>,
}

impl SlideshowRunner {
    pub fn new(settings: Settings, encoder: Arc<dyn Encoder>, probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            settings,
            encoder,
            probe,
        }
    }

    /// Runner backed by the real ffmpeg and ffprobe executables.
    pub fn from_tools(settings: Settings, tools: &ToolPaths) -> Self {
        Self::new(
            settings,
            Arc::new(FfmpegEncoder::new(&tools.ffmpeg)),
            Arc::new(FfprobeProbe::new(&tools.ffprobe)),
        )
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run discovery, assignment, rendering and concatenation.
    ///
    /// Pipeline failures are logged as `Error: <message>` through the log
    /// callback before being returned.
    pub fn run(
        &self,
        request: RunRequest,
        log_callback: Option<GuiLogCallback>,
        progress_callback: Option<ProgressCallback>,
    ) -> PipelineResult<RunResult> {
        let (ctx, mut state) = self.prepare(request, log_callback, progress_callback)?;

        tracing::info!(
            "Starting run '{}' in {}",
            ctx.run_name(),
            ctx.layout.input_dir().display()
        );
        let outcome = match create_standard_pipeline().run(&ctx, &mut state) {
            Ok(_) => Self::summarize(&ctx, state),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                tracing::info!(
                    "Run '{}' finished: {} rendered, {} failed",
                    ctx.run_name(),
                    result.rendered_keys().len(),
                    result.failed_keys().len()
                );
                ctx.logger.flush();
                Ok(result)
            }
            Err(e) => Err(Self::report_failure(&ctx, e)),
        }
    }

    /// Discover segments and assign effects, touching nothing on disk
    /// besides the run log.
    pub fn plan(
        &self,
        request: RunRequest,
        log_callback: Option<GuiLogCallback>,
    ) -> PipelineResult<RunPlan> {
        let (ctx, mut state) = self.prepare(request, log_callback, None)?;

        if let Err(e) = create_plan_pipeline().run(&ctx, &mut state) {
            return Err(Self::report_failure(&ctx, e));
        }

        let discovery = state.discovery.unwrap_or_default();
        Ok(RunPlan {
            input_dir: ctx.layout.input_dir().to_path_buf(),
            segments: discovery.segments,
            assignment: state.assignment.unwrap_or_default(),
            unmatched_images: discovery.unmatched_images,
            unmatched_audio: discovery.unmatched_audio,
        })
    }

    /// Build the logger, resolve the input folder and assemble the context.
    fn prepare(
        &self,
        mut request: RunRequest,
        log_callback: Option<GuiLogCallback>,
        progress_callback: Option<ProgressCallback>,
    ) -> PipelineResult<(Context, RunState)> {
        let run_name = request.run_name();
        let shared: Option<SharedLogCallback> = log_callback.map(Arc::from);

        let fail = |message: String| {
            if let Some(ref callback) = shared {
                callback(&format!("Error: {}", message));
            }
            tracing::error!("Run '{}': {}", run_name, message);
            message
        };

        let logger_callback: Option<GuiLogCallback> = shared.as_ref().map(|cb| {
            let cb = Arc::clone(cb);
            Box::new(move |line: &str| cb(line)) as GuiLogCallback
        });
        let logger = RunLoggerBuilder::new(&run_name, self.settings.logs_folder())
            .config(self.settings.logging.to_log_config())
            .maybe_gui_callback(logger_callback)
            .build()
            .map_err(|e| {
                let message = fail(format!("Failed to create run log: {}", e));
                PipelineError::setup_failed(&run_name, message)
            })?;

        let input_dir = fs::canonicalize(&request.input_dir)
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| {
                let message = format!(
                    "Input folder not found: {}",
                    request.input_dir.display()
                );
                logger.log(LogLevel::Error, &format!("Error: {}", message));
                PipelineError::validation_failed(&run_name, message)
            })?;
        request.input_dir = input_dir;

        let run_id = format!(
            "{}-{}",
            run_name,
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        logger.info(&format!("Input folder: {}", request.input_dir.display()));
        logger.info(&format!(
            "Requested effects: zoom={} pan={} shake={}",
            request.counts.zoom, request.counts.pan, request.counts.shake
        ));

        let ctx = Context::new(
            request,
            self.settings.clone(),
            Arc::new(logger),
            Arc::clone(&self.encoder),
            Arc::clone(&self.probe),
        )
        .maybe_progress_callback(progress_callback);

        Ok((ctx, RunState::new(run_id)))
    }

    fn summarize(ctx: &Context, state: RunState) -> PipelineResult<RunResult> {
        let missing = |what: &str| {
            PipelineError::step_failed(
                ctx.run_name(),
                "Concatenate",
                StepError::invalid_output(format!("{} missing from run state", what)),
            )
        };

        let concat = state.concat.ok_or_else(|| missing("concat output"))?;
        let render = state.render.ok_or_else(|| missing("render output"))?;

        Ok(RunResult {
            run_id: state.run_id,
            output_path: concat.output_path,
            manifest_path: concat.manifest_path,
            log_path: ctx.logger.log_path().to_path_buf(),
            assignment: state.assignment.unwrap_or_default(),
            segments: render.segments,
        })
    }

    fn report_failure(ctx: &Context, error: PipelineError) -> PipelineError {
        ctx.logger.log(LogLevel::Error, &format!("Error: {}", error));
        ctx.logger.flush();
        tracing::error!("Run '{}' failed: {}", ctx.run_name(), error);
        error
    }
}
