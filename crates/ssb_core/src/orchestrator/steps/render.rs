//! Render step - encodes one clip per segment.
//!
//! Failures are per segment: a clip that is not produced is logged and
//! left out of the final video, and the run continues.

use std::fs;
use std::path::Path;

use crate::effects::EffectAssignment;
use crate::encoder::RenderJob;
use crate::models::{Effect, Segment, SegmentRender, ZOOM_MIN_DURATION_SECS};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RenderOutput, RunState, StepOutcome};

/// Runs the encoder once per segment in numeric key order.
pub struct RenderStep;

impl RenderStep {
    pub fn new() -> Self {
        Self
    }

    fn render_segment(
        &self,
        ctx: &Context,
        segment: &Segment,
        assignment: &EffectAssignment,
    ) -> SegmentRender {
        let key = &segment.key;
        ctx.logger.segment(&format!("Processing segment: {}", key));

        let assigned = assignment.effect_for(key);
        let mut record = SegmentRender {
            key: key.clone(),
            duration_secs: None,
            effect: assigned,
            clip_path: segment.clip_path.clone(),
            produced: false,
        };

        let duration = match ctx.probe.duration_secs(&segment.audio) {
            Ok(d) => d,
            Err(e) => {
                ctx.logger.error(&e.to_string());
                ctx.logger
                    .error(&format!("Failed to create video for segment {}", key));
                return record;
            }
        };
        record.duration_secs = Some(duration);

        let effect = assigned.resolve(duration);
        record.effect = effect;
        if assigned == Effect::Zoom && effect == Effect::None {
            ctx.logger.info(&format!(
                "Segment {} is too short for ZOOM ({:.2}s, needs more than {}s)",
                key, duration, ZOOM_MIN_DURATION_SECS
            ));
        }
        if effect.is_motion() {
            ctx.logger
                .info(&format!("Applying {} to segment {}", effect.label(), key));
        } else {
            ctx.logger
                .info(&format!("No effect applied to segment {}", key));
        }

        if !remove_stale_clip(ctx, &segment.clip_path) {
            ctx.logger
                .error(&format!("Failed to create video for segment {}", key));
            return record;
        }

        let job = RenderJob {
            image: segment.image.clone(),
            audio: segment.audio.clone(),
            duration_secs: duration,
            effect,
            output: segment.clip_path.clone(),
        };
        let encode_result = ctx.encoder.render(&job, &ctx.logger);

        record.produced = clip_is_produced(&segment.clip_path);
        if record.produced {
            ctx.logger.debug(&format!(
                "Segment {} rendered to {}",
                key,
                segment.clip_path.display()
            ));
        } else {
            if let Err(e) = encode_result {
                ctx.logger.error(&e.to_string());
            }
            ctx.logger.show_tail("ffmpeg");
            ctx.logger
                .error(&format!("Failed to create video for segment {}", key));
        }
        record
    }
}

impl Default for RenderStep {
    fn default() -> Self {
        Self::new()
    }
}

/// A clip counts only if it is a regular, non-empty file.
fn clip_is_produced(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Returns false when something is left at `path` that the encoder
/// could not replace.
fn remove_stale_clip(ctx: &Context, path: &Path) -> bool {
    if fs::symlink_metadata(path).is_err() {
        return true;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            ctx.logger
                .debug(&format!("Removed stale clip {}", path.display()));
            true
        }
        Err(e) => {
            ctx.logger.error(&format!(
                "Could not remove stale clip {}: {}",
                path.display(),
                e
            ));
            false
        }
    }
}

impl PipelineStep for RenderStep {
    fn name(&self) -> &str {
        "Render"
    }

    fn description(&self) -> &str {
        "Rendering segments"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let segments = match state.discovery {
            Some(ref d) => d.segments.clone(),
            None => {
                return Err(StepError::precondition_failed(
                    "Segments must be discovered before rendering",
                ))
            }
        };
        let assignment = state.assignment.clone().unwrap_or_default();

        fs::create_dir_all(ctx.layout.temp_dir())
            .map_err(|e| StepError::io_error("creating temp folder", e))?;

        let total = segments.len();
        let mut records = Vec::with_capacity(total);
        for (i, segment) in segments.iter().enumerate() {
            records.push(self.render_segment(ctx, segment, &assignment));
            ctx.report_progress((i + 1) as f64 / total as f64 * 100.0);
        }

        let failed = records.iter().filter(|r| !r.produced).count();
        if failed > 0 {
            ctx.logger
                .warn(&format!("{} of {} segments failed to render", failed, total));
        }

        state.render = Some(RenderOutput { segments: records });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let rendered = state.render.as_ref().map(|r| r.segments.len()).unwrap_or(0);
        if rendered != state.segments().len() {
            return Err(StepError::invalid_output(format!(
                "Rendered {} of {} segments",
                rendered,
                state.segments().len()
            )));
        }
        Ok(())
    }
}
