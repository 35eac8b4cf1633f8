//! Concatenate step - joins the produced clips into the final video.

use std::fs;

use crate::encoder::write_manifest;
use crate::models::OUTPUT_FILE_NAME;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{ConcatOutput, Context, RunState, StepOutcome};

/// Writes the concat manifest and stream-copies the clips into one file.
pub struct ConcatStep;

impl ConcatStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConcatStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ConcatStep {
    fn name(&self) -> &str {
        "Concatenate"
    }

    fn description(&self) -> &str {
        "Concatenating clips"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let render = state.render.as_ref().ok_or_else(|| {
            StepError::precondition_failed("Segments must be rendered before concatenation")
        })?;

        let clips = render.produced_clips();
        if clips.is_empty() {
            return Err(StepError::precondition_failed(
                "No segment clips were produced; nothing to concatenate",
            ));
        }

        let manifest_path = ctx.layout.manifest_path();
        let output_path = ctx.layout.output_path();

        write_manifest(&manifest_path, &clips)
            .map_err(|e| StepError::io_error("writing concat manifest", e))?;
        ctx.logger.debug(&format!(
            "Wrote {} clips to {}",
            clips.len(),
            manifest_path.display()
        ));

        ctx.encoder
            .concatenate(&manifest_path, &output_path, &ctx.logger)
            .map_err(|e| {
                ctx.logger.show_tail("ffmpeg");
                StepError::from(e)
            })?;

        state.concat = Some(ConcatOutput {
            manifest_path,
            output_path,
            clip_count: clips.len(),
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        let concat = state
            .concat
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("No concat result recorded"))?;

        let size = fs::metadata(&concat.output_path)
            .map(|m| m.len())
            .unwrap_or(0);
        if size == 0 {
            return Err(StepError::invalid_output(format!(
                "Output video missing or empty: {}",
                concat.output_path.display()
            )));
        }

        ctx.logger.done(&format!(
            "Done! Output video created: {}",
            OUTPUT_FILE_NAME
        ));
        Ok(())
    }
}
