//! Discover step - pairs images with audio files by numeric base name.

use crate::discovery::discover_segments;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, DiscoveryOutput, RunState, StepOutcome};

/// Scans the input folder and records the matched segments.
pub struct DiscoverStep;

impl DiscoverStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiscoverStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for DiscoverStep {
    fn name(&self) -> &str {
        "Discover"
    }

    fn description(&self) -> &str {
        "Discovering segments"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let dir = ctx.layout.input_dir();
        if !dir.is_dir() {
            return Err(StepError::invalid_input(format!(
                "Input folder does not exist: {}",
                dir.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let found = discover_segments(&ctx.layout, &ctx.settings.discovery)?;

        for name in &found.unmatched_images {
            ctx.logger
                .debug(&format!("Image '{}' has no matching audio, ignored", name));
        }
        for name in &found.unmatched_audio {
            ctx.logger
                .debug(&format!("Audio '{}' has no matching image, ignored", name));
        }

        let keys: Vec<&str> = found.segments.iter().map(|s| s.key.as_str()).collect();
        ctx.logger.info(&format!(
            "Found {} segments: {}",
            found.segments.len(),
            keys.join(", ")
        ));

        state.discovery = Some(DiscoveryOutput {
            segments: found.segments,
            unmatched_images: found.unmatched_images,
            unmatched_audio: found.unmatched_audio,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.segments().is_empty() {
            return Err(StepError::invalid_output(format!(
                "No matching image/audio pairs found in {}",
                ctx.layout.input_dir().display()
            )));
        }
        Ok(())
    }
}
