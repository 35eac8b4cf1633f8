//! Pipeline step trait definition.

use super::errors::StepResult;
use super::types::{Context, RunState, StepOutcome};

/// One phase of a slideshow run.
///
/// The pipeline calls, in order:
///
/// 1. `validate_input` - check preconditions that only need the context
/// 2. `execute` - do the work and record results in `state`
/// 3. `validate_output` - verify what `execute` recorded (only after
///    [`StepOutcome::Success`])
pub trait PipelineStep: Send + Sync {
    /// Step name, used in logs and error context.
    fn name(&self) -> &str;

    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Perform the step's work. Use `ctx.logger` for run log lines and
    /// `ctx.report_progress()` for progress.
    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome>;

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}
