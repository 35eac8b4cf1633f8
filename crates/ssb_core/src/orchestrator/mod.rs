//! Pipeline orchestrator for slideshow runs.
//!
//! A run is a fixed sequence of steps that validate, execute, and record
//! their results in a shared [`RunState`].
//!
//! # Architecture
//!
//! ```text
//! SlideshowRunner (on the worker thread)
//!     └── Pipeline
//!             ├── Step: Discover
//!             ├── Step: AssignEffects
//!             ├── Step: Render
//!             └── Step: Concatenate
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ssb_core::orchestrator::{spawn_run, SlideshowRunner};
//!
//! let runner = Arc::new(SlideshowRunner::from_tools(settings, &tools));
//! let handle = spawn_run(runner, request, Some(log_cb), Some(progress_cb))?;
//! let result = handle.wait()?;
//! println!("Failed segments: {:?}", result.failed_keys());
//! ```

mod errors;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;
mod worker;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{Pipeline, PipelineRunResult};
pub use runner::{RunPlan, RunResult, SlideshowRunner};
pub use step::PipelineStep;
pub use steps::{AssignEffectsStep, ConcatStep, DiscoverStep, RenderStep};
pub use types::{
    ConcatOutput, Context, DiscoveryOutput, ProgressCallback, RenderOutput, RunState,
    StepOutcome,
};
pub use worker::{spawn_run, RunHandle, WORKER_THREAD_NAME};

/// The full run: discover, assign, render, concatenate.
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(DiscoverStep::new())
        .with_step(AssignEffectsStep::new())
        .with_step(RenderStep::new())
        .with_step(ConcatStep::new())
}

/// Discovery and effect assignment only, for previewing a run.
pub fn create_plan_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(DiscoverStep::new())
        .with_step(AssignEffectsStep::new())
}
