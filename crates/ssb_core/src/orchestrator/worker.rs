//! Background execution of a run on one dedicated thread.

use std::any::Any;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::logging::GuiLogCallback;
use crate::models::RunRequest;

use super::errors::{PipelineError, PipelineResult};
use super::runner::{RunResult, SlideshowRunner};
use super::types::ProgressCallback;

/// Name of the worker thread, visible in panics and debuggers.
pub const WORKER_THREAD_NAME: &str = "slideshow-worker";

/// Handle to a run executing on its worker thread.
pub struct RunHandle {
    run_name: String,
    handle: JoinHandle<PipelineResult<RunResult>>,
}

impl RunHandle {
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Block until the run ends. A panic on the worker becomes
    /// [`PipelineError::WorkerPanicked`].
    pub fn wait(self) -> PipelineResult<RunResult> {
        match self.handle.join() {
            Ok(result) => result,
            Err(payload) => Err(PipelineError::worker_panicked(
                &self.run_name,
                panic_message(payload.as_ref()),
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Start `request` on a new worker thread.
///
/// Exactly one thread is spawned; discovery, assignment, rendering and
/// concatenation all run on it in order, and both callbacks are invoked
/// from it.
pub fn spawn_run(
    runner: Arc<SlideshowRunner>,
    request: RunRequest,
    log_callback: Option<GuiLogCallback>,
    progress_callback: Option<ProgressCallback>,
) -> PipelineResult<RunHandle> {
    let run_name = request.run_name();

    let handle = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || runner.run(request, log_callback, progress_callback))
        .map_err(|e| {
            PipelineError::setup_failed(&run_name, format!("Failed to spawn worker thread: {}", e))
        })?;

    tracing::debug!("Worker thread started for run '{}'", run_name);
    Ok(RunHandle { run_name, handle })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Encoder, EncoderResult, RenderJob};
    use crate::logging::{init_test_tracing, RunLogger};
    use crate::models::EffectCounts;
    use crate::test_support::{segment_folder, test_settings, FakeEncoder, FakeProbe};
    use parking_lot::Mutex;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn callbacks_run_on_the_worker_thread() {
        init_test_tracing();
        let input = tempdir().unwrap();
        let logs = tempdir().unwrap();
        segment_folder(input.path(), &["1", "2"]);

        let runner = Arc::new(SlideshowRunner::new(
            test_settings(logs.path()),
            Arc::new(FakeEncoder::new()),
            Arc::new(FakeProbe::new(9.0)),
        ));

        let threads = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&threads);
        let progress: ProgressCallback = Box::new(move |_| {
            let name = thread::current().name().map(str::to_string);
            seen.lock().push(name);
        });

        let request = RunRequest::new(input.path(), EffectCounts::new(1, 1, 0));
        let handle = spawn_run(runner, request, None, Some(progress)).unwrap();
        let result = handle.wait().unwrap();

        assert_eq!(result.segments.len(), 2);
        let threads = threads.lock();
        assert_eq!(threads.len(), 2);
        assert!(threads
            .iter()
            .all(|n| n.as_deref() == Some(WORKER_THREAD_NAME)));
    }

    struct PanickingEncoder;

    impl Encoder for PanickingEncoder {
        fn render(&self, _job: &RenderJob, _logger: &RunLogger) -> EncoderResult<()> {
            panic!("encoder exploded");
        }

        fn concatenate(&self, _m: &Path, _o: &Path, _logger: &RunLogger) -> EncoderResult<()> {
            Ok(())
        }
    }

    #[test]
    fn worker_panic_becomes_error() {
        let input = tempdir().unwrap();
        let logs = tempdir().unwrap();
        segment_folder(input.path(), &["1"]);

        let runner = Arc::new(SlideshowRunner::new(
            test_settings(logs.path()),
            Arc::new(PanickingEncoder),
            Arc::new(FakeProbe::new(9.0)),
        ));
        let request = RunRequest::new(input.path(), EffectCounts::default());
        let err = spawn_run(runner, request, None, None)
            .unwrap()
            .wait()
            .unwrap_err();

        match err {
            PipelineError::WorkerPanicked { message, .. } => {
                assert_eq!(message, "encoder exploded")
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
