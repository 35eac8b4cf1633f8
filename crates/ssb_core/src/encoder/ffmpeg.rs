//! The encoder seam and its ffmpeg implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::logging::RunLogger;

use super::command::{concat_args, format_command_line, render_args, RenderJob};
use super::errors::{EncoderError, EncoderResult};

/// The two opaque operations the pipeline asks of an external encoder.
///
/// Both calls block until the encoder finishes. Implementations may write
/// diagnostic output to `logger` but must not decide whether a clip counts
/// as produced; the caller checks the output file.
pub trait Encoder: Send + Sync {
    /// Encode one still-image clip.
    fn render(&self, job: &RenderJob, logger: &RunLogger) -> EncoderResult<()>;

    /// Stream-copy the clips listed in `manifest` into `output`.
    fn concatenate(&self, manifest: &Path, output: &Path, logger: &RunLogger)
        -> EncoderResult<()>;
}

/// [`Encoder`] that shells out to ffmpeg.
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run ffmpeg once, routing its stderr into the logger's tail buffer.
    fn run(&self, args: &[OsString], logger: &RunLogger) -> EncoderResult<()> {
        logger.command(&format_command_line(self.program.as_os_str(), args));
        logger.clear_tail();

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| EncoderError::Spawn {
                tool: "ffmpeg".to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            logger.output_line(line, true);
        }

        if output.status.success() {
            return Ok(());
        }

        let exit_code = output.status.code().unwrap_or(-1);
        let last_line = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("no output")
            .trim()
            .to_string();
        Err(EncoderError::command_failed("ffmpeg", exit_code, last_line))
    }
}

impl Encoder for FfmpegEncoder {
    fn render(&self, job: &RenderJob, logger: &RunLogger) -> EncoderResult<()> {
        self.run(&render_args(job), logger)
    }

    fn concatenate(
        &self,
        manifest: &Path,
        output: &Path,
        logger: &RunLogger,
    ) -> EncoderResult<()> {
        self.run(&concat_args(manifest, output), logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;
    use crate::models::Effect;
    use tempfile::tempdir;

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();
        let encoder = FfmpegEncoder::new(dir.path().join("no-such-ffmpeg"));

        let job = RenderJob {
            image: dir.path().join("1.jpg"),
            audio: dir.path().join("1.mp3"),
            duration_secs: 3.0,
            effect: Effect::None,
            output: dir.path().join("part_1.mp4"),
        };

        let err = encoder.render(&job, &logger).unwrap_err();
        assert!(matches!(err, EncoderError::Spawn { .. }));

        logger.flush();
        let log = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(log.contains("no-such-ffmpeg -y -loop 1"));
    }
}
