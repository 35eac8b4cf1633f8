//! External encoder integration.
//!
//! Everything that touches ffmpeg or ffprobe lives here:
//! - `command`: exact argument lists for render, concat and probe
//! - `manifest`: the concat demuxer file list
//! - `ffmpeg`: the [`Encoder`] seam and its process-backed implementation
//! - `probe`: the [`MediaProbe`] seam for audio durations
//! - `tools`: locating the executables

mod command;
mod errors;
mod ffmpeg;
mod manifest;
mod probe;
mod tools;

pub use command::{concat_args, format_command_line, probe_args, render_args, RenderJob};
pub use errors::{EncoderError, EncoderResult};
pub use ffmpeg::{Encoder, FfmpegEncoder};
pub use manifest::{manifest_contents, read_manifest, write_manifest};
pub use probe::{FfprobeProbe, MediaProbe};
pub use tools::{find_in_path, ToolPaths};
