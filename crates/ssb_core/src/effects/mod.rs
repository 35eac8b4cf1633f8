//! Effect assignment and per-effect ffmpeg filters.

mod assign;
mod filters;

pub use assign::{assign_effects, run_rng, EffectAssignment};
pub use filters::{
    format_seconds, video_filter, VideoFilter, OUTPUT_HEIGHT, OUTPUT_WIDTH, VIDEO_LABEL,
};
