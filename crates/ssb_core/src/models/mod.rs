//! Data models for Slideshow Builder.
//!
//! - Segment identity and per-segment render records
//! - Motion effects and requested group sizes
//! - Run requests and the form they are validated from
//! - Artifact layout inside the input folder

mod effect;
mod layout;
mod request;
mod segment;

pub use effect::{Effect, EffectCounts, ZOOM_MIN_DURATION_SECS};
pub use layout::{RunLayout, MANIFEST_FILE_NAME, OUTPUT_FILE_NAME, TEMP_DIR_NAME};
pub use request::{FormError, RunForm, RunRequest, Severity};
pub use segment::{KeyParseError, Segment, SegmentKey, SegmentRender};
