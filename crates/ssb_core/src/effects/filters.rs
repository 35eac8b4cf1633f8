//! ffmpeg filter graphs for each motion effect.
//!
//! These strings are a contract with ffmpeg's filter language and are kept
//! byte-for-byte stable; changing them changes how every effect looks.

use crate::models::Effect;

/// Output frame size of every rendered clip.
pub const OUTPUT_WIDTH: u32 = 1280;
pub const OUTPUT_HEIGHT: u32 = 720;

/// Centered progressive zoom, capped at 1.2x.
const ZOOM_GRAPH: &str = "[0:v]scale=1400:788,zoompan=z='min(zoom+0.0015,1.2)':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d=1:s=1280x720,format=yuv420p[v]";

/// 5px, 3Hz sinusoidal jitter on both axes.
const SHAKE_GRAPH: &str =
    "[0:v]scale=1280:720,crop=1280:720:x='5*sin(2*PI*t*3)':y='5*cos(2*PI*t*3)',format=yuv420p[v]";

/// Label of the filtered video stream in complex graphs.
pub const VIDEO_LABEL: &str = "[v]";

/// How the video stream of a clip is filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoFilter {
    /// `-filter_complex <graph>` producing [`VIDEO_LABEL`].
    Complex(String),
    /// `-vf <filter>` on the looped image input.
    Simple(String),
}

/// Filter for `effect` on a clip lasting `duration_secs`.
///
/// The pan window crosses the whole scaled width over exactly the clip
/// duration, so the duration is embedded in the graph.
pub fn video_filter(effect: Effect, duration_secs: f64) -> VideoFilter {
    match effect {
        Effect::Zoom => VideoFilter::Complex(ZOOM_GRAPH.to_string()),
        Effect::Pan => VideoFilter::Complex(format!(
            "[0:v]scale=1500:720,crop=1280:720:x='(in_w-out_w)*t/{}':y=0,format=yuv420p[v]",
            format_seconds(duration_secs)
        )),
        Effect::Shake => VideoFilter::Complex(SHAKE_GRAPH.to_string()),
        Effect::None => VideoFilter::Simple(format!("scale={}:{}", OUTPUT_WIDTH, OUTPUT_HEIGHT)),
    }
}

/// Seconds in shortest round-trip form, always with a fractional part
/// (`7.5`, `12.0`, `7.053061224489796`).
pub fn format_seconds(secs: f64) -> String {
    format!("{:?}", secs)
}
