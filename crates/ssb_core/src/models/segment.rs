//! Segment identity and per-segment records.

use std::cmp::Ordering;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::effect::Effect;

/// Numeric identifier of a segment, derived from a file base name.
///
/// Keeps the raw text (used for output file names) next to its integer
/// value (used for ordering). `"007"` and `"7"` compare by value first,
/// then by raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SegmentKey {
    raw: String,
    number: i64,
}

impl SegmentKey {
    /// Parse a base name into a key. Surrounding whitespace is not accepted.
    pub fn parse(raw: impl Into<String>) -> Result<Self, KeyParseError> {
        let raw = raw.into();
        match raw.parse::<i64>() {
            Ok(number) => Ok(Self { raw, number }),
            Err(_) => Err(KeyParseError(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn number(&self) -> i64 {
        self.number
    }
}

impl Ord for SegmentKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for SegmentKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for SegmentKey {
    type Error = KeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SegmentKey> for String {
    fn from(key: SegmentKey) -> Self {
        key.raw
    }
}

/// A base name shared by an image and an audio file that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("segment name '{0}' is not a number")]
pub struct KeyParseError(pub String);

/// One paired image + audio unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub key: SegmentKey,
    pub image: PathBuf,
    pub audio: PathBuf,
    /// Where the rendered clip for this segment is written.
    pub clip_path: PathBuf,
}

/// Outcome of rendering one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRender {
    pub key: SegmentKey,
    /// Measured audio length; `None` if probing failed.
    pub duration_secs: Option<f64>,
    /// Effect actually rendered (after the zoom duration rule).
    pub effect: Effect,
    pub clip_path: PathBuf,
    /// Whether the clip exists and is non-empty.
    pub produced: bool,
}
