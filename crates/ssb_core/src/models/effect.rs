//! Motion effects and effect group sizes.

use serde::{Deserialize, Serialize};

/// Segments shorter than or equal to this many seconds never get the zoom
/// effect, even when selected for the zoom group.
pub const ZOOM_MIN_DURATION_SECS: f64 = 6.0;

/// Motion treatment applied to a segment's still image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Plain scale, no motion.
    #[default]
    None,
    /// Progressive centered zoom.
    Zoom,
    /// Left-to-right horizontal slide.
    Pan,
    /// Sinusoidal camera shake.
    Shake,
}

impl Effect {
    /// The effect actually rendered for a segment of `duration_secs`.
    ///
    /// Zoom falls back to no effect on short segments; every other
    /// effect is kept as assigned.
    pub fn resolve(self, duration_secs: f64) -> Effect {
        match self {
            Effect::Zoom if duration_secs <= ZOOM_MIN_DURATION_SECS => Effect::None,
            other => other,
        }
    }

    pub fn is_motion(&self) -> bool {
        !matches!(self, Effect::None)
    }

    /// Upper-case label used in run log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Effect::None => "NONE",
            Effect::Zoom => "ZOOM",
            Effect::Pan => "PAN",
            Effect::Shake => "SHAKE",
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "none"),
            Effect::Zoom => write!(f, "zoom"),
            Effect::Pan => write!(f, "pan"),
            Effect::Shake => write!(f, "shake"),
        }
    }
}

/// Requested number of segments per motion effect.
///
/// Over-requesting is allowed; groups are filled in zoom, pan, shake order
/// until the available keys run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectCounts {
    pub zoom: usize,
    pub pan: usize,
    pub shake: usize,
}

impl EffectCounts {
    pub fn new(zoom: usize, pan: usize, shake: usize) -> Self {
        Self { zoom, pan, shake }
    }

    pub fn total(&self) -> usize {
        self.zoom.saturating_add(self.pan).saturating_add(self.shake)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_needs_more_than_six_seconds() {
        assert_eq!(Effect::Zoom.resolve(6.0), Effect::None);
        assert_eq!(Effect::Zoom.resolve(3.2), Effect::None);
        assert_eq!(Effect::Zoom.resolve(6.01), Effect::Zoom);
    }

    #[test]
    fn other_effects_ignore_duration() {
        assert_eq!(Effect::Pan.resolve(1.0), Effect::Pan);
        assert_eq!(Effect::Shake.resolve(0.5), Effect::Shake);
        assert_eq!(Effect::None.resolve(60.0), Effect::None);
    }

    #[test]
    fn effect_serializes_lowercase() {
        let json = serde_json::to_string(&Effect::Shake).unwrap();
        assert_eq!(json, "\"shake\"");
    }

    #[test]
    fn counts_total_saturates() {
        assert_eq!(EffectCounts::new(1, 2, 3).total(), 6);
        assert_eq!(EffectCounts::new(usize::MAX, 1, 0).total(), usize::MAX);
    }
}
