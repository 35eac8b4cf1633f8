//! Audio duration probing via ffprobe.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;

use super::command::probe_args;
use super::errors::{EncoderError, EncoderResult};

/// Measures media play length.
pub trait MediaProbe: Send + Sync {
    /// Duration of `path` in seconds.
    fn duration_secs(&self, path: &Path) -> EncoderResult<f64>;
}

/// [`MediaProbe`] backed by `ffprobe -show_entries format=duration`.
pub struct FfprobeProbe {
    program: PathBuf,
}

impl FfprobeProbe {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MediaProbe for FfprobeProbe {
    fn duration_secs(&self, path: &Path) -> EncoderResult<f64> {
        if !path.exists() {
            return Err(EncoderError::probe(path, "file not found"));
        }

        let args: Vec<OsString> = probe_args(path);
        tracing::debug!("Probing duration: {}", path.display());

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| EncoderError::Spawn {
                tool: "ffprobe".to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EncoderError::command_failed(
                "ffprobe",
                output.status.code().unwrap_or(-1),
                stderr.trim(),
            ));
        }

        let json: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| EncoderError::probe(path, format!("invalid ffprobe output: {}", e)))?;

        parse_duration_json(&json).ok_or_else(|| EncoderError::probe(path, "no duration reported"))
    }
}

/// Extract `format.duration` from ffprobe JSON output.
///
/// ffprobe reports the value as a string; a bare number is accepted too.
fn parse_duration_json(json: &Value) -> Option<f64> {
    let raw = json.get("format")?.get("duration")?;
    let secs = match raw {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    (secs.is_finite() && secs >= 0.0).then_some(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_string_duration() {
        let v = json!({ "format": { "duration": "7.053061" } });
        assert_eq!(parse_duration_json(&v), Some(7.053061));
    }

    #[test]
    fn parses_numeric_duration() {
        let v = json!({ "format": { "duration": 12.5 } });
        assert_eq!(parse_duration_json(&v), Some(12.5));
    }

    #[test]
    fn rejects_missing_or_bad_duration() {
        assert_eq!(parse_duration_json(&json!({ "format": {} })), None);
        assert_eq!(parse_duration_json(&json!({ "format": { "duration": "N/A" } })), None);
        assert_eq!(parse_duration_json(&json!({ "format": { "duration": "-1" } })), None);
        assert_eq!(parse_duration_json(&json!({})), None);
    }

    #[test]
    fn missing_file_is_probe_error() {
        let probe = FfprobeProbe::new("ffprobe");
        let err = probe
            .duration_secs(Path::new("/definitely/not/here.mp3"))
            .unwrap_err();
        assert!(matches!(err, EncoderError::Probe { .. }));
    }
}
