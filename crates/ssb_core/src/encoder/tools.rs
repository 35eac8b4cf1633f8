//! Locating the external tools before a run starts.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::ToolSettings;

use super::errors::{EncoderError, EncoderResult};

/// Resolved executable paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolve both tools from settings, falling back to `PATH`.
    ///
    /// A configured path must point at an existing file.
    pub fn resolve(settings: &ToolSettings) -> EncoderResult<Self> {
        Ok(Self {
            ffmpeg: resolve_tool("ffmpeg", &settings.ffmpeg_path)?,
            ffprobe: resolve_tool("ffprobe", &settings.ffprobe_path)?,
        })
    }
}

fn resolve_tool(name: &str, configured: &str) -> EncoderResult<PathBuf> {
    let configured = configured.trim();
    if !configured.is_empty() {
        let path = PathBuf::from(configured);
        return if path.is_file() {
            Ok(path)
        } else {
            Err(EncoderError::ToolNotFound(format!(
                "{} (configured as {})",
                name, configured
            )))
        };
    }

    find_in_path(name).ok_or_else(|| EncoderError::ToolNotFound(name.to_string()))
}

/// First file named `tool` (or `tool.exe` on Windows) along `PATH`.
pub fn find_in_path(tool: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var).find_map(|dir| candidate(&dir, tool))
}

fn candidate(dir: &Path, tool: &str) -> Option<PathBuf> {
    let full = dir.join(tool);
    if full.is_file() {
        return Some(full);
    }
    #[cfg(windows)]
    {
        let exe = dir.join(format!("{tool}.exe"));
        if exe.is_file() {
            return Some(exe);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn configured_path_must_exist() {
        let settings = ToolSettings {
            ffmpeg_path: "/nowhere/ffmpeg".to_string(),
            ffprobe_path: String::new(),
        };
        let err = ToolPaths::resolve(&settings).unwrap_err();
        assert!(matches!(err, EncoderError::ToolNotFound(ref m) if m.contains("/nowhere/ffmpeg")));
    }

    #[test]
    fn configured_paths_are_used() {
        let dir = tempdir().unwrap();
        let ffmpeg = dir.path().join("ffmpeg-custom");
        let ffprobe = dir.path().join("ffprobe-custom");
        std::fs::write(&ffmpeg, b"").unwrap();
        std::fs::write(&ffprobe, b"").unwrap();

        let settings = ToolSettings {
            ffmpeg_path: ffmpeg.to_string_lossy().to_string(),
            ffprobe_path: ffprobe.to_string_lossy().to_string(),
        };
        let tools = ToolPaths::resolve(&settings).unwrap();
        assert_eq!(tools.ffmpeg, ffmpeg);
        assert_eq!(tools.ffprobe, ffprobe);
    }

    #[test]
    fn candidate_finds_file_in_dir() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("ffmpeg"), b"").unwrap();
        assert_eq!(candidate(dir.path(), "ffmpeg"), Some(dir.path().join("ffmpeg")));
        assert_eq!(candidate(dir.path(), "ffprobe"), None);
    }
}
