//! Segment discovery from an input folder.
//!
//! Pairs image and audio files by base name. Only names present in both
//! sets become segments, sorted by their numeric value.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::DiscoverySettings;
use crate::models::{KeyParseError, RunLayout, Segment, SegmentKey};

/// Errors that abort discovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cannot read input folder {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    NonNumericKey(#[from] KeyParseError),
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Result of scanning an input folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    /// Matched pairs in ascending numeric key order.
    pub segments: Vec<Segment>,
    /// Image base names with no audio partner.
    pub unmatched_images: Vec<String>,
    /// Audio base names with no image partner.
    pub unmatched_audio: Vec<String>,
}

/// Scan `layout.input_dir()` and pair files by base name.
///
/// Extensions are matched case-insensitively. When two files of the same
/// kind share a base name (`1.jpg` and `1.JPG`), the one whose file name
/// sorts first wins. Fails if any matched base name is not an integer.
pub fn discover_segments(
    layout: &RunLayout,
    settings: &DiscoverySettings,
) -> DiscoveryResult<Discovery> {
    let dir = layout.input_dir();
    let entries = list_files(dir)?;

    let mut images: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut audio: BTreeMap<String, PathBuf> = BTreeMap::new();

    for path in entries {
        let Some((stem, ext)) = split_name(&path) else {
            continue;
        };

        if has_extension(&settings.image_extensions, &ext) {
            images.entry(stem).or_insert(path);
        } else if has_extension(&settings.audio_extensions, &ext) {
            audio.entry(stem).or_insert(path);
        }
    }

    let mut segments = Vec::new();
    for (stem, image) in &images {
        if let Some(audio_path) = audio.get(stem) {
            let key = SegmentKey::parse(stem.clone())?;
            segments.push(Segment {
                clip_path: layout.clip_path(&key),
                key,
                image: image.clone(),
                audio: audio_path.clone(),
            });
        }
    }
    segments.sort_by(|a, b| a.key.cmp(&b.key));

    let unmatched_images: Vec<String> = images
        .keys()
        .filter(|k| !audio.contains_key(*k))
        .cloned()
        .collect();
    let unmatched_audio: Vec<String> = audio
        .keys()
        .filter(|k| !images.contains_key(*k))
        .cloned()
        .collect();

    tracing::debug!(
        "Discovered {} segments in {} ({} unmatched images, {} unmatched audio)",
        segments.len(),
        dir.display(),
        unmatched_images.len(),
        unmatched_audio.len()
    );

    Ok(Discovery {
        segments,
        unmatched_images,
        unmatched_audio,
    })
}

/// Regular files directly inside `dir`, sorted by file name.
fn list_files(dir: &Path) -> DiscoveryResult<Vec<PathBuf>> {
    let read_err = |source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Split a path into (base name, lowercase extension).
fn split_name(path: &Path) -> Option<(String, String)> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some((stem.to_string(), ext.to_ascii_lowercase()))
}

fn has_extension(allowed: &[String], ext: &str) -> bool {
    allowed
        .iter()
        .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    fn keys(discovery: &Discovery) -> Vec<&str> {
        discovery.segments.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn pairs_are_intersection_in_numeric_order() {
        let dir = tempdir().unwrap();
        for name in ["10.jpg", "10.mp3", "2.jpg", "2.mp3", "1.jpg", "1.mp3"] {
            touch(dir.path(), name);
        }
        touch(dir.path(), "3.jpg");
        touch(dir.path(), "4.mp3");
        touch(dir.path(), "notes.txt");

        let layout = RunLayout::new(dir.path());
        let found = discover_segments(&layout, &DiscoverySettings::default()).unwrap();

        assert_eq!(keys(&found), vec!["1", "2", "10"]);
        assert_eq!(found.unmatched_images, vec!["3"]);
        assert_eq!(found.unmatched_audio, vec!["4"]);

        let first = &found.segments[0];
        assert_eq!(first.image, dir.path().join("1.jpg"));
        assert_eq!(first.audio, dir.path().join("1.mp3"));
        assert_eq!(first.clip_path, dir.path().join("temp").join("part_1.mp4"));
    }

    #[test]
    fn extensions_match_case_insensitively() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "5.JPG");
        touch(dir.path(), "5.Mp3");

        let layout = RunLayout::new(dir.path());
        let found = discover_segments(&layout, &DiscoverySettings::default()).unwrap();
        assert_eq!(keys(&found), vec!["5"]);
        assert_eq!(found.segments[0].image, dir.path().join("5.JPG"));
    }

    #[test]
    fn duplicate_base_name_prefers_first_file_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "1.jpg");
        touch(dir.path(), "1.JPG");
        touch(dir.path(), "1.mp3");

        let layout = RunLayout::new(dir.path());
        let found = discover_segments(&layout, &DiscoverySettings::default()).unwrap();
        assert_eq!(found.segments.len(), 1);
        assert_eq!(found.segments[0].image, dir.path().join("1.JPG"));
    }

    #[test]
    fn non_numeric_matched_key_fails() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "intro.jpg");
        touch(dir.path(), "intro.mp3");
        touch(dir.path(), "1.jpg");
        touch(dir.path(), "1.mp3");

        let layout = RunLayout::new(dir.path());
        let err = discover_segments(&layout, &DiscoverySettings::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::NonNumericKey(ref e) if e.0 == "intro"));
    }

    #[test]
    fn unmatched_non_numeric_names_are_ignored() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "cover.jpg");
        touch(dir.path(), "1.jpg");
        touch(dir.path(), "1.mp3");

        let layout = RunLayout::new(dir.path());
        let found = discover_segments(&layout, &DiscoverySettings::default()).unwrap();
        assert_eq!(keys(&found), vec!["1"]);
    }

    #[test]
    fn directories_are_not_segments() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("1.jpg")).unwrap();
        touch(dir.path(), "1.mp3");

        let layout = RunLayout::new(dir.path());
        let found = discover_segments(&layout, &DiscoverySettings::default()).unwrap();
        assert!(found.segments.is_empty());
    }

    #[test]
    fn custom_extensions() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "1.png");
        touch(dir.path(), "1.wav");
        touch(dir.path(), "2.jpg");
        touch(dir.path(), "2.mp3");

        let settings = DiscoverySettings {
            image_extensions: vec!["png".to_string(), ".jpg".to_string()],
            audio_extensions: vec!["wav".to_string(), "mp3".to_string()],
        };
        let layout = RunLayout::new(dir.path());
        let found = discover_segments(&layout, &settings).unwrap();
        assert_eq!(keys(&found), vec!["1", "2"]);
    }

    #[test]
    fn missing_folder_is_read_error() {
        let dir = tempdir().unwrap();
        let layout = RunLayout::new(dir.path().join("absent"));
        let err = discover_segments(&layout, &DiscoverySettings::default()).unwrap_err();
        assert!(matches!(err, DiscoveryError::ReadDir { .. }));
    }
}
