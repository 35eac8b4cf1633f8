//! Fixed locations of run artifacts inside the input folder.

use std::path::{Path, PathBuf};

use super::segment::SegmentKey;

/// Subfolder holding per-segment clips and the concat manifest.
pub const TEMP_DIR_NAME: &str = "temp";
/// Concat manifest file name inside the temp folder.
pub const MANIFEST_FILE_NAME: &str = "file_list.txt";
/// Final merged video file name inside the input folder.
pub const OUTPUT_FILE_NAME: &str = "output_video.mp4";

/// Resolved artifact paths for one input folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    input_dir: PathBuf,
    temp_dir: PathBuf,
}

impl RunLayout {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let temp_dir = input_dir.join(TEMP_DIR_NAME);
        Self {
            input_dir,
            temp_dir,
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// `<input>/temp/part_<key>.mp4`
    pub fn clip_path(&self, key: &SegmentKey) -> PathBuf {
        self.temp_dir.join(format!("part_{}.mp4", key))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.input_dir.join(OUTPUT_FILE_NAME)
    }
}
