//! Concat demuxer manifest (`file '<path>'` per line).

use std::fs;
use std::io;
use std::path::Path;

/// Manifest text for `clips`, in the given order, newline-separated.
///
/// Single quotes in paths are closed, escaped and reopened (`'\''`) as
/// the concat demuxer expects.
pub fn manifest_contents<P: AsRef<Path>>(clips: &[P]) -> String {
    clips
        .iter()
        .map(|clip| {
            let path = clip.as_ref().to_string_lossy();
            format!("file '{}'", path.replace('\'', r"'\''"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the manifest for `clips` to `manifest_path`.
pub fn write_manifest<P: AsRef<Path>>(manifest_path: &Path, clips: &[P]) -> io::Result<()> {
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(manifest_path, manifest_contents(clips))
}

/// Clip paths listed in a manifest, in order. Inverse of
/// [`manifest_contents`] for manifests this module wrote.
pub fn read_manifest(manifest_path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(manifest_path)?;
    Ok(content
        .lines()
        .filter_map(|line| line.strip_prefix("file '")?.strip_suffix('\''))
        .map(|quoted| quoted.replace(r"'\''", "'"))
        .collect())
}
