//! Argument lists for every ffmpeg/ffprobe invocation.
//!
//! Kept separate from process spawning so the exact command lines can be
//! checked without running anything.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::effects::{format_seconds, video_filter, VideoFilter, VIDEO_LABEL};
use crate::models::Effect;

/// One still-image clip to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub image: PathBuf,
    pub audio: PathBuf,
    pub duration_secs: f64,
    /// Effect after the zoom duration rule has been applied.
    pub effect: Effect,
    pub output: PathBuf,
}

/// ffmpeg arguments rendering `job` into a clip of the audio's length.
pub fn render_args(job: &RenderJob) -> Vec<OsString> {
    let duration = format_seconds(job.duration_secs);

    let mut args: Vec<OsString> = vec!["-y".into(), "-loop".into(), "1".into(), "-i".into()];
    args.push(job.image.clone().into());
    args.push("-i".into());
    args.push(job.audio.clone().into());

    match video_filter(job.effect, job.duration_secs) {
        VideoFilter::Complex(graph) => {
            args.extend(
                [
                    "-filter_complex",
                    graph.as_str(),
                    "-map",
                    VIDEO_LABEL,
                    "-map",
                    "1:a",
                    "-t",
                    duration.as_str(),
                ]
                .map(OsString::from),
            );
        }
        VideoFilter::Simple(filter) => {
            args.extend(["-t", duration.as_str(), "-vf", filter.as_str()].map(OsString::from));
        }
    }

    args.extend(
        ["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac"].map(OsString::from),
    );
    args.push(job.output.clone().into());
    args
}

/// ffmpeg arguments for lossless stream-copy concatenation.
pub fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
        .map(OsString::from)
        .to_vec();
    args.push(manifest.into());
    args.extend(["-c", "copy"].map(OsString::from));
    args.push(output.into());
    args
}

/// ffprobe arguments printing the container duration as JSON.
pub fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "json",
    ]
    .map(OsString::from)
    .to_vec();
    args.push(path.into());
    args
}

/// Human-readable command line for logs. Arguments with spaces or quotes
/// are single-quoted.
pub fn format_command_line(program: &OsStr, args: &[OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(OsString::as_os_str))
        .map(|a| quote_arg(&a.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().to_string()).collect()
    }

    fn job(effect: Effect, duration_secs: f64) -> RenderJob {
        RenderJob {
            image: PathBuf::from("/in/3.jpg"),
            audio: PathBuf::from("/in/3.mp3"),
            duration_secs,
            effect,
            output: PathBuf::from("/in/temp/part_3.mp4"),
        }
    }

    #[test]
    fn zoom_command_uses_filter_complex() {
        let args = strings(&render_args(&job(Effect::Zoom, 8.5)));
        assert_eq!(
            args,
            vec![
                "-y",
                "-loop",
                "1",
                "-i",
                "/in/3.jpg",
                "-i",
                "/in/3.mp3",
                "-filter_complex",
                "[0:v]scale=1400:788,zoompan=z='min(zoom+0.0015,1.2)':x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':d=1:s=1280x720,format=yuv420p[v]",
                "-map",
                "[v]",
                "-map",
                "1:a",
                "-t",
                "8.5",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "/in/temp/part_3.mp4",
            ]
        );
    }

    #[test]
    fn pan_command_passes_duration_twice() {
        let args = strings(&render_args(&job(Effect::Pan, 4.0)));
        assert!(args.contains(
            &"[0:v]scale=1500:720,crop=1280:720:x='(in_w-out_w)*t/4.0':y=0,format=yuv420p[v]"
                .to_string()
        ));
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "4.0");
    }

    #[test]
    fn plain_command_uses_vf() {
        let args = strings(&render_args(&job(Effect::None, 3.25)));
        assert_eq!(
            args,
            vec![
                "-y",
                "-loop",
                "1",
                "-i",
                "/in/3.jpg",
                "-i",
                "/in/3.mp3",
                "-t",
                "3.25",
                "-vf",
                "scale=1280:720",
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-c:a",
                "aac",
                "/in/temp/part_3.mp4",
            ]
        );
        assert!(!args.iter().any(|a| a == "-map"));
    }

    #[test]
    fn concat_command() {
        let args = strings(&concat_args(
            Path::new("/in/temp/file_list.txt"),
            Path::new("/in/output_video.mp4"),
        ));
        assert_eq!(
            args,
            vec![
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                "/in/temp/file_list.txt",
                "-c",
                "copy",
                "/in/output_video.mp4",
            ]
        );
    }

    #[test]
    fn probe_command() {
        let args = strings(&probe_args(Path::new("/in/1.mp3")));
        assert_eq!(args.last().unwrap(), "/in/1.mp3");
        assert!(args.contains(&"format=duration".to_string()));
    }

    #[test]
    fn command_line_quotes_when_needed() {
        let args: Vec<OsString> = vec!["-i".into(), "/my photos/1.jpg".into(), "x='a'".into()];
        assert_eq!(
            format_command_line(OsStr::new("ffmpeg"), &args),
            r"ffmpeg -i '/my photos/1.jpg' 'x='\''a'\'''"
        );
    }
}
