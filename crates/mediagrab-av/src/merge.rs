//! Mux/remux orchestration via the external combiner.
//!
//! The combiner (ffmpeg) is invoked once per item, stream-copy only. A
//! single-carrier selection is remuxed into the output container; a
//! two-stream selection is merged, with the video input's audio and the
//! audio input's video explicitly dropped. Only the exit status is
//! observed; all of the subprocess's streams are discarded.

use crate::error::{Error, Result};
use crate::tools;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Fixed output container extension. Stream-copy into mp4 keeps the output
/// universally playable regardless of source codecs.
pub const OUTPUT_EXT: &str = "mp4";

/// One combine invocation: staged inputs and the final output path.
#[derive(Debug, Clone)]
pub struct MergeJob {
    /// Staged video stream (or the single pre-muxed carrier).
    pub video: PathBuf,
    /// Staged audio stream; `None` when the video carrier already has audio.
    pub audio: Option<PathBuf>,
    /// Final output file, written directly into the destination folder.
    pub output: PathBuf,
}

/// Combines staged streams into one playable output file.
pub trait Muxer {
    /// Run the combiner for one item.
    ///
    /// On success the staged input files are deleted; on failure they are
    /// preserved so the caller can inspect or retry.
    fn combine(&self, job: &MergeJob) -> Result<()>;
}

/// Argument vector for remuxing a single carrier into the output container.
///
/// The overwrite flag comes first so idempotent retries never fail on a
/// pre-existing partial output.
pub fn remux_args(input: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-c".into(),
        "copy".into(),
        output.into(),
    ]
}

/// Argument vector for merging separate video and audio streams.
///
/// `-an` drops the audio of the video input and `-vn` drops the video of
/// the audio input; both streams are copied, nothing is re-encoded.
pub fn merge_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-an".into(),
        "-i".into(),
        video.into(),
        "-vn".into(),
        "-i".into(),
        audio.into(),
        "-c".into(),
        "copy".into(),
        output.into(),
    ]
}

/// [`Muxer`] backed by the ffmpeg CLI.
#[derive(Debug, Clone)]
pub struct FfmpegMuxer {
    ffmpeg: PathBuf,
}

impl FfmpegMuxer {
    /// Use the given ffmpeg binary.
    pub fn new(ffmpeg: PathBuf) -> Self {
        Self { ffmpeg }
    }

    /// Locate ffmpeg on PATH.
    pub fn locate() -> Result<Self> {
        Ok(Self::new(tools::require_tool("ffmpeg")?))
    }
}

impl Muxer for FfmpegMuxer {
    fn combine(&self, job: &MergeJob) -> Result<()> {
        let args = match &job.audio {
            Some(audio) => merge_args(&job.video, audio, &job.output),
            None => remux_args(&job.video, &job.output),
        };

        tracing::info!(
            output = %job.output.display(),
            mode = if job.audio.is_some() { "merge" } else { "remux" },
            "running ffmpeg"
        );

        let status = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found("ffmpeg")
                } else {
                    Error::Io(e)
                }
            })?;

        if !status.success() {
            // Staged inputs stay on disk for inspection or retry.
            return Err(Error::merge_failed(format!("ffmpeg exited with {status}")));
        }

        if !job.output.exists() {
            return Err(Error::merge_failed(format!(
                "ffmpeg reported success but {} does not exist",
                job.output.display()
            )));
        }

        std::fs::remove_file(&job.video)?;
        if let Some(audio) = &job.audio {
            std::fs::remove_file(audio)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_remux_args_shape() {
        let args = remux_args(Path::new("in.grab-video.mp4"), Path::new("Title.mp4"));
        let expected: Vec<OsString> = ["-y", "-i", "in.grab-video.mp4", "-c", "copy", "Title.mp4"]
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_merge_args_shape() {
        let args = merge_args(
            Path::new("v.grab-video.mp4"),
            Path::new("a.grab-audio.m4a"),
            Path::new("Title.mp4"),
        );
        let expected: Vec<OsString> = [
            "-y",
            "-an",
            "-i",
            "v.grab-video.mp4",
            "-vn",
            "-i",
            "a.grab-audio.m4a",
            "-c",
            "copy",
            "Title.mp4",
        ]
        .into_iter()
        .map(Into::into)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_missing_binary_reports_tool_not_found() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("v.grab-video.mp4");
        std::fs::write(&video, b"v").unwrap();

        let muxer = FfmpegMuxer::new(dir.path().join("no-such-ffmpeg"));
        let err = muxer
            .combine(&MergeJob {
                video: video.clone(),
                audio: None,
                output: dir.path().join("out.mp4"),
            })
            .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
        assert!(video.exists());
    }

    /// Exercise the success path with a stand-in combiner that copies its
    /// last `-i` input to the output path.
    #[cfg(unix)]
    fn fake_combiner(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let script = dir.join("fake-ffmpeg");
        std::fs::write(
            &script,
            "#!/bin/sh\nout=\"\"\nprev=\"\"\nsrc=\"\"\nfor a in \"$@\"; do\n  if [ \"$prev\" = \"-i\" ]; then src=\"$a\"; fi\n  prev=\"$a\"\n  out=\"$a\"\ndone\ncp \"$src\" \"$out\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn test_success_deletes_staged_inputs() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("v.grab-video.mp4");
        let audio = dir.path().join("a.grab-audio.m4a");
        std::fs::write(&video, b"video").unwrap();
        std::fs::write(&audio, b"audio").unwrap();
        let output = dir.path().join("Title.mp4");

        let muxer = FfmpegMuxer::new(fake_combiner(dir.path()));
        muxer
            .combine(&MergeJob {
                video: video.clone(),
                audio: Some(audio.clone()),
                output: output.clone(),
            })
            .unwrap();

        assert!(output.exists());
        assert!(!video.exists());
        assert!(!audio.exists());
    }

    /// P5: re-running on the same inputs with the overwrite flag still
    /// produces a single valid output.
    #[cfg(unix)]
    #[test]
    fn test_idempotent_remux() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("Title.mp4");
        let muxer = FfmpegMuxer::new(fake_combiner(dir.path()));

        for _ in 0..2 {
            let video = dir.path().join("v.grab-video.mp4");
            std::fs::write(&video, b"video").unwrap();
            muxer
                .combine(&MergeJob {
                    video,
                    audio: None,
                    output: output.clone(),
                })
                .unwrap();
            assert_eq!(std::fs::read(&output).unwrap(), b"video");
        }
    }

    /// A combiner that exits non-zero must leave the staged inputs alone.
    #[cfg(unix)]
    #[test]
    fn test_failure_preserves_staged_inputs() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let script = dir.path().join("failing-ffmpeg");
        std::fs::write(&script, "#!/bin/sh\nexit 1\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let video = dir.path().join("v.grab-video.mp4");
        std::fs::write(&video, b"video").unwrap();

        let muxer = FfmpegMuxer::new(script);
        let err = muxer
            .combine(&MergeJob {
                video: video.clone(),
                audio: None,
                output: dir.path().join("out.mp4"),
            })
            .unwrap_err();
        assert!(matches!(err, Error::MergeFailed { .. }));
        assert!(video.exists());
    }
}
