//! Collision-safe staging of retrieved streams.
//!
//! The retrieval adapter names files from extractor-assigned identifiers,
//! and the video and audio requests of the same asset may share an
//! identifier. Each stream is therefore renamed to a pipeline-private name
//! as soon as it lands, before the second retrieval begins, so nothing can
//! silently overwrite it.

use crate::error::{Error, Result, StreamKind};
use std::path::{Path, PathBuf};

/// Marker token inserted before the file extension of a staged stream.
fn stage_marker(kind: StreamKind) -> &'static str {
    match kind {
        StreamKind::Video => "grab-video",
        StreamKind::Audio => "grab-audio",
    }
}

/// Compute the pipeline-private name for a retrieved file.
///
/// `clip.m4a` staged as audio becomes `clip.grab-audio.m4a`; a file with
/// no extension gets the marker appended as its extension.
pub fn staged_path(retrieved: &Path, kind: StreamKind) -> PathBuf {
    let marker = stage_marker(kind);
    match retrieved.extension() {
        Some(ext) => {
            let stem = retrieved.file_stem().unwrap_or_default().to_os_string();
            let mut name = stem;
            name.push(".");
            name.push(marker);
            name.push(".");
            name.push(ext);
            retrieved.with_file_name(name)
        }
        None => retrieved.with_extension(marker),
    }
}

/// Rename a freshly retrieved file to its pipeline-private name.
///
/// The move is exclusive: if the staged name already exists (stale run),
/// this fails with [`Error::StagingCollision`] and leaves the retrieved
/// file in place.
pub fn stage(retrieved: &Path, kind: StreamKind) -> Result<PathBuf> {
    let target = staged_path(retrieved, kind);
    if target.exists() {
        return Err(Error::StagingCollision { path: target });
    }
    std::fs::rename(retrieved, &target)?;
    tracing::debug!(from = %retrieved.display(), to = %target.display(), "staged {kind} stream");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_staged_path_inserts_marker() {
        assert_eq!(
            staged_path(Path::new("/tmp/abc123.mp4"), StreamKind::Video),
            PathBuf::from("/tmp/abc123.grab-video.mp4")
        );
        assert_eq!(
            staged_path(Path::new("/tmp/abc123.m4a"), StreamKind::Audio),
            PathBuf::from("/tmp/abc123.grab-audio.m4a")
        );
        assert_eq!(
            staged_path(Path::new("/tmp/abc123"), StreamKind::Video),
            PathBuf::from("/tmp/abc123.grab-video")
        );
    }

    #[test]
    fn test_stage_moves_file() {
        let dir = tempdir().unwrap();
        let retrieved = dir.path().join("xyz.mp4");
        std::fs::write(&retrieved, b"video bytes").unwrap();

        let staged = stage(&retrieved, StreamKind::Video).unwrap();
        assert!(!retrieved.exists());
        assert_eq!(staged, dir.path().join("xyz.grab-video.mp4"));
        assert_eq!(std::fs::read(&staged).unwrap(), b"video bytes");
    }

    /// Video and audio retrievals sharing an identifier stage to distinct names.
    #[test]
    fn test_video_and_audio_do_not_collide() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("same-id.mp4");
        std::fs::write(&first, b"video").unwrap();
        let video = stage(&first, StreamKind::Video).unwrap();

        let second = dir.path().join("same-id.mp4");
        std::fs::write(&second, b"audio").unwrap();
        let audio = stage(&second, StreamKind::Audio).unwrap();

        assert_ne!(video, audio);
        assert_eq!(std::fs::read(&video).unwrap(), b"video");
        assert_eq!(std::fs::read(&audio).unwrap(), b"audio");
    }

    #[test]
    fn test_stale_staged_file_collides() {
        let dir = tempdir().unwrap();
        let retrieved = dir.path().join("clip.mp4");
        std::fs::write(&retrieved, b"new").unwrap();
        std::fs::write(dir.path().join("clip.grab-video.mp4"), b"stale").unwrap();

        let err = stage(&retrieved, StreamKind::Video).unwrap_err();
        assert!(matches!(err, Error::StagingCollision { .. }));
        // The retrieved file is untouched for inspection or retry.
        assert!(retrieved.exists());
    }
}
