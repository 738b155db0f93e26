//! The per-item download pipeline.
//!
//! Each item moves through a strict sequence: select formats, retrieve the
//! video stream, retrieve the audio stream (unless one format carries
//! both), stage, merge, done. Any failure drops the item into an error
//! outcome; items of a collection are processed independently and one
//! failure never halts the rest of the run.

use crate::extractor::{MediaSource, StreamFetcher};
use mediagrab_av::{
    select_streams, staging, Error, MediaItem, MergeJob, Muxer, Result, StreamKind, OUTPUT_EXT,
};
use std::path::{Path, PathBuf};

/// What happened to one item of a run.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The item produced a playable output file.
    Done { title: String, output: PathBuf },
    /// The item failed; the rest of the run was unaffected.
    Failed {
        title: Option<String>,
        error: Error,
    },
}

/// Per-item outcomes of one pipeline run.
///
/// Partial success for a collection is a normal, expected result; callers
/// decide how to present it.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl RunReport {
    /// Number of items that produced an output file.
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Done { .. }))
            .count()
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Run the pipeline for everything found at `url`, writing one output file
/// per successful item into `dest_dir`.
///
/// # Errors
///
/// Returns [`Error::DestinationUnwritable`] (before any item is attempted)
/// if the destination folder cannot be created, or the extraction error if
/// the source yields no metadata at all. Item-scoped failures are recorded
/// in the report instead.
pub fn run(
    url: &str,
    dest_dir: &Path,
    source: &dyn MediaSource,
    fetcher: &dyn StreamFetcher,
    muxer: &dyn Muxer,
) -> Result<RunReport> {
    std::fs::create_dir_all(dest_dir)
        .map_err(|e| Error::destination_unwritable(dest_dir, e.to_string()))?;

    let items = source.extract(url)?;
    tracing::info!("extracted {} item(s)", items.len());

    let mut report = RunReport::default();
    for item in &items {
        match process_item(url, item, dest_dir, fetcher, muxer) {
            Ok(output) => {
                tracing::info!(item = %item.id, output = %output.display(), "item done");
                report.outcomes.push(ItemOutcome::Done {
                    title: item.title.clone().unwrap_or_default(),
                    output,
                });
            }
            Err(error) => {
                tracing::warn!(item = %item.id, %error, "item failed, continuing");
                report.outcomes.push(ItemOutcome::Failed {
                    title: item.title.clone(),
                    error,
                });
            }
        }
    }

    Ok(report)
}

/// Process a single item to completion: one output file or one error.
pub fn process_item(
    url: &str,
    item: &MediaItem,
    dest_dir: &Path,
    fetcher: &dyn StreamFetcher,
    muxer: &dyn Muxer,
) -> Result<PathBuf> {
    // No output name can be formed without a title; fail before any
    // retrieval is attempted.
    let title = item.title.clone().ok_or(Error::NoTitle)?;

    let selection = select_streams(&item.formats)?;

    let staging_dir = tempfile::Builder::new().prefix("mediagrab-").tempdir()?;

    match run_staged(url, item, &selection, staging_dir.path(), dest_dir, &title, fetcher, muxer) {
        Ok(output) => Ok(output), // staging dir cleaned on drop
        Err(error) => {
            // Keep whatever was already retrieved for diagnosis or retry.
            let kept = staging_dir.keep();
            tracing::warn!(staging = %kept.display(), "staging files preserved");
            Err(error)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_staged(
    url: &str,
    item: &MediaItem,
    selection: &mediagrab_av::SelectionResult,
    staging_dir: &Path,
    dest_dir: &Path,
    title: &str,
    fetcher: &dyn StreamFetcher,
    muxer: &dyn Muxer,
) -> Result<PathBuf> {
    let video = fetch_stream(
        url,
        item,
        &selection.video_format_id,
        staging_dir,
        StreamKind::Video,
        fetcher,
    )?;
    let video = staging::stage(&video, StreamKind::Video)?;

    let audio = if selection.is_single_stream() {
        None
    } else {
        let audio = fetch_stream(
            url,
            item,
            &selection.audio_format_id,
            staging_dir,
            StreamKind::Audio,
            fetcher,
        )?;
        Some(staging::stage(&audio, StreamKind::Audio)?)
    };

    let output = dest_dir.join(format!("{title}.{OUTPUT_EXT}"));
    muxer.combine(&MergeJob {
        video,
        audio,
        output: output.clone(),
    })?;

    Ok(output)
}

fn fetch_stream(
    url: &str,
    item: &MediaItem,
    format_id: &str,
    staging_dir: &Path,
    kind: StreamKind,
    fetcher: &dyn StreamFetcher,
) -> Result<PathBuf> {
    let path = fetcher
        .fetch(url, item, format_id, staging_dir)
        .map_err(|e| Error::retrieval_failed(kind, e.to_string()))?;
    if !path.exists() {
        return Err(Error::retrieval_failed(
            kind,
            format!("adapter reported missing file: {}", path.display()),
        ));
    }
    Ok(path)
}
