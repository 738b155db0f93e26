//! Extractor and retrieval adapter seams.
//!
//! The pipeline never talks to the network itself. Metadata extraction and
//! stream retrieval are external collaborators behind these traits; the
//! shipped backend drives yt-dlp as a subprocess.

mod ytdlp;

pub use ytdlp::YtDlp;

use mediagrab_av::{MediaItem, Result};
use std::path::{Path, PathBuf};

/// Produces the candidate list (and title) for everything found at a URL.
pub trait MediaSource {
    /// Extract metadata for a URL.
    ///
    /// A single video yields a one-element vector; a playlist yields one
    /// item per usable entry, each with its 1-based `sequence_index` set.
    /// Entries the extractor could not resolve are skipped, not errored.
    fn extract(&self, url: &str) -> Result<Vec<MediaItem>>;
}

/// Retrieves the bytes of one chosen format to a local file.
pub trait StreamFetcher {
    /// Download the given format of `item` into `dest_dir` and return the
    /// resulting file path.
    ///
    /// The file is named from the item's extractor identifier, not its
    /// human title, so the name is always filesystem-safe. When the item
    /// carries a `sequence_index`, only that playlist position is
    /// requested.
    fn fetch(
        &self,
        url: &str,
        item: &MediaItem,
        format_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf>;
}
