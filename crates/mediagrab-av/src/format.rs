//! Data model for candidate encodings of a media item.
//!
//! The field names follow the extractor's JSON output. Several numeric
//! fields may be missing or explicitly `null`; both are mapped to `None`.

use serde::Deserialize;

/// Sentinel the extractor uses for "no video stream in this format".
pub const NO_CODEC: &str = "none";

/// One candidate encoding of a media item.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatDescriptor {
    /// Opaque identifier, unique within one item's candidate list.
    pub format_id: String,

    /// Video codec identifier, or `"none"` for audio-only formats.
    #[serde(default)]
    pub vcodec: Option<String>,

    /// Frame width in pixels; absent for audio-only formats.
    #[serde(default)]
    pub width: Option<u32>,

    /// Exact byte count, when the extractor knows it.
    #[serde(default)]
    pub filesize: Option<u64>,

    /// Estimated byte count, consulted only when `filesize` is absent.
    #[serde(default)]
    pub filesize_approx: Option<u64>,
}

impl FormatDescriptor {
    /// Whether this format carries a video stream.
    pub fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|codec| codec != NO_CODEC)
    }

    /// Whether this format is audio-only.
    ///
    /// Following the extractor's convention, a format is audio-only exactly
    /// when its `vcodec` field is the `"none"` sentinel. A format with no
    /// `vcodec` at all is neither video-carrying nor audio-only.
    pub fn is_audio_only(&self) -> bool {
        self.vcodec.as_deref() == Some(NO_CODEC)
    }

    /// Best available byte count: exact size, falling back to the estimate.
    pub fn effective_size(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// One unit of work: a single media asset to be turned into one output file.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    /// Extractor-assigned identifier, safe for filesystem use.
    pub id: String,

    /// Human title, used verbatim as the output base filename.
    #[serde(default)]
    pub title: Option<String>,

    /// Candidate encodings for this item.
    #[serde(default)]
    pub formats: Vec<FormatDescriptor>,

    /// 1-based position when the item came from a multi-item collection.
    #[serde(skip)]
    pub sequence_index: Option<usize>,
}

/// The selector's decision for one item.
///
/// `video_format_id == audio_format_id` is a legal value meaning a single
/// format carries both streams and no merge is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub video_format_id: String,
    pub audio_format_id: String,
}

impl SelectionResult {
    /// Whether one format carries both streams (remux instead of merge).
    pub fn is_single_stream(&self) -> bool {
        self.video_format_id == self.audio_format_id
    }
}
