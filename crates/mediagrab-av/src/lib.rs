//! # mediagrab-av
//!
//! Stream selection, staging and lossless merge for downloaded media.
//!
//! Given the flat list of candidate encodings an extractor reports for one
//! media item, this crate:
//!
//! - picks the best video-carrying and best audio-only format
//!   (resolution first, then file size within a 5% tolerance band),
//! - renames retrieved streams to collision-safe pipeline-private names,
//! - and drives the external combiner (ffmpeg) to stream-copy them into a
//!   single playable output file. Nothing is ever re-encoded.
//!
//! ## Example
//!
//! ```no_run
//! use mediagrab_av::{select_streams, FormatDescriptor};
//!
//! let candidates: Vec<FormatDescriptor> =
//!     serde_json::from_str(r#"[{"format_id": "22", "vcodec": "avc1", "width": 1280, "filesize": 1000}]"#)?;
//! let selection = select_streams(&candidates)?;
//! assert!(selection.is_single_stream());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
pub mod format;
pub mod merge;
pub mod select;
pub mod staging;
pub mod tools;

// Re-exports
pub use error::{Error, Result, StreamKind};
pub use format::{FormatDescriptor, MediaItem, SelectionResult};
pub use merge::{FfmpegMuxer, MergeJob, Muxer, OUTPUT_EXT};
pub use select::{select_streams, SIZE_TOLERANCE};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
