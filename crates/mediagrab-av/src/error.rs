//! Error types for mediagrab-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Which half of an item a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// The video-carrying stream.
    Video,
    /// The audio-only stream.
    Audio,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
        }
    }
}

/// Errors that can occur while selecting, retrieving or merging streams.
///
/// All variants are item-scoped except [`Error::DestinationUnwritable`],
/// which aborts a run before any item is attempted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The item's metadata carries no title, so no output name can be formed.
    #[error("item has no title")]
    NoTitle,

    /// No candidate format carries a video stream.
    #[error("no video-carrying format among {candidates} candidates")]
    NoVideoStream { candidates: usize },

    /// The carrier set has no usable width or size information.
    #[error("no determinable size for {stream} candidates")]
    NoDeterminableSize { stream: StreamKind },

    /// The retrieval adapter failed to produce a file for a stream.
    #[error("retrieval of {stream} stream failed: {message}")]
    StreamRetrievalFailed { stream: StreamKind, message: String },

    /// A staging rename target already exists (stale run).
    #[error("staging name already taken: {}", path.display())]
    StagingCollision { path: PathBuf },

    /// The external combiner exited with a non-zero status.
    #[error("merge failed: {message}")]
    MergeFailed { message: String },

    /// The destination folder could not be created or written.
    #[error("destination not writable: {}: {message}", path.display())]
    DestinationUnwritable { path: PathBuf, message: String },

    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// An external tool failed to execute.
    #[error("tool execution failed: {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a stream retrieval failure.
    pub fn retrieval_failed(stream: StreamKind, message: impl Into<String>) -> Self {
        Self::StreamRetrievalFailed {
            stream,
            message: message.into(),
        }
    }

    /// Create a merge failure.
    pub fn merge_failed(message: impl Into<String>) -> Self {
        Self::MergeFailed {
            message: message.into(),
        }
    }

    /// Create an unwritable-destination error.
    pub fn destination_unwritable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DestinationUnwritable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a tool execution failed error.
    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Whether the error only affects a single item of a collection.
    ///
    /// Item-scoped errors are recorded and the run proceeds to the next
    /// item; non-item-scoped errors abort the whole run.
    pub fn is_item_scoped(&self) -> bool {
        !matches!(self, Error::DestinationUnwritable { .. })
    }
}
