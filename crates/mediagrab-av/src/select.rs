//! Best-stream selection.
//!
//! Given the flat candidate list the extractor reports for one item, pick
//! the best video-carrying format and the best audio-only format. Two
//! passes of the same shape: resolution is the primary quality signal for
//! video, then file size stands in for bitrate within equal resolution;
//! audio has no resolution so only the size pass applies.

use crate::error::{Error, Result, StreamKind};
use crate::format::{FormatDescriptor, SelectionResult};

/// Candidates within this fraction of the largest effective size are
/// treated as equally best, absorbing container overhead differences
/// without admitting meaningfully worse encodes.
pub const SIZE_TOLERANCE: f64 = 0.95;

/// Select the best video and audio format ids from a candidate list.
///
/// The returned ids are equal when no audio-only candidate exists; the
/// chosen video format is then assumed to carry audio as well.
///
/// # Errors
///
/// - [`Error::NoVideoStream`] if no candidate carries video.
/// - [`Error::NoDeterminableSize`] if the relevant carrier set has no
///   usable width (video pass) or no usable byte count (either pass).
pub fn select_streams(candidates: &[FormatDescriptor]) -> Result<SelectionResult> {
    let video_set: Vec<&FormatDescriptor> =
        candidates.iter().filter(|f| f.has_video()).collect();
    if video_set.is_empty() {
        return Err(Error::NoVideoStream {
            candidates: candidates.len(),
        });
    }

    // Highest resolution wins first. Candidates that do not report a width
    // neither contribute to the maximum nor survive the narrowing.
    let max_width = video_set
        .iter()
        .filter_map(|f| f.width)
        .max()
        .filter(|&w| w > 0)
        .ok_or(Error::NoDeterminableSize {
            stream: StreamKind::Video,
        })?;
    let at_max_width: Vec<&FormatDescriptor> = video_set
        .iter()
        .copied()
        .filter(|f| f.width == Some(max_width))
        .collect();

    let video_format_id = pick_largest(&at_max_width, StreamKind::Video)?;

    let audio_set: Vec<&FormatDescriptor> =
        candidates.iter().filter(|f| f.is_audio_only()).collect();
    let audio_format_id = if audio_set.is_empty() {
        // No audio-only format: assume the chosen video format has audio.
        tracing::debug!(format_id = %video_format_id, "no audio-only candidates, reusing video format");
        video_format_id.clone()
    } else {
        pick_largest(&audio_set, StreamKind::Audio)?
    };

    tracing::debug!(video = %video_format_id, audio = %audio_format_id, "selected formats");

    Ok(SelectionResult {
        video_format_id,
        audio_format_id,
    })
}

/// Size pass: keep candidates within the tolerance band of the largest
/// effective size and return the first survivor in original order.
fn pick_largest(carrier_set: &[&FormatDescriptor], stream: StreamKind) -> Result<String> {
    let max_size = carrier_set
        .iter()
        .filter_map(|f| f.effective_size())
        .max()
        .filter(|&size| size > 0)
        .ok_or(Error::NoDeterminableSize { stream })?;

    let floor = max_size as f64 * SIZE_TOLERANCE;
    carrier_set
        .iter()
        .find(|f| {
            f.effective_size()
                .is_some_and(|size| size as f64 >= floor)
        })
        .map(|f| f.format_id.clone())
        // The format contributing max_size always qualifies.
        .ok_or(Error::NoDeterminableSize { stream })
}
