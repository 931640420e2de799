//! Video metadata reported by the decoder.
//!
//! Extracted once by [`VideoFile::open`](crate::VideoFile::open) and cached
//! for the lifetime of the handle.

use std::time::Duration;

/// Metadata for the video stream being sampled.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Whole frames per second, truncated from the stream's average rate.
    /// Timestamps are converted to frames with this value. Zero when the
    /// container does not report a rate.
    pub frames_per_second: u64,
    /// Unrounded average frame rate, used to position the decoder.
    pub exact_frames_per_second: f64,
    /// Total frames: the stream's own count when the container stores one,
    /// otherwise estimated from duration and frame rate.
    pub frame_count: u64,
    /// Container duration.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
}

impl VideoMetadata {
    /// Pick the frame count: the stream's own count when known, else
    /// `duration × fps`.
    pub(crate) fn estimate_frame_count(
        stream_frames: i64,
        duration: Duration,
        exact_frames_per_second: f64,
    ) -> u64 {
        if stream_frames > 0 {
            stream_frames as u64
        } else if exact_frames_per_second > 0.0 {
            (duration.as_secs_f64() * exact_frames_per_second) as u64
        } else {
            0
        }
    }
}
