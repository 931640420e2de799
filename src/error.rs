//! Error types for the `framesplit` crate.
//!
//! This module defines [`FramesplitError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry the offending value
//! (timestamp text, frame numbers, paths) so the top-level boundary can print
//! a useful message without extra context.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framesplit` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramesplitError {
    /// A `--start`/`--end` value is neither a number of seconds nor a valid
    /// `HH:MM:SS` timestamp.
    #[error("Invalid timestamp, got {0:?}")]
    InvalidTimestamp(String),

    /// A numeric argument is malformed or out of its allowed domain.
    #[error("{0}")]
    InvalidArgument(String),

    /// The input path does not exist or is not a regular file.
    #[error("File not found, got {path:?}")]
    FileNotFound {
        /// Path as supplied by the caller.
        path: PathBuf,
    },

    /// The video could not be opened by the decoder.
    #[error("Unable to open video at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// Timestamps cannot be converted to frames because the decoder reports
    /// no usable frame rate.
    #[error("Video reports a frame rate of 0 fps, cannot convert timestamps to frames")]
    InvalidFrameRate,

    /// The start timestamp lands past the last frame.
    #[error(
        "Start timestamp exceeds video length, got {start_seconds}s (frame {start_frame}, video has {frame_count} frames)"
    )]
    StartExceedsLength {
        /// Start timestamp in seconds.
        start_seconds: u64,
        /// Frame the start timestamp resolved to.
        start_frame: u64,
        /// Total frames in the video.
        frame_count: u64,
    },

    /// Start and end resolve to the same frame.
    #[error("End timestamp equal to start timestamp, got end at frame {end_frame}")]
    EmptyRange {
        /// The frame both bounds resolved to.
        end_frame: u64,
    },

    /// The end resolves to a frame before the start.
    #[error(
        "End timestamp prior to start timestamp, got end frame {end_frame} before start frame {start_frame}"
    )]
    InvertedRange {
        /// Resolved start frame.
        start_frame: u64,
        /// Resolved (clamped) end frame.
        end_frame: u64,
    },

    /// A video frame could not be decoded or converted.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while creating directories or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl FramesplitError {
    /// Returns `true` for the errors raised when the requested time range does
    /// not fit the video.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            FramesplitError::StartExceedsLength { .. }
                | FramesplitError::EmptyRange { .. }
                | FramesplitError::InvertedRange { .. }
                | FramesplitError::InvalidFrameRate
        )
    }

    /// Process exit status for this error.
    ///
    /// Argument problems use `2`, the same status clap uses for usage errors.
    /// Everything detected after the video was opened uses `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            FramesplitError::InvalidTimestamp(_)
            | FramesplitError::InvalidArgument(_)
            | FramesplitError::FileNotFound { .. } => 2,
            _ => 1,
        }
    }
}

impl From<FfmpegError> for FramesplitError {
    fn from(error: FfmpegError) -> Self {
        FramesplitError::FfmpegError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_errors_are_classified() {
        assert!(FramesplitError::EmptyRange { end_frame: 3 }.is_range_error());
        assert!(
            FramesplitError::InvertedRange {
                start_frame: 10,
                end_frame: 5
            }
            .is_range_error()
        );
        assert!(!FramesplitError::NoVideoStream.is_range_error());
    }

    #[test]
    fn argument_errors_exit_with_usage_status() {
        assert_eq!(FramesplitError::InvalidTimestamp("x".into()).exit_code(), 2);
        assert_eq!(
            FramesplitError::FileNotFound {
                path: PathBuf::from("missing.mp4")
            }
            .exit_code(),
            2
        );
        assert_eq!(FramesplitError::EmptyRange { end_frame: 0 }.exit_code(), 1);
    }

    #[test]
    fn timestamp_error_echoes_input() {
        let message = FramesplitError::InvalidTimestamp("99:00".into()).to_string();
        assert_eq!(message, "Invalid timestamp, got \"99:00\"");
    }
}
