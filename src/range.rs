//! Frame range resolution.
//!
//! [`resolve_range`] turns start/end timestamps (in whole seconds) into a
//! half-open frame interval `[start_frame, end_frame)` validated against the
//! frame count reported by the decoder. [`SampleRange`] then answers how many
//! frames a given stride will produce and which indices they are.
//!
//! # Example
//!
//! ```
//! use framesplit::resolve_range;
//!
//! let range = resolve_range(1000, 10, 0, None, 1)?;
//! assert_eq!((range.start_frame(), range.end_frame()), (0, 1000));
//! assert_eq!(range.expected_frames(3), 334);
//! # Ok::<(), framesplit::FramesplitError>(())
//! ```

use std::iter::StepBy;
use std::ops::Range;

use crate::error::FramesplitError;

/// A validated, non-empty, half-open frame interval.
///
/// Only [`resolve_range`] builds one, so `start_frame < end_frame` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    start_frame: u64,
    end_frame: u64,
}

impl SampleRange {
    /// First frame to extract (inclusive).
    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    /// Frame at which extraction stops (exclusive).
    pub fn end_frame(&self) -> u64 {
        self.end_frame
    }

    /// Number of frames covered by the interval.
    pub fn len(&self) -> u64 {
        self.end_frame.saturating_sub(self.start_frame)
    }

    /// `false` for every range [`resolve_range`] returns.
    pub fn is_empty(&self) -> bool {
        self.start_frame >= self.end_frame
    }

    /// How many frames sampling every `stride`-th frame yields,
    /// `ceil(len / stride)`.
    ///
    /// A stride of zero is treated as one.
    pub fn expected_frames(&self, stride: u64) -> u64 {
        self.len().div_ceil(stride.max(1))
    }

    /// The absolute indices of the sampled frames, in increasing order.
    pub fn frame_indices(&self, stride: u64) -> StepBy<Range<u64>> {
        let step = usize::try_from(stride.max(1)).unwrap_or(usize::MAX);
        (self.start_frame..self.end_frame).step_by(step)
    }
}

/// Resolve start/end seconds to a frame interval.
///
/// `end_seconds` of `None` means "until the end of the video". An end past the
/// last frame is clamped to `frame_count`; a start past it is an error.
///
/// # Errors
///
/// - [`FramesplitError::InvalidArgument`] if `stride` is zero.
/// - [`FramesplitError::InvalidFrameRate`] if a timestamp has to be converted
///   and `fps` is zero.
/// - [`FramesplitError::StartExceedsLength`] if the start frame is beyond
///   `frame_count`.
/// - [`FramesplitError::EmptyRange`] if start and end resolve to one frame.
/// - [`FramesplitError::InvertedRange`] if the end resolves before the start.
pub fn resolve_range(
    frame_count: u64,
    fps: u64,
    start_seconds: u64,
    end_seconds: Option<u64>,
    stride: u64,
) -> Result<SampleRange, FramesplitError> {
    if stride == 0 {
        return Err(FramesplitError::InvalidArgument(
            "Expected positive integer, got 0".to_string(),
        ));
    }

    if fps == 0 && (start_seconds != 0 || end_seconds.is_some()) {
        return Err(FramesplitError::InvalidFrameRate);
    }

    let start_frame = if start_seconds != 0 {
        // An overflowing product is past any real frame count.
        start_seconds.checked_mul(fps).unwrap_or(u64::MAX)
    } else {
        0
    };

    if start_frame > frame_count {
        return Err(FramesplitError::StartExceedsLength {
            start_seconds,
            start_frame,
            frame_count,
        });
    }

    let end_frame = end_seconds
        .map(|seconds| seconds.saturating_mul(fps))
        .unwrap_or(frame_count)
        .min(frame_count);

    if end_frame == start_frame {
        return Err(FramesplitError::EmptyRange { end_frame });
    }
    if end_frame < start_frame {
        return Err(FramesplitError::InvertedRange {
            start_frame,
            end_frame,
        });
    }

    log::debug!(
        "Resolved {start_seconds}s..{} at {fps} fps \
         to frames [{start_frame}, {end_frame}) of {frame_count}",
        end_seconds.map_or_else(|| "end".to_string(), |seconds| format!("{seconds}s")),
    );

    Ok(SampleRange {
        start_frame,
        end_frame,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_video_by_default() {
        let range = resolve_range(1000, 10, 0, None, 1).unwrap();
        assert_eq!((range.start_frame(), range.end_frame()), (0, 1000));
    }

    #[test]
    fn end_is_clamped_to_frame_count() {
        let range = resolve_range(100, 10, 2, Some(60), 1).unwrap();
        assert_eq!((range.start_frame(), range.end_frame()), (20, 100));
    }

    #[test]
    fn start_equal_to_frame_count_is_empty_not_out_of_range() {
        let result = resolve_range(100, 10, 10, None, 1);
        assert!(matches!(result, Err(FramesplitError::EmptyRange { end_frame: 100 })));
    }

    #[test]
    fn zero_fps_is_rejected_only_when_converting() {
        assert!(resolve_range(50, 0, 0, None, 1).is_ok());
        assert!(matches!(
            resolve_range(50, 0, 1, None, 1),
            Err(FramesplitError::InvalidFrameRate)
        ));
        assert!(matches!(
            resolve_range(50, 0, 0, Some(3), 1),
            Err(FramesplitError::InvalidFrameRate)
        ));
    }

    #[test]
    fn overflowing_start_is_out_of_range() {
        let result = resolve_range(100, 30, u64::MAX / 2, None, 1);
        assert!(matches!(
            result,
            Err(FramesplitError::StartExceedsLength { start_frame: u64::MAX, .. })
        ));
    }

    #[test]
    fn expected_frames_rounds_up() {
        let range = SampleRange {
            start_frame: 10,
            end_frame: 21,
        };
        assert_eq!(range.expected_frames(1), 11);
        assert_eq!(range.expected_frames(5), 3);
        assert_eq!(range.expected_frames(11), 1);
        assert_eq!(range.expected_frames(100), 1);
    }

    #[test]
    fn frame_indices_are_absolute() {
        let range = SampleRange {
            start_frame: 10,
            end_frame: 26,
        };
        let indices: Vec<u64> = range.frame_indices(5).collect();
        assert_eq!(indices, vec![10, 15, 20, 25]);
        assert_eq!(indices.len() as u64, range.expected_frames(5));
    }

    #[test]
    fn inverted_bounds_have_no_length() {
        let range = SampleRange {
            start_frame: 10,
            end_frame: 5,
        };
        assert_eq!(range.len(), 0);
        assert!(range.is_empty());
        assert_eq!(range.expected_frames(3), 0);
        assert_eq!(range.frame_indices(3).count(), 0);
    }
}
