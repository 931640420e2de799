//! Internal conversion helpers shared by the decoder wrapper.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Pack the RGB24 plane of `frame` row by row, dropping FFmpeg's per-row
/// padding, so the result fits [`image::RgbImage::from_raw`].
///
/// A truncated plane yields a short buffer, which `from_raw` rejects.
pub(crate) fn frame_to_rgb_buffer(frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let row_length = width as usize * 3;
    let line_size = frame.stride(0).max(row_length).max(1);

    frame
        .data(0)
        .chunks(line_size)
        .take(height as usize)
        .flat_map(|line| &line[..row_length.min(line.len())])
        .copied()
        .collect()
}

/// Frames per second of a rational rate, or `0.0` when the rate is unset.
pub(crate) fn rational_to_fps(rate: Rational) -> f64 {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        rate.numerator() as f64 / rate.denominator() as f64
    } else {
        0.0
    }
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Index of the frame presented at `pts`, counted from `start_pts`.
///
/// Rounded to the nearest frame so timestamps that land a hair before the
/// nominal position do not map to the previous frame.
pub(crate) fn pts_to_frame_number(
    pts: i64,
    start_pts: i64,
    time_base: Rational,
    frames_per_second: f64,
) -> u64 {
    let seconds = pts_to_seconds(pts.saturating_sub(start_pts), time_base);
    (seconds * frames_per_second).round().max(0.0) as u64
}

/// Convert a frame index to a container seek position in AV_TIME_BASE
/// (microseconds), offset by the container start time.
pub(crate) fn frame_number_to_seek_timestamp(
    frame_number: u64,
    frames_per_second: f64,
    start_time_micros: i64,
) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    start_time_micros.saturating_add((seconds * 1_000_000.0) as i64)
}

#[cfg(test)]
mod tests {
    use ffmpeg_next::format::Pixel;

    use super::*;

    #[test]
    fn padding_is_dropped_from_each_row() {
        let mut frame = VideoFrame::new(Pixel::RGB24, 3, 2);
        let line_size = frame.stride(0);
        for (offset, byte) in frame.data_mut(0).iter_mut().enumerate() {
            *byte = ((offset / line_size) * 100 + offset % line_size) as u8;
        }

        let buffer = frame_to_rgb_buffer(&frame, 3, 2);

        let expected: Vec<u8> = (0..9).chain(100..109).collect();
        assert_eq!(buffer, expected);
    }

    #[test]
    fn fps_from_rational() {
        assert_eq!(rational_to_fps(Rational::new(30, 1)), 30.0);
        assert!((rational_to_fps(Rational::new(30000, 1001)) - 29.97).abs() < 0.01);
        assert_eq!(rational_to_fps(Rational::new(0, 0)), 0.0);
    }

    #[test]
    fn pts_maps_to_nearest_frame() {
        let time_base = Rational::new(1, 90_000);
        assert_eq!(pts_to_frame_number(0, 0, time_base, 30.0), 0);
        assert_eq!(pts_to_frame_number(3000, 0, time_base, 30.0), 1);
        assert_eq!(pts_to_frame_number(2999, 0, time_base, 30.0), 1);
        assert_eq!(pts_to_frame_number(93_000, 3000, time_base, 30.0), 30);
        assert_eq!(pts_to_frame_number(0, 3000, time_base, 30.0), 0);
    }

    #[test]
    fn seek_timestamp_is_in_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(30, 30.0, 0), 1_000_000);
        assert_eq!(frame_number_to_seek_timestamp(15, 30.0, 500), 500_500);
    }
}
