//! Timestamp parsing and range resolution integration tests.
//!
//! These run without any video: they drive the public parsing and
//! validation entry points with the values a user would type.

use framesplit::{FramesplitError, parse_stride, parse_timestamp, resolve_range};

// ── Timestamps ─────────────────────────────────────────────────────

#[test]
fn plain_seconds_and_clock_format_agree() {
    assert_eq!(parse_timestamp("125").unwrap(), 125);
    assert_eq!(parse_timestamp("00:02:05").unwrap(), 125);
    assert_eq!(parse_timestamp("2:05").unwrap(), 125);
    assert_eq!(parse_timestamp("01:02:05").unwrap(), 3725);
    assert_eq!(parse_timestamp("1:2:3:4").unwrap(), ((60 + 2) * 60 + 3) * 60 + 4);
}

#[test]
fn clock_components_must_be_short_and_below_sixty() {
    let rejected = [
        "99:00", "00:60:00", "00:00:60", "1:123", "abc", "-5", "1.5", "", "1::2", "00:0a",
    ];
    for text in rejected {
        let result = parse_timestamp(text);
        assert!(
            matches!(result, Err(FramesplitError::InvalidTimestamp(_))),
            "{text:?} should be rejected, got {result:?}",
        );
    }
}

#[test]
fn invalid_timestamp_message_names_the_input() {
    let message = parse_timestamp("soon").unwrap_err().to_string();
    assert!(message.contains("\"soon\""), "{message}");
}

// ── Stride ─────────────────────────────────────────────────────────

#[test]
fn stride_must_be_a_positive_integer() {
    assert_eq!(parse_stride("30").unwrap(), 30);

    let zero = parse_stride("0").unwrap_err().to_string();
    assert!(zero.contains("positive"), "{zero}");

    let negative = parse_stride("-4").unwrap_err().to_string();
    assert!(negative.contains("positive"), "{negative}");

    let text = parse_stride("ten").unwrap_err().to_string();
    assert!(text.contains("integer"), "{text}");
}

// ── Range resolution ───────────────────────────────────────────────

#[test]
fn start_and_end_convert_with_whole_fps() {
    let range = resolve_range(1000, 10, 5, Some(20), 1).unwrap();
    assert_eq!((range.start_frame(), range.end_frame()), (50, 200));
    assert_eq!(range.len(), 150);
}

#[test]
fn end_before_start_is_inverted() {
    let result = resolve_range(100, 10, 20, Some(5), 1);
    assert!(
        matches!(result, Err(FramesplitError::StartExceedsLength { .. })),
        "start at frame 200 of 100 should fail first, got {result:?}",
    );

    let result = resolve_range(1000, 10, 20, Some(5), 1);
    match result {
        Err(FramesplitError::InvertedRange { start_frame, end_frame }) => {
            assert_eq!((start_frame, end_frame), (200, 50));
        }
        other => panic!("Expected InvertedRange, got {other:?}"),
    }
}

#[test]
fn start_beyond_length_is_rejected() {
    let error = resolve_range(300, 30, 60, None, 1).unwrap_err();
    assert!(error.is_range_error());
    match error {
        FramesplitError::StartExceedsLength {
            start_seconds,
            start_frame,
            frame_count,
        } => {
            assert_eq!((start_seconds, start_frame, frame_count), (60, 1800, 300));
        }
        other => panic!("Expected StartExceedsLength, got {other:?}"),
    }
}

#[test]
fn equal_bounds_are_empty() {
    let result = resolve_range(1000, 25, 4, Some(4), 1);
    assert!(matches!(result, Err(FramesplitError::EmptyRange { end_frame: 100 })));
}

#[test]
fn end_past_video_is_clamped() {
    let range = resolve_range(250, 25, 0, Some(3600), 7).unwrap();
    assert_eq!(range.end_frame(), 250);
    assert_eq!(range.expected_frames(7), 36);
}

#[test]
fn zero_stride_is_an_argument_error() {
    let error = resolve_range(100, 10, 0, None, 0).unwrap_err();
    assert_eq!(error.exit_code(), 2);
    assert!(!error.is_range_error());
}

#[test]
fn expected_frames_matches_index_walk() {
    let range = resolve_range(997, 24, 1, Some(40), 1).unwrap();
    for stride in [1, 2, 3, 24, 100, 10_000] {
        let walked = range.frame_indices(stride).count() as u64;
        assert_eq!(walked, range.expected_frames(stride), "stride {stride}");
        assert!(range.frame_indices(stride).all(|index| index < range.end_frame()));
    }
}
