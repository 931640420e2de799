//! Timestamp parsing for `--start` / `--end`.
//!
//! A timestamp is either a plain number of seconds (`"125"`) or a
//! colon-separated list of base-60 components (`"01:02:05"`). Every colon
//! component is limited to two characters and to values below 60, the hours
//! position included.
//!
//! # Example
//!
//! ```
//! use framesplit::parse_timestamp;
//!
//! assert_eq!(parse_timestamp("125")?, 125);
//! assert_eq!(parse_timestamp("01:02:05")?, 3725);
//! assert!(parse_timestamp("99:00").is_err());
//! # Ok::<(), framesplit::FramesplitError>(())
//! ```

use crate::error::FramesplitError;

/// Largest value a single colon-separated component may hold.
const MAX_COMPONENT: u64 = 59;

/// Longest allowed colon-separated component, in characters.
const MAX_COMPONENT_LEN: usize = 2;

/// Parse a timestamp into a whole number of seconds.
///
/// Components of the colon form fold left to right, so any number of them is
/// accepted: `"1:2:3:4"` is `((1 * 60 + 2) * 60 + 3) * 60 + 4`.
///
/// # Errors
///
/// Returns [`FramesplitError::InvalidTimestamp`] when the text is not a
/// non-negative integer, when a colon component is longer than two
/// characters, not an integer, or 60 and above, or when the result does not
/// fit in a `u64`.
pub fn parse_timestamp(text: &str) -> Result<u64, FramesplitError> {
    let invalid = || FramesplitError::InvalidTimestamp(text.to_string());
    let trimmed = text.trim();

    if !trimmed.contains(':') {
        return trimmed.parse::<u64>().map_err(|_| invalid());
    }

    let mut seconds: u64 = 0;
    for component in trimmed.split(':') {
        if component.chars().count() > MAX_COMPONENT_LEN {
            return Err(invalid());
        }

        let value = component.parse::<u64>().map_err(|_| invalid())?;
        if value > MAX_COMPONENT {
            return Err(invalid());
        }

        seconds = seconds
            .checked_mul(60)
            .and_then(|shifted| shifted.checked_add(value))
            .ok_or_else(invalid)?;
    }

    Ok(seconds)
}
