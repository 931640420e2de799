//! Validators for command-line values.
//!
//! Each function has the `fn(&str) -> Result<T, FramesplitError>` shape clap
//! expects from a `value_parser`, so malformed input is rejected while the
//! arguments are parsed, before any video is opened.

use std::path::{self, PathBuf};

use crate::configuration::FrameFormat;
use crate::error::FramesplitError;

/// Parse a sampling stride: a strictly positive integer.
///
/// # Errors
///
/// Returns [`FramesplitError::InvalidArgument`] for non-integers and for zero.
pub fn parse_stride(text: &str) -> Result<u64, FramesplitError> {
    let stride = text
        .trim()
        .parse::<i128>()
        .map_err(|_| FramesplitError::InvalidArgument(format!("Expected integer, got {text:?}")))?;

    if stride <= 0 {
        return Err(FramesplitError::InvalidArgument(format!(
            "Expected positive integer, got {stride}"
        )));
    }

    u64::try_from(stride)
        .map_err(|_| FramesplitError::InvalidArgument(format!("Stride too large, got {stride}")))
}

/// Check that `text` names an existing regular file and make it absolute.
///
/// The path is not canonicalised, so symlinks are kept as given.
///
/// # Errors
///
/// Returns [`FramesplitError::FileNotFound`] if nothing exists at the path or
/// it is not a regular file, and [`FramesplitError::IoError`] if the current
/// directory cannot be read to absolutise it.
pub fn resolve_source_path(text: &str) -> Result<PathBuf, FramesplitError> {
    let path = PathBuf::from(text);
    if !path.is_file() {
        return Err(FramesplitError::FileNotFound { path });
    }

    Ok(path::absolute(&path)?)
}

/// Parse an output image extension.
///
/// # Errors
///
/// Returns [`FramesplitError::InvalidArgument`] for unsupported extensions.
pub fn parse_frame_format(text: &str) -> Result<FrameFormat, FramesplitError> {
    FrameFormat::from_extension(text).ok_or_else(|| {
        FramesplitError::InvalidArgument(format!(
            "Unsupported image format {text:?} (expected jpg, png, bmp or tiff)"
        ))
    })
}
