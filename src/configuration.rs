//! Extraction options.
//!
//! [`ExtractOptions`] is a builder that threads the output image format, the
//! seek strategy, and a progress callback through [`extract_frames`] without
//! growing its signature.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use framesplit::{ExtractOptions, FrameFormat, ProgressCallback, ProgressInfo, SeekMode};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{}/{} frames", info.written, info.expected);
//!     }
//! }
//!
//! let options = ExtractOptions::new()
//!     .with_format(FrameFormat::Png)
//!     .with_seek_mode(SeekMode::Sequential)
//!     .with_progress(Arc::new(LogProgress))
//!     .with_batch_size(10);
//! assert_eq!(options.format(), FrameFormat::Png);
//! ```
//!
//! [`extract_frames`]: crate::extract_frames

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use image::ImageFormat;

use crate::progress::{NoOpProgress, ProgressCallback};

/// Image format used for every frame written by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameFormat {
    /// Baseline JPEG. This is the default.
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
    /// Uncompressed Windows bitmap.
    Bmp,
    /// TIFF.
    Tiff,
}

impl FrameFormat {
    /// File extension written after `frame<index>.`.
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Jpeg => "jpg",
            FrameFormat::Png => "png",
            FrameFormat::Bmp => "bmp",
            FrameFormat::Tiff => "tiff",
        }
    }

    /// Look up a format by extension, case-insensitively and with or without
    /// a leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(FrameFormat::Jpeg),
            "png" => Some(FrameFormat::Png),
            "bmp" => Some(FrameFormat::Bmp),
            "tif" | "tiff" => Some(FrameFormat::Tiff),
            _ => None,
        }
    }

    pub(crate) fn to_image_format(self) -> ImageFormat {
        match self {
            FrameFormat::Jpeg => ImageFormat::Jpeg,
            FrameFormat::Png => ImageFormat::Png,
            FrameFormat::Bmp => ImageFormat::Bmp,
            FrameFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl Display for FrameFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

/// How the extraction loop moves from one sampled frame to the next.
///
/// Both strategies write the same files; they differ only in cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeekMode {
    /// Reposition the decoder at every sampled frame when the stride is
    /// larger than one. Cheap for large strides on files with frequent
    /// keyframes. This is the default.
    #[default]
    Reposition,
    /// Never seek after the start frame; decode and discard the frames in
    /// between. Cheap for small strides and robust against inaccurate seeking.
    Sequential,
}

/// Configuration for a frame extraction run.
///
/// A default-constructed value writes JPEG files, repositions between
/// samples, and reports no progress.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) format: FrameFormat,
    pub(crate) seek_mode: SeekMode,
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// How often to fire the progress callback (every N frames written).
    pub(crate) batch_size: u64,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("format", &self.format)
            .field("seek_mode", &self.seek_mode)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            format: FrameFormat::default(),
            seek_mode: SeekMode::default(),
            progress: Arc::new(NoOpProgress),
            batch_size: 1,
        }
    }

    /// Set the image format of written frames.
    #[must_use]
    pub fn with_format(mut self, format: FrameFormat) -> Self {
        self.format = format;
        self
    }

    /// Set how the decoder advances between sampled frames.
    #[must_use]
    pub fn with_seek_mode(mut self, mode: SeekMode) -> Self {
        self.seek_mode = mode;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Set how often the progress callback fires. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The configured image format.
    pub fn format(&self) -> FrameFormat {
        self.format
    }

    /// The configured seek strategy.
    pub fn seek_mode(&self) -> SeekMode {
        self.seek_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_jpeg_with_repositioning() {
        let options = ExtractOptions::default();
        assert_eq!(options.format(), FrameFormat::Jpeg);
        assert_eq!(options.seek_mode(), SeekMode::Reposition);
        assert_eq!(options.batch_size, 1);
    }

    #[test]
    fn batch_size_is_clamped() {
        let options = ExtractOptions::new().with_batch_size(0);
        assert_eq!(options.batch_size, 1);
    }

    #[test]
    fn extension_aliases() {
        assert_eq!(FrameFormat::from_extension("JPEG"), Some(FrameFormat::Jpeg));
        assert_eq!(FrameFormat::from_extension(".png"), Some(FrameFormat::Png));
        assert_eq!(FrameFormat::from_extension("tif"), Some(FrameFormat::Tiff));
        assert_eq!(FrameFormat::from_extension("gif"), None);
        assert_eq!(FrameFormat::Jpeg.to_string(), "jpg");
    }
}
