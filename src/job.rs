//! The resolved unit of work for one run.
//!
//! An [`ExtractRequest`] holds what the user asked for. Combined with the
//! decoder's [`VideoMetadata`] it becomes a [`VideoJob`]: a validated frame
//! range plus everything needed to name the output directory.
//!
//! Output directories are named after the source file, the stride and the
//! resolved bounds, and are never reused. When the name is taken a ` (1)`,
//! ` (2)`, … suffix is appended until creation succeeds.

use std::{
    ffi::OsStr,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{
    error::FramesplitError,
    metadata::VideoMetadata,
    range::{SampleRange, resolve_range},
};

/// Parameters supplied by the user for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Video to read.
    pub path: PathBuf,
    /// Extract every `stride`-th frame. Must be positive.
    pub stride: u64,
    /// Start timestamp, in seconds.
    pub start_seconds: u64,
    /// End timestamp, in seconds; `None` reads to the end of the video.
    pub end_seconds: Option<u64>,
}

impl ExtractRequest {
    /// Request the whole video at stride 1.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            stride: 1,
            start_seconds: 0,
            end_seconds: None,
        }
    }

    /// Set the stride.
    #[must_use]
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride;
        self
    }

    /// Set the start timestamp in seconds.
    #[must_use]
    pub fn with_start(mut self, seconds: u64) -> Self {
        self.start_seconds = seconds;
        self
    }

    /// Set the end timestamp in seconds.
    #[must_use]
    pub fn with_end(mut self, seconds: Option<u64>) -> Self {
        self.end_seconds = seconds;
        self
    }
}

/// A validated extraction job.
///
/// Built only by [`VideoJob::new`], so `stride > 0` and
/// `start_frame < end_frame <= frame_count` hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJob {
    source_path: PathBuf,
    frame_count: u64,
    fps: u64,
    stride: u64,
    range: SampleRange,
}

impl VideoJob {
    /// Validate `request` against the decoder's metadata.
    ///
    /// # Errors
    ///
    /// Any error of [`resolve_range`].
    pub fn new(
        request: &ExtractRequest,
        metadata: &VideoMetadata,
    ) -> Result<Self, FramesplitError> {
        let range = resolve_range(
            metadata.frame_count,
            metadata.frames_per_second,
            request.start_seconds,
            request.end_seconds,
            request.stride,
        )?;

        Ok(Self {
            source_path: request.path.clone(),
            frame_count: metadata.frame_count,
            fps: metadata.frames_per_second,
            stride: request.stride,
            range,
        })
    }

    /// Video being read.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Total frames reported by the decoder.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whole frames per second reported by the decoder.
    pub fn fps(&self) -> u64 {
        self.fps
    }

    /// Distance between extracted frames.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Frames to scan, `[start_frame, end_frame)`.
    pub fn range(&self) -> SampleRange {
        self.range
    }

    /// First frame to extract.
    pub fn start_frame(&self) -> u64 {
        self.range.start_frame()
    }

    /// Exclusive upper bound of the scan.
    pub fn end_frame(&self) -> u64 {
        self.range.end_frame()
    }

    /// Frames a complete run writes.
    pub fn expected_frames(&self) -> u64 {
        self.range.expected_frames(self.stride)
    }

    /// Base name of the output directory, before any collision suffix.
    ///
    /// ```
    /// # use framesplit::{ExtractRequest, VideoJob, VideoMetadata};
    /// # use std::time::Duration;
    /// # let metadata = VideoMetadata {
    /// #     width: 1, height: 1, frames_per_second: 10, exact_frames_per_second: 10.0,
    /// #     frame_count: 1000, duration: Duration::from_secs(100), codec: "h264".into(),
    /// # };
    /// let request = ExtractRequest::new("/videos/holiday.mp4").with_stride(5).with_start(1);
    /// let job = VideoJob::new(&request, &metadata)?;
    /// assert_eq!(
    ///     job.output_directory_name(),
    ///     "holiday_frames_split_every_5_frames_between_10_1000",
    /// );
    /// # Ok::<(), framesplit::FramesplitError>(())
    /// ```
    pub fn output_directory_name(&self) -> String {
        let stem = self
            .source_path
            .file_stem()
            .unwrap_or_else(|| OsStr::new("video"))
            .to_string_lossy();
        let noun = if self.stride == 1 { "frame" } else { "frames" };
        format!(
            "{stem}_frames_split_every_{}_{noun}_between_{}_{}",
            self.stride,
            self.start_frame(),
            self.end_frame(),
        )
    }

    /// Directory the output directory is created in: the source's parent.
    pub fn output_parent(&self) -> &Path {
        self.source_path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Create a fresh output directory next to the source video.
    ///
    /// # Errors
    ///
    /// Returns [`FramesplitError::IoError`] for any failure other than the
    /// name being taken.
    pub fn create_output_directory(&self) -> Result<PathBuf, FramesplitError> {
        create_unique_directory(self.output_parent(), &self.output_directory_name())
    }
}

/// Create `parent/base`, or `parent/base (n)` for the smallest free `n >= 1`.
pub(crate) fn create_unique_directory(
    parent: &Path,
    base: &str,
) -> Result<PathBuf, FramesplitError> {
    let mut candidate = parent.join(base);
    let mut suffix: u64 = 0;

    loop {
        match fs::create_dir(&candidate) {
            Ok(()) => {
                log::debug!("Created output directory {}", candidate.display());
                return Ok(candidate);
            }
            Err(error) if error.kind() == ErrorKind::AlreadyExists => {
                suffix += 1;
                candidate = parent.join(format!("{base} ({suffix})"));
            }
            Err(error) => return Err(error.into()),
        }
    }
}
