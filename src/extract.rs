//! The extraction loop.
//!
//! [`extract_frames`] walks a [`VideoJob`]'s range on any [`FrameSource`],
//! writing every `stride`-th frame as `frame<index>.<ext>`, where `index` is
//! the frame's position in the source video. [`run`] is the one-call version
//! that opens the video, validates the request and creates the output
//! directory first.
//!
//! A stream that ends before the expected number of frames were written is
//! not an error: the loop stops and the summary reports fewer frames.
//!
//! # Example
//!
//! ```no_run
//! use framesplit::{ExtractOptions, ExtractRequest};
//!
//! let request = ExtractRequest::new("input.mp4").with_stride(30).with_start(10);
//! let summary = framesplit::run(&request, &ExtractOptions::new())?;
//! println!("{} frames in {}", summary.frames_written, summary.output_directory.display());
//! # Ok::<(), framesplit::FramesplitError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::{
    configuration::{ExtractOptions, FrameFormat, SeekMode},
    error::FramesplitError,
    job::{ExtractRequest, VideoJob},
    progress::ProgressReporter,
    video::{FrameSource, VideoFile},
};

/// Outcome of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ExtractionSummary {
    /// Directory holding the written frames.
    pub output_directory: PathBuf,
    /// Frames a complete run writes.
    pub frames_expected: u64,
    /// Frames actually written.
    pub frames_written: u64,
    /// Source index of the last frame written.
    pub last_frame: Option<u64>,
}

impl ExtractionSummary {
    /// `true` unless the stream ended before every expected frame was written.
    pub fn is_complete(&self) -> bool {
        self.frames_written == self.frames_expected
    }
}

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionState {
    /// The source still has to be positioned on the start frame.
    Seeking,
    /// The next read yields `next_frame`.
    Sampling { next_frame: u64 },
    /// Done: every expected frame was written or the stream ended.
    Exhausted,
}

/// File name of a written frame.
pub fn frame_file_name(frame_index: u64, format: FrameFormat) -> String {
    format!("frame{frame_index}.{}", format.extension())
}

/// Write the frames selected by `job` from `source` into `output_directory`.
///
/// The directory must already exist. Files already written stay on disk if a
/// later step fails.
///
/// # Errors
///
/// Returns the first error from the source, or
/// [`FramesplitError::ImageError`] if a frame cannot be written.
pub fn extract_frames<S>(
    source: &mut S,
    job: &VideoJob,
    output_directory: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionSummary, FramesplitError>
where
    S: FrameSource + ?Sized,
{
    let frames_expected = job.expected_frames();
    let mut progress =
        ProgressReporter::new(options.progress.clone(), frames_expected, options.batch_size);
    let image_format = options.format.to_image_format();
    let mut seek_mode = options.seek_mode;

    let mut frames_written: u64 = 0;
    let mut last_frame = None;
    let mut state = ExtractionState::Seeking;

    log::info!(
        "Extracting {frames_expected} frame(s) from [{}, {}) every {} frame(s) into {}",
        job.start_frame(),
        job.end_frame(),
        job.stride(),
        output_directory.display(),
    );

    loop {
        state = match state {
            ExtractionState::Seeking => {
                source.seek(job.start_frame())?;
                ExtractionState::Sampling {
                    next_frame: job.start_frame(),
                }
            }
            ExtractionState::Sampling { next_frame } => match source.read_frame()? {
                None => {
                    log::warn!(
                        "Stream ended at frame {next_frame}, \
                         before the expected {frames_expected} frame(s) were written",
                    );
                    ExtractionState::Exhausted
                }
                Some(image) => {
                    let path = output_directory.join(frame_file_name(next_frame, options.format));
                    image.save_with_format(&path, image_format)?;
                    log::debug!("Wrote {}", path.display());

                    frames_written += 1;
                    last_frame = Some(next_frame);
                    progress.frame_written(next_frame);

                    if frames_written == frames_expected {
                        ExtractionState::Exhausted
                    } else {
                        advance(source, next_frame, job.stride(), &mut seek_mode)?
                    }
                }
            },
            ExtractionState::Exhausted => break,
        };
    }

    progress.finish();

    Ok(ExtractionSummary {
        output_directory: output_directory.to_path_buf(),
        frames_expected,
        frames_written,
        last_frame,
    })
}

/// Move the source from just after `current` to `current + stride`.
///
/// A source that cannot reposition for lack of a frame rate is read forward
/// instead, and `mode` switches to [`SeekMode::Sequential`] for the rest of
/// the run.
fn advance<S>(
    source: &mut S,
    current: u64,
    stride: u64,
    mode: &mut SeekMode,
) -> Result<ExtractionState, FramesplitError>
where
    S: FrameSource + ?Sized,
{
    let next_frame = current + stride;
    if stride == 1 {
        return Ok(ExtractionState::Sampling { next_frame });
    }

    match *mode {
        SeekMode::Sequential => skip_to(source, current, next_frame),
        SeekMode::Reposition => match source.seek(next_frame) {
            Ok(()) => Ok(ExtractionState::Sampling { next_frame }),
            Err(FramesplitError::InvalidFrameRate) => {
                log::warn!(
                    "Source has no frame rate to seek with, decoding sequentially from frame {}",
                    current + 1,
                );
                *mode = SeekMode::Sequential;
                skip_to(source, current, next_frame)
            }
            Err(error) => Err(error),
        },
    }
}

/// Decode and discard the frames strictly between `current` and `next_frame`.
fn skip_to<S>(
    source: &mut S,
    current: u64,
    next_frame: u64,
) -> Result<ExtractionState, FramesplitError>
where
    S: FrameSource + ?Sized,
{
    for skipped in current + 1..next_frame {
        if !source.skip_frame()? {
            log::warn!("Stream ended at frame {skipped} while skipping to {next_frame}");
            return Ok(ExtractionState::Exhausted);
        }
    }
    Ok(ExtractionState::Sampling { next_frame })
}

/// Open `request.path`, validate the request, create the output directory and
/// extract.
///
/// The video is closed before this returns, on success and on every error.
///
/// # Errors
///
/// Errors from [`VideoFile::open`], [`VideoJob::new`],
/// [`VideoJob::create_output_directory`] and [`extract_frames`].
pub fn run(
    request: &ExtractRequest,
    options: &ExtractOptions,
) -> Result<ExtractionSummary, FramesplitError> {
    let mut video = VideoFile::open(&request.path)?;
    let job = VideoJob::new(request, video.metadata())?;
    let output_directory = job.create_output_directory()?;
    extract_frames(&mut video, &job, &output_directory, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_use_source_index() {
        assert_eq!(frame_file_name(10, FrameFormat::Jpeg), "frame10.jpg");
        assert_eq!(frame_file_name(0, FrameFormat::Png), "frame0.png");
    }

    #[test]
    fn complete_only_when_all_written() {
        let summary = ExtractionSummary {
            output_directory: PathBuf::from("out"),
            frames_expected: 3,
            frames_written: 2,
            last_frame: Some(15),
        };
        assert!(!summary.is_complete());
    }
}
