//! # framesplit
//!
//! Split a video into still frames: extract every Nth frame between two
//! timestamps and save each one as an image, named by its index in the
//! source video.
//!
//! Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate and frames are
//! encoded with [`image`](https://crates.io/crates/image).
//!
//! ## Quick Start
//!
//! ```no_run
//! use framesplit::{ExtractOptions, ExtractRequest, parse_timestamp};
//!
//! // Every 5th frame between 00:01:00 and 00:01:30.
//! let request = ExtractRequest::new("input.mp4")
//!     .with_stride(5)
//!     .with_start(parse_timestamp("00:01:00")?)
//!     .with_end(Some(parse_timestamp("00:01:30")?));
//!
//! let summary = framesplit::run(&request, &ExtractOptions::new())?;
//! println!("Frames directory: {}", summary.output_directory.display());
//! # Ok::<(), framesplit::FramesplitError>(())
//! ```
//!
//! ## Step by step
//!
//! ```no_run
//! use framesplit::{ExtractOptions, ExtractRequest, VideoFile, VideoJob};
//!
//! let request = ExtractRequest::new("input.mp4").with_stride(10);
//! let mut video = VideoFile::open(&request.path)?;
//! let job = VideoJob::new(&request, video.metadata())?;
//! let directory = job.create_output_directory()?;
//! let summary = framesplit::extract_frames(&mut video, &job, &directory, &ExtractOptions::new())?;
//! assert!(summary.frames_written <= job.expected_frames());
//! # Ok::<(), framesplit::FramesplitError>(())
//! ```
//!
//! ## Features
//!
//! - **Timestamps** as plain seconds (`125`) or `HH:MM:SS` (`00:02:05`)
//! - **Range validation** against the decoder's frame count, with clamping of
//!   the end and clear errors for empty or inverted ranges
//! - **Collision-free output**: a new directory per run, suffixed ` (1)`,
//!   ` (2)`, … when the name is taken
//! - **Two seek strategies**: reposition per sample or decode sequentially
//! - **Progress callbacks** for long runs
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod arguments;
pub mod configuration;
pub mod error;
pub mod extract;
pub mod ffmpeg;
pub mod job;
pub mod metadata;
pub mod progress;
pub mod range;
pub mod timestamp;
mod utilities;
pub mod video;

pub use arguments::{parse_frame_format, parse_stride, resolve_source_path};
pub use configuration::{ExtractOptions, FrameFormat, SeekMode};
pub use error::FramesplitError;
pub use extract::{ExtractionSummary, extract_frames, frame_file_name, run};
pub use ffmpeg::set_ffmpeg_log_level;
pub use job::{ExtractRequest, VideoJob};
pub use metadata::VideoMetadata;
pub use progress::{ProgressCallback, ProgressInfo};
pub use range::{SampleRange, resolve_range};
pub use timestamp::parse_timestamp;
pub use video::{FrameSource, VideoFile};
