//! Sequential video decoding.
//!
//! [`VideoFile`] opens a file with FFmpeg, caches its [`VideoMetadata`], and
//! hands out decoded frames one at a time as RGB [`DynamicImage`]s. The
//! extraction loop only talks to it through the [`FrameSource`] trait: a
//! positioned `seek`, a sequential `read_frame`, and a cheaper `skip_frame`.
//!
//! The FFmpeg demuxer and decoder are released when the `VideoFile` is
//! dropped, so every exit path closes the file.
//!
//! # Example
//!
//! ```no_run
//! use framesplit::{FrameSource, VideoFile};
//!
//! let mut video = VideoFile::open("input.mp4")?;
//! let metadata = video.metadata();
//! println!("{} frames at {} fps", metadata.frame_count, metadata.frames_per_second);
//!
//! video.seek(100)?;
//! if let Some(image) = video.read_frame()? {
//!     image.save("frame100.png")?;
//! }
//! # Ok::<(), framesplit::FramesplitError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::{error::FramesplitError, metadata::VideoMetadata, utilities};

/// FFmpeg's marker for an unset timestamp.
const NO_PTS: i64 = i64::MIN;

/// Give up after this many consecutive unreadable packets.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 32;

/// A source of decoded frames in presentation order.
///
/// Implemented by [`VideoFile`]; the extraction loop is generic over it so it
/// can be driven by any decoder.
pub trait FrameSource {
    /// Position the source so the next read returns frame `frame_index`.
    fn seek(&mut self, frame_index: u64) -> Result<(), FramesplitError>;

    /// Decode the next frame. `Ok(None)` means the stream has ended.
    fn read_frame(&mut self) -> Result<Option<DynamicImage>, FramesplitError>;

    /// Advance past the next frame without producing an image. Returns
    /// `false` if the stream had already ended.
    fn skip_frame(&mut self) -> Result<bool, FramesplitError> {
        Ok(self.read_frame()?.is_some())
    }
}

/// An open video file positioned at a frame index.
pub struct VideoFile {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    metadata: VideoMetadata,
    path: PathBuf,
    video_stream_index: usize,
    time_base: Rational,
    /// First PTS of the stream; frame numbers count from here.
    start_pts: i64,
    /// Stream start expressed in AV_TIME_BASE, added to seek targets.
    start_time_micros: i64,
    /// Index of the frame the next read returns.
    position: u64,
    /// Set after a seek: frames before it are pre-roll from the keyframe.
    seek_target: Option<u64>,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("path", &self.path)
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("position", &self.position)
            .field("seek_target", &self.seek_target)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file and prepare a decoder for its best video stream.
    ///
    /// # Errors
    ///
    /// - [`FramesplitError::FileOpen`] if FFmpeg cannot open or parse the
    ///   file.
    /// - [`FramesplitError::NoVideoStream`] if it has no video stream.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramesplitError> {
        let path = path.as_ref().to_path_buf();

        log::debug!("Opening video: {}", path.display());
        crate::ffmpeg::initialize(&path)?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| FramesplitError::FileOpen {
                path: path.clone(),
                reason: error.to_string(),
            })?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let (video_stream_index, time_base, frame_rate, stream_frames, start_pts, decoder) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(FramesplitError::NoVideoStream)?;

            let index = stream.index();
            let decoder_context =
                CodecContext::from_parameters(stream.parameters()).map_err(|error| {
                    FramesplitError::FileOpen {
                        path: path.clone(),
                        reason: format!(
                            "Failed to read video codec parameters for stream {index}: {error}"
                        ),
                    }
                })?;
            let decoder =
                decoder_context
                    .decoder()
                    .video()
                    .map_err(|error| FramesplitError::FileOpen {
                        path: path.clone(),
                        reason: format!(
                            "Failed to create video decoder for stream {index}: {error}"
                        ),
                    })?;

            let frame_rate = if stream.avg_frame_rate().denominator() != 0 {
                stream.avg_frame_rate()
            } else {
                stream.rate()
            };
            let start_pts = match stream.start_time() {
                NO_PTS => 0,
                pts => pts,
            };

            (index, stream.time_base(), frame_rate, stream.frames(), start_pts, decoder)
        };

        let exact_frames_per_second = utilities::rational_to_fps(frame_rate);
        let frame_count =
            VideoMetadata::estimate_frame_count(stream_frames, duration, exact_frames_per_second);
        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            frames_per_second: exact_frames_per_second.trunc() as u64,
            exact_frames_per_second,
            frame_count,
            duration,
            codec,
        };

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            metadata.width,
            metadata.height,
            ScalingFlags::BILINEAR,
        )?;

        let start_time_micros =
            (utilities::pts_to_seconds(start_pts, time_base) * 1_000_000.0) as i64;

        log::info!(
            "Opened {}: {}x{} {} @ {:.3} fps, {} frames, {:.2}s",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.codec,
            metadata.exact_frames_per_second,
            metadata.frame_count,
            metadata.duration.as_secs_f64(),
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            metadata,
            path,
            video_stream_index,
            time_base,
            start_pts,
            start_time_micros,
            position: 0,
            seek_target: None,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
        })
    }

    /// Metadata cached when the file was opened.
    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the frame the next read returns.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Frame number of `decoded_frame`, from its timestamp when it has one.
    fn decoded_frame_number(&self) -> u64 {
        match self.decoded_frame.timestamp().or_else(|| self.decoded_frame.pts()) {
            Some(pts) => utilities::pts_to_frame_number(
                pts,
                self.start_pts,
                self.time_base,
                self.metadata.exact_frames_per_second,
            ),
            None => self.position,
        }
    }

    /// Feed the decoder one more packet of the video stream.
    fn feed_packet(&mut self) -> Result<(), FramesplitError> {
        let mut read_errors = 0;
        loop {
            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        self.decoder.send_packet(&packet)?;
                        return Ok(());
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                    return Ok(());
                }
                Err(error) => {
                    read_errors += 1;
                    log::debug!("Skipping unreadable packet in {}: {error}", self.path.display());
                    if read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                        return Err(FramesplitError::VideoDecodeError(format!(
                            "{read_errors} consecutive packet read failures, last: {error}"
                        )));
                    }
                }
            }
        }
    }

    /// Decode the frame at `position` into `decoded_frame`.
    ///
    /// Returns `false` once the decoder is drained.
    fn decode_next(&mut self) -> Result<bool, FramesplitError> {
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                if let Some(target) = self.seek_target {
                    let current = self.decoded_frame_number();
                    if current < target {
                        continue;
                    }
                    if current > target {
                        log::debug!("Seek to frame {target} landed on frame {current}");
                    }
                    self.seek_target = None;
                }
                self.position += 1;
                return Ok(true);
            }

            if self.eof_sent {
                return Ok(false);
            }
            self.feed_packet()?;
        }
    }

    /// Scale `decoded_frame` to RGB24 and wrap it as an image.
    fn convert_decoded_frame(&mut self) -> Result<DynamicImage, FramesplitError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;

        let width = self.metadata.width;
        let height = self.metadata.height;
        let buffer = utilities::frame_to_rgb_buffer(&self.rgb_frame, width, height);
        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            FramesplitError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

impl FrameSource for VideoFile {
    /// Seeks the demuxer to the keyframe at or before `frame_index`; the
    /// frames between it and the target are decoded and dropped on the next
    /// read.
    fn seek(&mut self, frame_index: u64) -> Result<(), FramesplitError> {
        if frame_index == self.position && self.seek_target.is_none() {
            return Ok(());
        }
        if self.metadata.exact_frames_per_second <= 0.0 {
            return Err(FramesplitError::InvalidFrameRate);
        }

        let timestamp = utilities::frame_number_to_seek_timestamp(
            frame_index,
            self.metadata.exact_frames_per_second,
            self.start_time_micros,
        );
        log::trace!("Seeking to frame {frame_index} (ts {timestamp})");

        self.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.seek_target = Some(frame_index);
        self.position = frame_index;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<DynamicImage>, FramesplitError> {
        if !self.decode_next()? {
            return Ok(None);
        }
        self.convert_decoded_frame().map(Some)
    }

    fn skip_frame(&mut self) -> Result<bool, FramesplitError> {
        self.decode_next()
    }
}
