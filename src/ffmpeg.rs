//! FFmpeg initialisation and log verbosity.
//!
//! FFmpeg prints through its own logger, separate from the Rust
//! [`log`](https://crates.io/crates/log) facade. [`set_ffmpeg_log_level`]
//! keeps the two in step by mapping a [`log::LevelFilter`] onto FFmpeg's
//! levels, so a single `--verbose` switch controls both.

use std::path::Path;

use ffmpeg_next::util::log::Level;
use log::LevelFilter;

use crate::error::FramesplitError;

/// Initialise FFmpeg. Safe to call more than once.
pub(crate) fn initialize(path: &Path) -> Result<(), FramesplitError> {
    ffmpeg_next::init().map_err(|error| FramesplitError::FileOpen {
        path: path.to_path_buf(),
        reason: format!("FFmpeg initialisation failed: {error}"),
    })
}

/// Map a Rust log filter onto FFmpeg's verbosity levels.
///
/// FFmpeg's `info` level is chatty (stream dumps), so `Info` maps to FFmpeg
/// warnings and only `Debug`/`Trace` open it up further.
fn to_ffmpeg_level(filter: LevelFilter) -> Level {
    match filter {
        LevelFilter::Off => Level::Quiet,
        LevelFilter::Error => Level::Error,
        LevelFilter::Warn | LevelFilter::Info => Level::Warning,
        LevelFilter::Debug => Level::Verbose,
        LevelFilter::Trace => Level::Debug,
    }
}

/// Set FFmpeg's own console verbosity from a Rust log filter.
///
/// # Example
///
/// ```no_run
/// framesplit::set_ffmpeg_log_level(log::LevelFilter::Error);
/// ```
pub fn set_ffmpeg_log_level(filter: LevelFilter) {
    ffmpeg_next::util::log::set_level(to_ffmpeg_level(filter));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_mapping() {
        assert_eq!(to_ffmpeg_level(LevelFilter::Off), Level::Quiet);
        assert_eq!(to_ffmpeg_level(LevelFilter::Info), Level::Warning);
        assert_eq!(to_ffmpeg_level(LevelFilter::Trace), Level::Debug);
    }
}
