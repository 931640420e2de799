use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use colored::Colorize;
use framesplit::{
    ExtractOptions, ExtractRequest, ExtractionSummary, FrameFormat, FramesplitError,
    ProgressCallback, ProgressInfo, SeekMode, parse_frame_format, parse_stride, parse_timestamp,
    resolve_source_path,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:
  framesplit input.mp4
  framesplit input.mp4 -f 30 -s 00:01:00 -e 00:02:00
  framesplit input.mp4 --frames 5 --start 90 --ext png --json";

#[derive(Debug, Parser)]
#[command(
    name = "framesplit",
    version,
    about = "Extract frames from a video as images",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Path to the video, with extension.
    #[arg(value_parser = resolve_source_path)]
    path: PathBuf,

    /// Split every N frame(s).
    #[arg(
        short = 'f',
        long = "frames",
        value_name = "N",
        default_value = "1",
        value_parser = parse_stride
    )]
    stride: u64,

    /// Start timestamp (HH:MM:SS), or N seconds from the start.
    #[arg(short, long, value_name = "T", default_value = "0", value_parser = parse_timestamp)]
    start: u64,

    /// End timestamp (HH:MM:SS), or N seconds from the start. Defaults to the end of the video.
    #[arg(short, long, value_name = "T", value_parser = parse_timestamp)]
    end: Option<u64>,

    /// Image format of the written frames (jpg, png, bmp, tiff).
    #[arg(long, value_name = "FORMAT", default_value = "jpg", value_parser = parse_frame_format)]
    ext: FrameFormat,

    /// Decode every frame between samples instead of seeking to each one.
    #[arg(long)]
    sequential: bool,

    /// Hide the progress bar.
    #[arg(short, long)]
    quiet: bool,

    /// Show debug logging, including FFmpeg's own messages.
    #[arg(short, long)]
    verbose: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.green} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}<{eta_precise}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("##-"));
        Self { bar }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.bar.set_length(info.expected);
        self.bar.set_position(info.written);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let ffmpeg_filter = if verbose {
        log::max_level()
    } else {
        LevelFilter::Error
    };
    framesplit::set_ffmpeg_log_level(ffmpeg_filter);
}

fn print_summary(summary: &ExtractionSummary, as_json: bool) {
    if as_json {
        let payload = json!({
            "output_directory": summary.output_directory,
            "frames_expected": summary.frames_expected,
            "frames_written": summary.frames_written,
            "last_frame": summary.last_frame,
            "complete": summary.is_complete(),
        });
        println!("{payload:#}");
        return;
    }

    if !summary.is_complete() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "video ended early, wrote {} of {} frame(s)",
                summary.frames_written, summary.frames_expected
            )
            .yellow()
        );
    }
    println!("\nFrames directory: {}", summary.output_directory.display());
}

fn run(cli: &Cli) -> Result<(), FramesplitError> {
    let request = ExtractRequest::new(&cli.path)
        .with_stride(cli.stride)
        .with_start(cli.start)
        .with_end(cli.end);

    let seek_mode = if cli.sequential {
        SeekMode::Sequential
    } else {
        SeekMode::Reposition
    };
    let mut options = ExtractOptions::new()
        .with_format(cli.ext)
        .with_seek_mode(seek_mode);

    let progress = (!cli.quiet && !cli.json).then(|| Arc::new(TerminalProgress::new()));
    if let Some(progress) = &progress {
        options = options.with_progress(progress.clone());
    }

    let result = framesplit::run(&request, &options);
    if let Some(progress) = progress {
        progress.bar.finish();
    }

    print_summary(&result?, cli.json);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(&cli) {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(error.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn sample_file() -> (tempfile::TempDir, String) {
        let directory = tempfile::tempdir().expect("Failed to create temp dir");
        let path = directory.path().join("clip.mp4");
        std::fs::write(&path, b"placeholder").expect("Failed to write placeholder");
        let text = path.to_str().expect("utf-8 temp path").to_string();
        (directory, text)
    }

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let (_directory, path) = sample_file();
        let cli = Cli::try_parse_from(["framesplit", path.as_str()]).unwrap();
        assert_eq!(cli.stride, 1);
        assert_eq!(cli.start, 0);
        assert_eq!(cli.end, None);
        assert_eq!(cli.ext, FrameFormat::Jpeg);
        assert!(cli.path.is_absolute());
    }

    #[test]
    fn short_and_long_flags() {
        let (_directory, path) = sample_file();
        let cli = Cli::try_parse_from([
            "framesplit",
            path.as_str(),
            "-f",
            "5",
            "-s",
            "00:01:00",
            "--end",
            "90",
            "--ext",
            "png",
        ])
        .unwrap();
        assert_eq!(cli.stride, 5);
        assert_eq!(cli.start, 60);
        assert_eq!(cli.end, Some(90));
        assert_eq!(cli.ext, FrameFormat::Png);
    }

    #[test]
    fn rejects_bad_values_before_opening_video() {
        let (_directory, path) = sample_file();
        for args in [
            vec!["framesplit", path.as_str(), "-f", "0"],
            vec!["framesplit", path.as_str(), "-f", "two"],
            vec!["framesplit", path.as_str(), "-s", "abc"],
            vec!["framesplit", path.as_str(), "-e", "99:00"],
            vec!["framesplit", path.as_str(), "--ext", "gif"],
            vec!["framesplit", "definitely_missing_video.mp4"],
        ] {
            let error = Cli::try_parse_from(&args).unwrap_err();
            assert_eq!(error.exit_code(), 2, "{args:?}");
        }
    }
}
