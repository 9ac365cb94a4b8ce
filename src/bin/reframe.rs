use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use reframe::{
    FfmpegLogLevel, MediaFile, OperationType, ProgressCallback, ProgressInfo, RetargetJob,
    RetargetOptions,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  reframe run input.mp4 --split-frame 180 --progress\n  reframe run input.mp4 --out final.mp4 --fps 30 --crf 20 --overwrite\n  reframe metadata input.mp4 --json\n  reframe completions zsh > _reframe";

#[derive(Debug, Parser)]
#[command(
    name = "reframe",
    version,
    about = "Retarget a video into a blended portrait/landscape cut",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional output.
    #[arg(long)]
    verbose: bool,

    /// Show progress bars where supported.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting an existing final output file.
    #[arg(long)]
    overwrite: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Desired worker thread count for the retarget pass.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full retargeting pipeline on a video file.
    #[command(
        about = "Extract, splice, retarget, encode, and graft audio",
        after_help = "Examples:\n  reframe run input.mp4 --split-frame 180 --progress\n  reframe run input.mp4 --keep-workspace --verbose"
    )]
    Run {
        /// Input video path.
        input: PathBuf,

        /// First frame number taken from the landscape pass. Prompted for
        /// when absent.
        #[arg(long)]
        split_frame: Option<u64>,

        /// Final output path (defaults to Output2.mp4 next to the input).
        #[arg(long)]
        out: Option<PathBuf>,

        /// Output frame rate.
        #[arg(long, default_value_t = 30)]
        fps: u32,

        /// Encoder Constant Rate Factor (0-51, lower is better).
        #[arg(long)]
        crf: Option<u32>,

        /// Keep the work directories and intermediate video on disk.
        #[arg(long)]
        keep_workspace: bool,
    },

    /// Print metadata for a media file (alias: probe).
    #[command(
        about = "Print media metadata",
        visible_alias = "probe",
        visible_alias = "info",
        after_help = "Examples:\n  reframe metadata input.mp4\n  reframe metadata input.mp4 --json"
    )]
    Metadata {
        /// Input media path.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate media structure and print a report.
    #[command(about = "Validate media file")]
    Validate {
        /// Input media path.
        input: PathBuf,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" | "warn" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

fn parse_split_frame(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Where the pipeline writes its final output when `--out` is not given.
fn default_output_path(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join("Output2.mp4"),
        _ => PathBuf::from("Output2.mp4"),
    }
}

/// Ask on the terminal which frame number starts the landscape half.
fn prompt_split_frame() -> Result<u64, Box<dyn std::error::Error>> {
    eprint!("{} ", "Enter first landscape frame:".cyan().bold());
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    parse_split_frame(&line)
        .ok_or_else(|| format!("invalid frame number: {}", line.trim()).into())
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        reframe::set_ffmpeg_log_level(parsed);
    }

    if let Some(threads) = global.threads {
        if threads > 0 {
            unsafe {
                std::env::set_var("RAYON_NUM_THREADS", threads.to_string());
            }
        }
    }

    Ok(())
}

fn operation_label(operation: OperationType) -> &'static str {
    match operation {
        OperationType::FrameExtraction => "extracting",
        OperationType::Retargeting => "retargeting",
        OperationType::Encoding => "encoding",
        OperationType::Remuxing => "remuxing",
        _ => "working",
    }
}

/// Progress bars driven by the library's callback. One bar per pipeline
/// step; switching operations finishes the previous bar.
struct TerminalProgress {
    state: Mutex<Option<(OperationType, ProgressBar)>>,
}

impl TerminalProgress {
    fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };

        let switch = match &*state {
            Some((operation, _)) => *operation != info.operation,
            None => true,
        };

        if switch {
            if let Some((_, bar)) = state.take() {
                bar.finish_and_clear();
            }
            let bar = match info.total {
                Some(total) => {
                    let bar = ProgressBar::new(total);
                    if let Ok(style) = ProgressStyle::with_template(
                        "{spinner:.green} {msg:12} {bar:40.cyan/blue} {pos}/{len}",
                    ) {
                        bar.set_style(style.progress_chars("##-"));
                    }
                    bar
                }
                None => ProgressBar::new_spinner(),
            };
            bar.set_message(operation_label(info.operation));
            *state = Some((info.operation, bar));
        }

        if let Some((_, bar)) = &*state {
            bar.set_position(info.current);
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Run {
            input,
            split_frame,
            out,
            fps,
            crf,
            keep_workspace,
        } => {
            let output_path = out.unwrap_or_else(|| default_output_path(&input));
            ensure_writable_path(&output_path, cli.global.overwrite)?;

            let split_frame = match split_frame {
                Some(frame) => frame,
                None => prompt_split_frame()?,
            };

            if cli.global.verbose {
                let media = MediaFile::open(&input)?;
                let metadata = media.metadata();
                if let Some(video) = &metadata.video {
                    eprintln!(
                        "input: {}x{} @ {:.2} fps, ~{} frames [{}]",
                        video.width,
                        video.height,
                        video.frames_per_second,
                        video.frame_count,
                        video.codec,
                    );
                }
            }

            let mut options = RetargetOptions::new()
                .with_split_frame(split_frame)
                .with_fps(fps)
                .with_keep_workspace(keep_workspace)
                .with_output_path(output_path);
            if let Some(crf) = crf {
                options = options.with_crf(crf);
            }
            if cli.global.progress {
                options = options.with_progress(Arc::new(TerminalProgress::new()));
            }

            let outcome = RetargetJob::new(&input, options).run()?;

            eprintln!(
                "Retargeting frames took: {:.2} seconds",
                outcome.retarget_elapsed.as_secs_f64(),
            );
            println!(
                "{} {}",
                "success:".green().bold(),
                format!(
                    "Wrote {} frame(s) to {}",
                    outcome.frame_count,
                    outcome.output_path.display()
                )
                .green()
            );
        }
        Commands::Metadata { input, json } => {
            let media = MediaFile::open(&input)?;
            let metadata = media.metadata();
            if json {
                let payload = json!({
                    "format": metadata.format,
                    "duration_seconds": metadata.duration.as_secs_f64(),
                    "video": metadata.video.as_ref().map(|video| json!({
                        "width": video.width,
                        "height": video.height,
                        "fps": video.frames_per_second,
                        "frame_count": video.frame_count,
                        "codec": video.codec,
                        "portrait": video.is_portrait(),
                    })),
                    "audio": metadata.audio.as_ref().map(|audio| json!({
                        "sample_rate": audio.sample_rate,
                        "channels": audio.channels,
                        "codec": audio.codec,
                        "bit_rate": audio.bit_rate,
                    })),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Format: {}", metadata.format);
                println!("Duration: {:?}", metadata.duration);
                if let Some(video) = &metadata.video {
                    println!(
                        "Video: {}x{} @ {:.2} fps [{}]{}",
                        video.width,
                        video.height,
                        video.frames_per_second,
                        video.codec,
                        if video.is_portrait() { " portrait" } else { "" },
                    );
                }
                if let Some(audio) = &metadata.audio {
                    println!(
                        "Audio: {} Hz, {} ch [{}]",
                        audio.sample_rate, audio.channels, audio.codec,
                    );
                }
            }
        }
        Commands::Validate { input } => {
            let media = MediaFile::open(&input)?;
            let report = media.validate();
            print!("{report}");
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "reframe", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::{default_output_path, parse_log_level, parse_split_frame};

    #[test]
    fn parse_split_frame_values() {
        assert_eq!(parse_split_frame("180"), Some(180));
        assert_eq!(parse_split_frame("  42\n"), Some(42));
        assert_eq!(parse_split_frame("0"), Some(0));
        assert_eq!(parse_split_frame("-3"), None);
        assert_eq!(parse_split_frame("abc"), None);
        assert_eq!(parse_split_frame(""), None);
    }

    #[test]
    fn parse_log_level_aliases() {
        assert!(parse_log_level("quiet").is_some());
        assert!(parse_log_level("WARN").is_some());
        assert!(parse_log_level("warning").is_some());
        assert!(parse_log_level("chatty").is_none());
    }

    #[test]
    fn default_output_is_sibling_of_input() {
        assert_eq!(
            default_output_path(Path::new("/videos/input.mp4")),
            PathBuf::from("/videos/Output2.mp4"),
        );
        assert_eq!(
            default_output_path(Path::new("input.mp4")),
            PathBuf::from("Output2.mp4"),
        );
    }
}
