//! pdf-speech - Convert PDF documents to spoken-word MP3 audio

mod audio;
mod config;
mod extract;
mod pipeline;
mod report;
mod text;

use clap::Parser;
use config::AppConfig;
use pipeline::RunPlan;
use report::Reporter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tts_client::BackendKind;

const DEFAULT_LOG_FILE: &str = "pdf_speech.log";

const EXIT_AUDIO: u8 = 2;
const EXIT_INVALID_ARGS: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "pdf-speech")]
#[command(about = "Convert PDF documents to MP3 audio using text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the input PDF file
    input: PathBuf,

    /// Path for the output MP3 file
    output: PathBuf,

    /// Text-to-speech engine: "cloud" (requires internet) or "offline"
    #[arg(long)]
    engine: Option<String>,

    /// Voice language code (e.g. "en")
    #[arg(long)]
    lang: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Log file path
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    logfile: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit 3, not clap's default 2, which is reserved for
    // audio generation failures
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e)
            if matches!(
                e.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) =>
        {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    // Argument validation happens before any file I/O, the config file and
    // run log included
    let flag_kind = match args.engine.as_deref().map(BackendKind::from_str).transpose() {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    if !has_mp3_extension(&args.output) {
        eprintln!(
            "error: output file must have .mp3 extension: {}",
            args.output.display()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: failed to load configuration: {e}");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let kind = match flag_kind {
        Some(kind) => kind,
        None => match BackendKind::from_str(&config.engine) {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        },
    };

    let mut reporter = match Reporter::open(&args.logfile, args.verbose) {
        Ok(reporter) => reporter,
        Err(e) => {
            eprintln!("error: cannot open log file {}: {e}", args.logfile.display());
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let backend = match tts_client::get_backend(kind) {
        Ok(backend) => backend,
        Err(e) => {
            reporter.error(&format!("{e}"));
            return ExitCode::from(EXIT_AUDIO);
        }
    };

    let plan = RunPlan {
        input: args.input.clone(),
        output: args.output.clone(),
        language: args.lang.unwrap_or(config.language),
        speaking_rate: config.speaking_rate,
        bitrate: config.bitrate,
    };

    eprintln!(
        "Converting: {} -> {} (engine: {})",
        plan.input.display(),
        plan.output.display(),
        kind.as_str()
    );
    reporter.info(&format!(
        "Starting conversion: {} -> {} (engine: {})",
        plan.input.display(),
        plan.output.display(),
        kind.as_str()
    ));

    match pipeline::run(&plan, backend.as_ref(), &mut reporter).await {
        Ok(summary) => {
            let size_mb = summary.output_bytes as f64 / (1024.0 * 1024.0);
            eprintln!(
                "Output: {} ({:.1} MB, {} pages, {} segments)",
                plan.output.display(),
                size_mb,
                summary.pages,
                summary.segments
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            reporter.error(&format!("{e}"));
            ExitCode::from(e.exit_code())
        }
    }
}

/// Check the output path ends in .mp3 (case-insensitive)
fn has_mp3_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}
