// Declare modules
pub mod analysis;
pub mod editor;
pub mod error;
pub mod export;
pub mod media;
pub mod timeline;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

pub use analysis::{detect_segments, detect_silence, SilenceDetectionConfig};
pub use editor::{split_directory, split_file, BatchReport, SplitSummary};
pub use error::SegmenterError;
pub use export::{Manifest, TimestampStyle};
pub use media::{decode_wav, AudioData, SampleBuffer};
pub use timeline::{Segment, SegmentEnd, Timeline};

/// Split WAV recordings at silences into numbered segment files plus a JSON manifest
#[derive(Debug, Parser)]
#[command(name = "wav-segmenter", version, about)]
pub struct Cli {
    /// Directory containing the source .wav files
    pub input_dir: PathBuf,

    /// Directory that receives <name>_NNN.wav segments and <name>.json manifests
    pub output_dir: PathBuf,

    /// JSON file with detection settings; command-line flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum silence length (and analysis window) in seconds
    #[arg(long)]
    pub min_silence_length: Option<f64>,

    /// Normalized energy between 0 and 1 below which audio counts as silent
    #[arg(long)]
    pub silence_threshold: Option<f64>,

    /// Seconds to step between analysis windows
    #[arg(long)]
    pub step_duration: Option<f64>,

    /// Render every timestamp fraction as ".001" like older manifests
    #[arg(long)]
    pub legacy_timestamps: bool,

    /// Detect segments and log them without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Resolves the effective configuration: defaults, then file, then flags
    pub fn resolve_config(&self) -> Result<SilenceDetectionConfig, SegmenterError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SilenceDetectionConfig::default(),
        };

        if let Some(v) = self.min_silence_length {
            config.min_silence_length = v;
        }
        if let Some(v) = self.silence_threshold {
            config.silence_threshold = v;
        }
        if let Some(v) = self.step_duration {
            config.step_duration = Some(v);
        }
        if self.legacy_timestamps {
            config.timestamp_style = TimestampStyle::Legacy;
        }
        if self.dry_run {
            config.dry_run = true;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Reads a `SilenceDetectionConfig` from a JSON file; missing keys take defaults
pub fn load_config(path: &Path) -> Result<SilenceDetectionConfig, SegmenterError> {
    let text = std::fs::read_to_string(path).map_err(|e| SegmenterError::io(path, e))?;
    let config: SilenceDetectionConfig = serde_json::from_str(&text).map_err(|e| {
        SegmenterError::InvalidArgument(format!("bad config file {}: {}", path.display(), e))
    })?;
    log::info!("Loaded config from {:?}", path);
    Ok(config)
}

/// Command-line entry point
pub fn run() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::info!("Starting WAV segmenter");

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(2);
        }
    };
    log::debug!("Effective config: {:?}", config);

    let report = match split_directory(&cli.input_dir, &cli.output_dir, &config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(_) => println!("[SUCCESS] {}", outcome.path.display()),
            Err(e) => println!("[FAILED] {}: {}", outcome.path.display(), e),
        }
    }

    if report.failed() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
