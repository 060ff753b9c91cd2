use crate::analysis::{detect_silence, SilenceDetectionConfig};
use crate::error::SegmenterError;
use crate::export::{export_segments, Manifest};
use crate::media::decode_wav;
use crate::timeline::Timeline;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of splitting one input file
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub input: PathBuf,
    pub timeline: Timeline,
    pub manifest_entries: usize,
    /// Files written to the output directory; empty for a dry run
    pub written: Vec<PathBuf>,
}

/// Per-file outcome inside a batch
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<SplitSummary, SegmenterError>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Decodes one WAV file, detects its segments and writes them out
pub fn split_file(
    input: &Path,
    output_dir: &Path,
    config: &SilenceDetectionConfig,
) -> Result<SplitSummary, SegmenterError> {
    log::info!("Starting split pipeline for: {:?}", input);
    config.validate()?;

    let prefix = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            SegmenterError::InvalidArgument(format!("invalid input file name: {:?}", input))
        })?
        .to_string();

    let audio = decode_wav(input)?;
    let timeline = detect_silence(&audio, config)?;
    let manifest = Manifest::from_timeline(&timeline, config.timestamp_style);

    let written = if config.dry_run {
        for entry in &manifest.entries {
            log::info!(
                "[DRY RUN] {}_{:03}.wav: {} - {}",
                prefix,
                entry.index,
                entry.start,
                entry.end
            );
        }
        Vec::new()
    } else {
        export_segments(&audio, &timeline, &manifest, output_dir, &prefix)?
    };

    log::info!(
        "{:?} will be sliced into {} segment file(s)",
        input,
        timeline.len()
    );

    Ok(SplitSummary {
        input: input.to_path_buf(),
        manifest_entries: manifest.len(),
        timeline,
        written,
    })
}

/// Lists `.wav` files (any case) in `dir`, sorted by path
pub fn list_wav_files(dir: &Path) -> Result<Vec<PathBuf>, SegmenterError> {
    let entries = fs::read_dir(dir).map_err(|e| SegmenterError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SegmenterError::io(dir, e))?.path();
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if is_wav && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Splits every WAV file in `input_dir`, one at a time.
/// A failing file is logged and recorded; the rest of the batch still runs.
pub fn split_directory(
    input_dir: &Path,
    output_dir: &Path,
    config: &SilenceDetectionConfig,
) -> Result<BatchReport, SegmenterError> {
    config.validate()?;
    if config.has_coarse_step() {
        log::warn!(
            "step_duration {}s is longer than min_silence_length {}s; cut points will be coarse",
            config.effective_step_duration(),
            config.min_silence_length
        );
    }
    let files = list_wav_files(input_dir)?;
    log::info!("Found {} WAV file(s) in {:?}", files.len(), input_dir);

    if !config.dry_run && !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|e| SegmenterError::io(output_dir, e))?;
    }

    let mut report = BatchReport::default();
    for path in files {
        log::info!("IN-WAV: {:?} OUTPUT: {:?}", path, output_dir);
        let result = split_file(&path, output_dir, config);
        match &result {
            Ok(summary) => log::info!(
                "[SUCCESS] Sliced {:?} into {} segment(s)",
                path,
                summary.timeline.len()
            ),
            Err(e) => log::error!("[FAILED] Processing {:?} failed: {}", path, e),
        }
        report.outcomes.push(FileOutcome { path, result });
    }

    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(report)
}
