use hound::{WavSpec, WavWriter};
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::manifest::Manifest;
use crate::error::SegmenterError;
use crate::media::{AudioData, PcmSample, SampleBuffer};
use crate::timeline::Timeline;

/// Writes every segment of `timeline` as `<prefix>_NNN.wav` plus
/// `<prefix>.json` into `output_dir`.
///
/// Files are first written to a staging directory inside `output_dir` and
/// only moved into place once all of them succeeded, so a failed run leaves
/// no segment files behind. Fails without touching `output_dir` when any
/// target file already exists.
pub fn export_segments(
    audio: &AudioData,
    timeline: &Timeline,
    manifest: &Manifest,
    output_dir: &Path,
    prefix: &str,
) -> Result<Vec<PathBuf>, SegmenterError> {
    log::info!(
        "Exporting {} segments of {} to {:?}",
        timeline.len(),
        prefix,
        output_dir
    );

    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|e| SegmenterError::io(output_dir, e))?;
    }

    let staging = tempfile::Builder::new()
        .prefix(".wav-segmenter-")
        .tempdir_in(output_dir)
        .map_err(|e| SegmenterError::io(output_dir, e))?;

    let spec = audio.spec();
    let mut file_names = Vec::with_capacity(timeline.len() + 1);

    for segment in &timeline.segments {
        let file_name = segment.file_name(prefix, "wav");
        let staged_path = staging.path().join(&file_name);
        let range = segment.range(timeline.total_frames);
        log::debug!(
            "Writing segment {}/{}: {} ({} frames)",
            segment.index + 1,
            timeline.len(),
            file_name,
            range.len()
        );

        match audio {
            AudioData::Int(buffer) => write_segment(buffer, spec, range, &staged_path)?,
            AudioData::Float(buffer) => write_segment(buffer, spec, range, &staged_path)?,
        }
        file_names.push(file_name);
    }

    let manifest_name = format!("{}.json", prefix);
    let manifest_path = staging.path().join(&manifest_name);
    fs::write(&manifest_path, manifest.to_json()?)
        .map_err(|e| SegmenterError::io(&manifest_path, e))?;
    file_names.push(manifest_name);

    let written = persist_staged(staging, &file_names, output_dir)?;
    log::info!("Export of {} completed: {} files", prefix, written.len());
    Ok(written)
}

/// Writes frames `range` of the buffer as a WAV file with the source layout
pub fn write_segment<S: PcmSample>(
    buffer: &SampleBuffer<S>,
    spec: WavSpec,
    range: Range<usize>,
    path: &Path,
) -> Result<(), SegmenterError> {
    let write_err = |source| SegmenterError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WavWriter::create(path, spec).map_err(write_err)?;
    for &sample in buffer.frame_slice(range.start, range.end) {
        writer.write_sample(sample).map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)?;
    Ok(())
}

/// Moves staged files into `output_dir`.
///
/// Existing outputs are never replaced: if any target name is already
/// taken, nothing is moved. On a failed rename the files already moved
/// are removed again and the staging directory is dropped.
fn persist_staged(
    staging: TempDir,
    file_names: &[String],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, SegmenterError> {
    if let Some(taken) = file_names
        .iter()
        .map(|name| output_dir.join(name))
        .find(|path| fs::symlink_metadata(path).is_ok())
    {
        log::error!("Refusing to overwrite existing output {:?}", taken);
        return Err(SegmenterError::io(
            taken,
            io::Error::new(io::ErrorKind::AlreadyExists, "output file already exists"),
        ));
    }

    let mut moved: Vec<PathBuf> = Vec::with_capacity(file_names.len());

    for name in file_names {
        let from = staging.path().join(name);
        let to = output_dir.join(name);
        if let Err(e) = fs::rename(&from, &to) {
            log::error!("Failed to move {:?} into place: {}", to, e);
            for path in &moved {
                if let Err(cleanup) = fs::remove_file(path) {
                    log::warn!("Could not remove partial output {:?}: {}", path, cleanup);
                }
            }
            return Err(SegmenterError::io(to, e));
        }
        moved.push(to);
    }

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::manifest::TimestampStyle;
    use hound::{SampleFormat, WavReader};

    fn stereo_audio() -> AudioData {
        let samples: Vec<i32> = (0..40).collect();
        AudioData::Int(SampleBuffer::new(samples, 2, 10, 16, 32767.0).unwrap())
    }

    #[test]
    fn test_export_writes_segments_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let audio = stereo_audio();
        let timeline = Timeline::from_edges(vec![0, 3], 2, 20, 10);
        let manifest = Manifest::from_timeline(&timeline, TimestampStyle::Milliseconds);

        let written = export_segments(&audio, &timeline, &manifest, dir.path(), "take").unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("take_000.wav"),
                dir.path().join("take_001.wav"),
                dir.path().join("take.json"),
            ]
        );

        let reader = WavReader::open(dir.path().join("take_001.wav")).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.spec().sample_format, SampleFormat::Int);
        let samples: Vec<i32> = reader.into_samples::<i32>().map(|s| s.unwrap()).collect();
        // Frames 6..20 of an interleaved stereo ramp
        assert_eq!(samples, (12..40).collect::<Vec<_>>());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".wav-segmenter-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_export_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let audio = stereo_audio();
        let timeline = Timeline::from_edges(Vec::new(), 2, 20, 10);
        let manifest = Manifest::from_timeline(&timeline, TimestampStyle::Legacy);

        export_segments(&audio, &timeline, &manifest, &nested, "x").unwrap();
        assert!(nested.join("x_000.wav").exists());
        let json = fs::read_to_string(nested.join("x.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["0"][1], "00:00:02.001");
    }

    #[test]
    fn test_failed_persist_removes_moved_files() {
        let dir = tempfile::tempdir().unwrap();
        let audio = stereo_audio();
        let timeline = Timeline::from_edges(vec![0, 3], 2, 20, 10);
        let manifest = Manifest::from_timeline(&timeline, TimestampStyle::Milliseconds);

        // A directory where the manifest should land blocks the whole export
        fs::create_dir(dir.path().join("clash.json")).unwrap();
        fs::write(dir.path().join("clash.json").join("keep"), b"x").unwrap();

        let err = export_segments(&audio, &timeline, &manifest, dir.path(), "clash").unwrap_err();
        assert!(matches!(err, SegmenterError::Io { .. }));
        assert!(!dir.path().join("clash_000.wav").exists());
        assert!(!dir.path().join("clash_001.wav").exists());
        assert!(dir.path().join("clash.json").join("keep").exists());
    }

    #[test]
    fn test_existing_outputs_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let audio = stereo_audio();
        let timeline = Timeline::from_edges(vec![0, 3], 2, 20, 10);
        let manifest = Manifest::from_timeline(&timeline, TimestampStyle::Milliseconds);

        // Segment 1 of an earlier run is still in the output directory
        fs::write(dir.path().join("take_001.wav"), b"earlier run").unwrap();

        let err = export_segments(&audio, &timeline, &manifest, dir.path(), "take").unwrap_err();
        match err {
            SegmenterError::Io { path, source } => {
                assert_eq!(path, dir.path().join("take_001.wav"));
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read(dir.path().join("take_001.wav")).unwrap(), b"earlier run");
        assert!(!dir.path().join("take_000.wav").exists());
        assert!(!dir.path().join("take.json").exists());

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
