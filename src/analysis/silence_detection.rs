use serde::{Deserialize, Serialize};

use super::edges::rising_edges;
use super::energy::{normalized_energy, reference_energy};
use super::windowing::windows;
use crate::error::SegmenterError;
use crate::export::manifest::TimestampStyle;
use crate::media::{AudioData, PcmSample, SampleBuffer};
use crate::timeline::Timeline;

/// Configuration for silence detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SilenceDetectionConfig {
    /// Minimum silence length in seconds; also the analysis window duration
    pub min_silence_length: f64,
    /// Normalized energy (0.0-1.0) at or below which a window is silent
    pub silence_threshold: f64,
    /// Seconds to advance between windows. Smaller is slower but cuts more precisely.
    /// `None` means `min_silence_length / 10`.
    pub step_duration: Option<f64>,
    /// How manifest timestamps render their fractional part
    pub timestamp_style: TimestampStyle,
    /// Detect and report segments without writing any files
    pub dry_run: bool,
}

impl Default for SilenceDetectionConfig {
    fn default() -> Self {
        SilenceDetectionConfig {
            min_silence_length: 0.6,
            silence_threshold: 1e-4,
            step_duration: Some(0.003),
            timestamp_style: TimestampStyle::default(),
            dry_run: false,
        }
    }
}

impl SilenceDetectionConfig {
    /// Step duration with the `min_silence_length / 10` fallback applied
    pub fn effective_step_duration(&self) -> f64 {
        self.step_duration
            .unwrap_or(self.min_silence_length / 10.0)
    }

    pub fn validate(&self) -> Result<(), SegmenterError> {
        if !(self.min_silence_length > 0.0) || !self.min_silence_length.is_finite() {
            return Err(SegmenterError::InvalidArgument(format!(
                "min_silence_length must be a positive number of seconds, got {}",
                self.min_silence_length
            )));
        }
        if !(self.silence_threshold > 0.0 && self.silence_threshold < 1.0) {
            return Err(SegmenterError::InvalidArgument(format!(
                "silence_threshold must be in (0, 1), got {}",
                self.silence_threshold
            )));
        }
        let step = self.effective_step_duration();
        if !(step > 0.0) || !step.is_finite() {
            return Err(SegmenterError::InvalidArgument(format!(
                "step_duration must be a positive number of seconds, got {}",
                step
            )));
        }
        Ok(())
    }

    /// True when the step is longer than the window, so onsets can be missed
    pub fn has_coarse_step(&self) -> bool {
        self.effective_step_duration() > self.min_silence_length
    }
}

/// Window and step sizes in frames for one sample rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    pub window_size: usize,
    pub step_size: usize,
}

impl WindowParams {
    /// Converts durations to frame counts, truncating toward zero
    pub fn from_config(
        config: &SilenceDetectionConfig,
        sample_rate: u32,
    ) -> Result<Self, SegmenterError> {
        config.validate()?;
        if sample_rate == 0 {
            return Err(SegmenterError::InvalidArgument(
                "sample rate must be positive".to_string(),
            ));
        }

        let rate = sample_rate as f64;
        let window_size = (config.min_silence_length * rate) as usize;
        let step_size = (config.effective_step_duration() * rate) as usize;

        if window_size == 0 {
            return Err(SegmenterError::InvalidArgument(format!(
                "min_silence_length {}s is shorter than one sample at {} Hz",
                config.min_silence_length, sample_rate
            )));
        }
        if step_size == 0 {
            return Err(SegmenterError::InvalidArgument(format!(
                "step_duration {}s is shorter than one sample at {} Hz",
                config.effective_step_duration(),
                sample_rate
            )));
        }

        Ok(WindowParams {
            window_size,
            step_size,
        })
    }
}

/// Returns true when the energy is above the threshold (non-silent)
pub fn is_non_silent(energy: f64, threshold: f64) -> bool {
    energy > threshold
}

/// Lazily maps normalized energies to non-silence flags
pub fn classify<I>(energies: I, threshold: f64) -> impl Iterator<Item = bool>
where
    I: IntoIterator<Item = f64>,
{
    energies
        .into_iter()
        .map(move |e| is_non_silent(e, threshold))
}

/// Window indices where the signal turns from silent to non-silent.
/// Energy, classification and edge detection run as one lazy pass.
pub fn detect_edges<S: PcmSample>(
    buffer: &SampleBuffer<S>,
    params: WindowParams,
    threshold: f64,
) -> Result<Vec<usize>, SegmenterError> {
    let reference = reference_energy(buffer.max_amplitude());
    let signal_windows = windows(buffer, params.window_size, params.step_size)?;
    log::debug!(
        "Scanning {} windows (size {}, step {})",
        signal_windows.len(),
        params.window_size,
        params.step_size
    );

    let window_energy = signal_windows.map(|w| normalized_energy(&w, reference));
    let edges: Vec<usize> = rising_edges(classify(window_energy, threshold)).collect();

    log::debug!("Found {} rising edges", edges.len());
    Ok(edges)
}

/// Runs the full detection pipeline on one buffer
pub fn detect_segments<S: PcmSample>(
    buffer: &SampleBuffer<S>,
    config: &SilenceDetectionConfig,
) -> Result<Timeline, SegmenterError> {
    let params = WindowParams::from_config(config, buffer.sample_rate())?;
    log::info!(
        "Splitting where energy is below {}% for longer than {}s",
        config.silence_threshold * 100.0,
        config.min_silence_length
    );

    let edges = detect_edges(buffer, params, config.silence_threshold)?;
    Ok(Timeline::from_edges(
        edges,
        params.step_size,
        buffer.frames(),
        buffer.sample_rate(),
    ))
}

/// Detects segments in decoded audio of either numeric domain
pub fn detect_silence(
    audio: &AudioData,
    config: &SilenceDetectionConfig,
) -> Result<Timeline, SegmenterError> {
    let timeline = match audio {
        AudioData::Int(buffer) => detect_segments(buffer, config)?,
        AudioData::Float(buffer) => detect_segments(buffer, config)?,
    };

    for (segment, (start, end)) in timeline.segments.iter().zip(timeline.bounds()) {
        log::debug!(
            "  Segment {}: frames {}..{} ({:.2}s)",
            segment.index,
            start,
            end,
            (end - start) as f64 / timeline.sample_rate as f64
        );
    }

    Ok(timeline)
}
