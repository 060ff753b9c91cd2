use hound::{SampleFormat, WavReader, WavSpec};
use std::path::Path;

use super::sample_buffer::{int_max_amplitude, SampleBuffer};
use crate::error::SegmenterError;

/// Decoded WAV contents, keeping the source numeric domain
#[derive(Debug, Clone)]
pub enum AudioData {
    /// Integer PCM of any width hound reads (8/16/24/32 bit)
    Int(SampleBuffer<i32>),
    /// 32-bit float PCM, nominally in [-1.0, 1.0]
    Float(SampleBuffer<f32>),
}

impl AudioData {
    pub fn frames(&self) -> usize {
        match self {
            AudioData::Int(b) => b.frames(),
            AudioData::Float(b) => b.frames(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        match self {
            AudioData::Int(b) => b.sample_rate(),
            AudioData::Float(b) => b.sample_rate(),
        }
    }

    pub fn max_amplitude(&self) -> f64 {
        match self {
            AudioData::Int(b) => b.max_amplitude(),
            AudioData::Float(b) => b.max_amplitude(),
        }
    }

    /// WAV header that reproduces the source layout
    pub fn spec(&self) -> WavSpec {
        let (channels, sample_rate, bits_per_sample, sample_format) = match self {
            AudioData::Int(b) => (b.channels(), b.sample_rate(), b.bits_per_sample(), SampleFormat::Int),
            AudioData::Float(b) => (b.channels(), b.sample_rate(), b.bits_per_sample(), SampleFormat::Float),
        };
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Reads a whole WAV file into memory
pub fn decode_wav(wav_path: &Path) -> Result<AudioData, SegmenterError> {
    log::info!("Decoding WAV file: {:?}", wav_path);

    let decode_err = |source| SegmenterError::Decode {
        path: wav_path.to_path_buf(),
        source,
    };

    let reader = WavReader::open(wav_path).map_err(decode_err)?;
    let spec = reader.spec();
    log::debug!("WAV spec: {:?}", spec);

    let audio = match spec.sample_format {
        SampleFormat::Int => {
            let max_amplitude = int_max_amplitude(spec.bits_per_sample).ok_or_else(|| {
                SegmenterError::UnsupportedFormat(format!(
                    "{}-bit integer PCM",
                    spec.bits_per_sample
                ))
            })?;
            let samples: Vec<i32> = reader
                .into_samples::<i32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(decode_err)?;
            AudioData::Int(SampleBuffer::new(
                samples,
                spec.channels,
                spec.sample_rate,
                spec.bits_per_sample,
                max_amplitude,
            )?)
        }
        SampleFormat::Float => {
            if spec.bits_per_sample != 32 {
                return Err(SegmenterError::UnsupportedFormat(format!(
                    "{}-bit float PCM",
                    spec.bits_per_sample
                )));
            }
            let samples: Vec<f32> = reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(decode_err)?;
            AudioData::Float(SampleBuffer::new(
                samples,
                spec.channels,
                spec.sample_rate,
                spec.bits_per_sample,
                1.0,
            )?)
        }
    };

    log::info!(
        "Read {} frames at {} Hz ({} channel(s))",
        audio.frames(),
        audio.sample_rate(),
        spec.channels
    );

    Ok(audio)
}
