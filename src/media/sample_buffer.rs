use crate::error::SegmenterError;

/// A numeric value that can be squared for energy estimation
pub trait Amplitude: Copy {
    fn to_f64(self) -> f64;
}

impl Amplitude for i32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Amplitude for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Amplitude for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

/// A PCM sample type the detector can square and the writer can encode
pub trait PcmSample: Amplitude + hound::Sample {}

impl<T: Amplitude + hound::Sample> PcmSample for T {}

/// Decoded audio held in memory for one run.
/// Samples are interleaved; offsets elsewhere in the crate are frame offsets.
#[derive(Debug, Clone)]
pub struct SampleBuffer<S> {
    samples: Vec<S>,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    max_amplitude: f64,
}

impl<S: PcmSample> SampleBuffer<S> {
    /// Creates a buffer, checking the layout is consistent
    pub fn new(
        samples: Vec<S>,
        channels: u16,
        sample_rate: u32,
        bits_per_sample: u16,
        max_amplitude: f64,
    ) -> Result<Self, SegmenterError> {
        if channels == 0 {
            return Err(SegmenterError::InvalidArgument(
                "channel count must be positive".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(SegmenterError::InvalidArgument(
                "sample rate must be positive".to_string(),
            ));
        }
        if !(max_amplitude > 0.0) {
            return Err(SegmenterError::InvalidArgument(format!(
                "max amplitude must be positive, got {}",
                max_amplitude
            )));
        }
        if samples.len() % channels as usize != 0 {
            return Err(SegmenterError::InvalidArgument(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }

        Ok(SampleBuffer {
            samples,
            channels,
            sample_rate,
            bits_per_sample,
            max_amplitude,
        })
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[S] {
        &self.samples
    }

    /// Interleaved samples covering frames `[start, end)`, clamped to the buffer
    pub fn frame_slice(&self, start: usize, end: usize) -> &[S] {
        let ch = self.channels as usize;
        let end = end.min(self.frames());
        let start = start.min(end);
        &self.samples[start * ch..end * ch]
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    /// Largest representable amplitude of the source format
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Maximum positive value of a signed integer PCM sample of the given width.
/// `None` outside 1..=32 bits.
pub(crate) fn int_max_amplitude(bits_per_sample: u16) -> Option<f64> {
    if !(1..=32).contains(&bits_per_sample) {
        return None;
    }
    Some(((1i64 << (bits_per_sample - 1)) - 1) as f64)
}
