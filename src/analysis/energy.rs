use super::windowing::Window;
use crate::media::{Amplitude, PcmSample};

/// Mean of squared sample values, accumulated in f64 so that wide
/// integer samples cannot overflow. Returns 0.0 for an empty slice.
pub fn energy<A: Amplitude>(samples: &[A]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    sum_of_squares(samples) / samples.len() as f64
}

fn sum_of_squares<A: Amplitude>(samples: &[A]) -> f64 {
    samples
        .iter()
        .map(|&s| {
            let v = s.to_f64();
            v * v
        })
        .sum()
}

/// Energy of a single sample at the format's maximum amplitude
pub fn reference_energy(max_amplitude: f64) -> f64 {
    energy(&[max_amplitude])
}

impl<'a, S: PcmSample> Window<'a, S> {
    /// Sum of squares across every channel, divided by the frame count.
    /// Equal to [`energy`] for mono input.
    pub fn energy(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        sum_of_squares(self.samples) / self.frames as f64
    }
}

/// Window energy relative to `reference` (see [`reference_energy`])
pub fn normalized_energy<S: PcmSample>(window: &Window<'_, S>, reference: f64) -> f64 {
    window.energy() / reference
}
