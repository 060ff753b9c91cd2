pub mod decode_audio;
pub mod sample_buffer;

pub use decode_audio::{decode_wav, AudioData};
pub use sample_buffer::{Amplitude, PcmSample, SampleBuffer};
