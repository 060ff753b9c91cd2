pub mod edges;
pub mod energy;
pub mod silence_detection;
pub mod windowing;

pub use edges::{rising_edges, RisingEdges};
pub use energy::{energy, normalized_energy, reference_energy};
pub use silence_detection::{
    classify, detect_edges, detect_segments, detect_silence, is_non_silent,
    SilenceDetectionConfig, WindowParams,
};
pub use windowing::{windows, Window, Windows};
