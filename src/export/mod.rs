pub mod manifest;
pub mod wav_export;

pub use manifest::{format_timestamp, parse_timestamp, Manifest, ManifestEntry, TimestampStyle};
pub use wav_export::{export_segments, write_segment};
