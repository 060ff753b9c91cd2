use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SegmenterError;
use crate::timeline::Timeline;

/// How the fractional part of a manifest timestamp is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampStyle {
    /// Milliseconds derived from the sub-second remainder
    #[default]
    Milliseconds,
    /// Always `.001`, matching manifests produced by older tooling
    Legacy,
}

/// Formats a frame offset as `HH:MM:SS.mmm`.
/// Hours are not wrapped at 24.
pub fn format_timestamp(sample: usize, sample_rate: u32, style: TimestampStyle) -> String {
    let rate = sample_rate.max(1) as u64;
    let sample = sample as u64;
    let total_seconds = sample / rate;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = match style {
        TimestampStyle::Milliseconds => (sample % rate) * 1000 / rate,
        TimestampStyle::Legacy => 1,
    };
    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Parses `HH:MM:SS[.fff]` back into seconds
pub fn parse_timestamp(timestamp: &str) -> Option<f64> {
    let mut parts = timestamp.trim().splitn(3, ':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }
    Some((hours * 3600 + minutes * 60) as f64 + seconds)
}

/// One manifest row: segment index with its start/end timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub index: usize,
    pub start: String,
    pub end: String,
}

/// Mapping from segment index to `[start, end]` timestamps.
/// Serializes as a JSON object keyed by the index string, in segment order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Builds the manifest, resolving the end-of-buffer sentinel to the
    /// buffer length before formatting
    pub fn from_timeline(timeline: &Timeline, style: TimestampStyle) -> Self {
        let entries = timeline
            .segments
            .iter()
            .map(|segment| ManifestEntry {
                index: segment.index,
                start: format_timestamp(segment.start_sample, timeline.sample_rate, style),
                end: format_timestamp(
                    segment.end_sample(timeline.total_frames),
                    timeline.sample_rate,
                    style,
                ),
            })
            .collect();
        Manifest { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, SegmenterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.index.to_string(), &[&entry.start, &entry.end])?;
        }
        map.end()
    }
}
