use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Where a segment stops. `EndOfBuffer` is the sentinel that stands for
/// "through the final frame" and is written as `-1` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum SegmentEnd {
    /// Exclusive frame offset
    Sample(usize),
    EndOfBuffer,
}

impl SegmentEnd {
    /// Resolves the sentinel to `total_frames`
    pub fn resolve(self, total_frames: usize) -> usize {
        match self {
            SegmentEnd::Sample(n) => n.min(total_frames),
            SegmentEnd::EndOfBuffer => total_frames,
        }
    }
}

impl From<SegmentEnd> for i64 {
    fn from(end: SegmentEnd) -> i64 {
        match end {
            SegmentEnd::Sample(n) => n as i64,
            SegmentEnd::EndOfBuffer => -1,
        }
    }
}

impl TryFrom<i64> for SegmentEnd {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(SegmentEnd::EndOfBuffer),
            n if n >= 0 => Ok(SegmentEnd::Sample(n as usize)),
            n => Err(format!("invalid segment end marker {}", n)),
        }
    }
}

impl fmt::Display for SegmentEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i64::from(*self))
    }
}

/// One non-silent region of the recording, in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 0-based position in the timeline
    pub index: usize,
    /// Inclusive start frame
    pub start_sample: usize,
    pub end: SegmentEnd,
}

impl Segment {
    pub fn new(index: usize, start_sample: usize, end: SegmentEnd) -> Self {
        Segment {
            index,
            start_sample,
            end,
        }
    }

    /// Exclusive end frame with the sentinel resolved
    pub fn end_sample(&self, total_frames: usize) -> usize {
        self.end.resolve(total_frames)
    }

    /// Frame range `[start, end)` within a buffer of `total_frames`
    pub fn range(&self, total_frames: usize) -> Range<usize> {
        let end = self.end_sample(total_frames);
        self.start_sample.min(end)..end
    }

    pub fn frame_count(&self, total_frames: usize) -> usize {
        self.range(total_frames).len()
    }

    /// Duration in seconds
    pub fn duration(&self, total_frames: usize, sample_rate: u32) -> f64 {
        self.frame_count(total_frames) as f64 / sample_rate as f64
    }

    /// Output file name: `<prefix>_NNN.<ext>`
    pub fn file_name(&self, prefix: &str, extension: &str) -> String {
        format!("{}_{:03}.{}", prefix, self.index, extension)
    }
}
