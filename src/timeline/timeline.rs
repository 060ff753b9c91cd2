use super::segment::{Segment, SegmentEnd};
use serde::{Deserialize, Serialize};

/// Ordered, contiguous segments covering a recording from its first onset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    /// Frame offsets of the detected rising edges
    pub cut_points: Vec<usize>,
    pub total_frames: usize,
    pub sample_rate: u32,
}

impl Timeline {
    /// Builds segments from rising-edge window indices.
    ///
    /// Each edge becomes the cut point `edge * step_size`; the end-of-buffer
    /// sentinel closes the last segment. Audio before the first cut point is
    /// leading silence and belongs to no segment. Zero edges give a single
    /// `(0, 0, EndOfBuffer)` segment. An empty buffer has no segments.
    pub fn from_edges<I>(edges: I, step_size: usize, total_frames: usize, sample_rate: u32) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let cut_points: Vec<usize> = edges.into_iter().map(|edge| edge * step_size).collect();

        if total_frames == 0 {
            log::info!("Empty buffer, no segments");
            return Timeline {
                segments: Vec::new(),
                cut_points,
                total_frames,
                sample_rate,
            };
        }

        let starts = if cut_points.is_empty() {
            vec![0]
        } else {
            cut_points.clone()
        };

        let segments: Vec<Segment> = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts
                    .get(i + 1)
                    .map_or(SegmentEnd::EndOfBuffer, |&next| SegmentEnd::Sample(next));
                Segment::new(i, start, end)
            })
            .collect();

        log::info!(
            "Timeline has {} segments from {} cut points",
            segments.len(),
            cut_points.len()
        );

        Timeline {
            segments,
            cut_points,
            total_frames,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Duration of the whole recording in seconds
    pub fn total_duration(&self) -> f64 {
        self.total_frames as f64 / self.sample_rate as f64
    }

    /// Resolved `(start, end)` frame bounds for each segment
    pub fn bounds(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.segments
            .iter()
            .map(move |s| (s.start_sample, s.end_sample(self.total_frames)))
    }

    /// Returns the segment containing the given frame
    pub fn segment_at(&self, frame: usize) -> Option<&Segment> {
        self.segments
            .iter()
            .find(|s| s.range(self.total_frames).contains(&frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Segments tile `[cut[0], N)`, or `[0, N)` when nothing was cut
    fn assert_partitions(timeline: &Timeline) {
        let mut expected_start = timeline.cut_points.first().copied().unwrap_or(0);
        for (start, end) in timeline.bounds() {
            assert_eq!(start, expected_start, "gap or overlap at {start}");
            assert!(end > start);
            expected_start = end;
        }
        assert_eq!(expected_start, timeline.total_frames);
    }

    #[test]
    fn test_no_edges_gives_single_segment() {
        let timeline = Timeline::from_edges(Vec::new(), 24, 8000, 8000);
        assert_eq!(timeline.segments, vec![Segment::new(0, 0, SegmentEnd::EndOfBuffer)]);
        assert!(timeline.cut_points.is_empty());
        assert_partitions(&timeline);
    }

    #[test]
    fn test_edges_become_cut_points() {
        let timeline = Timeline::from_edges(vec![0, 10, 25], 24, 10_000, 8000);
        assert_eq!(timeline.cut_points, vec![0, 240, 600]);
        assert_eq!(
            timeline.segments,
            vec![
                Segment::new(0, 0, SegmentEnd::Sample(240)),
                Segment::new(1, 240, SegmentEnd::Sample(600)),
                Segment::new(2, 600, SegmentEnd::EndOfBuffer),
            ]
        );
        assert_partitions(&timeline);
    }

    #[test]
    fn test_leading_silence_is_dropped() {
        let timeline = Timeline::from_edges(vec![100, 200], 10, 5000, 8000);
        assert_eq!(timeline.cut_points, vec![1000, 2000]);
        assert_eq!(
            timeline.segments,
            vec![
                Segment::new(0, 1000, SegmentEnd::Sample(2000)),
                Segment::new(1, 2000, SegmentEnd::EndOfBuffer),
            ]
        );
        assert!(timeline.segment_at(999).is_none());
        assert_partitions(&timeline);
    }

    #[test]
    fn test_segment_starts_are_cut_points() {
        let timeline = Timeline::from_edges(vec![234, 901], 24, 40_000, 8000);
        let starts: Vec<usize> = timeline.segments.iter().map(|s| s.start_sample).collect();
        assert_eq!(starts, timeline.cut_points);
        assert_eq!(timeline.segments[0].start_sample, 5616);
    }

    #[test]
    fn test_empty_buffer_has_no_segments() {
        let timeline = Timeline::from_edges(Vec::new(), 10, 0, 8000);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_partition_holds_for_many_layouts() {
        for step in [1usize, 3, 24, 240] {
            for edges in [vec![], vec![0], vec![1], vec![0, 1, 2], vec![5, 9, 40, 41]] {
                let last = edges.last().map_or(0, |&e| e * step);
                let timeline = Timeline::from_edges(edges.clone(), step, last + step + 1, 8000);
                assert_partitions(&timeline);
            }
        }
    }

    #[test]
    fn test_segment_at() {
        let timeline = Timeline::from_edges(vec![0, 10], 100, 3000, 1000);
        assert_eq!(timeline.segment_at(999).map(|s| s.index), Some(0));
        assert_eq!(timeline.segment_at(1000).map(|s| s.index), Some(1));
        assert_eq!(timeline.segment_at(2999).map(|s| s.index), Some(1));
        assert!(timeline.segment_at(3000).is_none());
        assert_eq!(timeline.total_duration(), 3.0);
    }
}
