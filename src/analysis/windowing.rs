use crate::error::SegmenterError;
use crate::media::{PcmSample, SampleBuffer};

/// A fixed-size view over `frames` consecutive frames of the buffer
#[derive(Debug, Clone, Copy)]
pub struct Window<'a, S> {
    /// Frame offset of the first frame in the window
    pub start_frame: usize,
    pub samples: &'a [S],
    pub frames: usize,
}

/// Lazy sequence of windows at offsets `0, step, 2*step, ...`.
/// A window is yielded only while `offset + window_size < frames`,
/// so the final partial window is always dropped.
#[derive(Debug, Clone)]
pub struct Windows<'a, S> {
    buffer: &'a SampleBuffer<S>,
    window_size: usize,
    step_size: usize,
    next_start: usize,
}

/// Creates the window iterator, rejecting zero sizes before anything is yielded
pub fn windows<S: PcmSample>(
    buffer: &SampleBuffer<S>,
    window_size: usize,
    step_size: usize,
) -> Result<Windows<'_, S>, SegmenterError> {
    if window_size == 0 {
        return Err(SegmenterError::InvalidArgument(
            "window size must be a positive number of samples".to_string(),
        ));
    }
    if step_size == 0 {
        return Err(SegmenterError::InvalidArgument(
            "step size must be a positive number of samples".to_string(),
        ));
    }

    Ok(Windows {
        buffer,
        window_size,
        step_size,
        next_start: 0,
    })
}

impl<'a, S: PcmSample> Windows<'a, S> {
    fn remaining(&self) -> usize {
        let total = self.buffer.frames();
        // Largest valid start is total - window_size - 1
        match total
            .checked_sub(self.window_size)
            .and_then(|n| n.checked_sub(1))
        {
            Some(last_start) if self.next_start <= last_start => {
                (last_start - self.next_start) / self.step_size + 1
            }
            _ => 0,
        }
    }
}

impl<'a, S: PcmSample> Iterator for Windows<'a, S> {
    type Item = Window<'a, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start;
        let end = start.checked_add(self.window_size)?;
        if end >= self.buffer.frames() {
            return None;
        }
        self.next_start = start.saturating_add(self.step_size);

        Some(Window {
            start_frame: start,
            samples: self.buffer.frame_slice(start, end),
            frames: self.window_size,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl<'a, S: PcmSample> ExactSizeIterator for Windows<'a, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(frames: usize) -> SampleBuffer<i32> {
        SampleBuffer::new((0..frames as i32).collect(), 1, 8000, 16, 32767.0).unwrap()
    }

    #[test]
    fn test_offsets_follow_step() {
        let buffer = mono(10);
        let starts: Vec<usize> = windows(&buffer, 3, 2).unwrap().map(|w| w.start_frame).collect();
        // 6 + 3 = 9 < 10 is the last valid window; 8 + 3 >= 10 is dropped
        assert_eq!(starts, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_window_that_reaches_end_is_dropped() {
        let buffer = mono(6);
        let starts: Vec<usize> = windows(&buffer, 3, 3).unwrap().map(|w| w.start_frame).collect();
        assert_eq!(starts, vec![0]);
    }

    #[test]
    fn test_window_views_buffer() {
        let buffer = mono(10);
        let w = windows(&buffer, 3, 4).unwrap().nth(1).unwrap();
        assert_eq!(w.samples, &[4, 5, 6]);
        assert_eq!(w.frames, 3);
    }

    #[test]
    fn test_stereo_window_spans_all_channels() {
        let buffer = SampleBuffer::new((0..12).collect::<Vec<i32>>(), 2, 8000, 16, 32767.0).unwrap();
        let first = windows(&buffer, 2, 1).unwrap().next().unwrap();
        assert_eq!(first.samples, &[0, 1, 2, 3]);
        assert_eq!(first.frames, 2);
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        let buffer = mono(10);
        assert!(matches!(windows(&buffer, 0, 1), Err(SegmenterError::InvalidArgument(_))));
        assert!(matches!(windows(&buffer, 1, 0), Err(SegmenterError::InvalidArgument(_))));
    }

    #[test]
    fn test_short_and_empty_buffers_yield_nothing() {
        assert_eq!(windows(&mono(3), 3, 1).unwrap().count(), 0);
        assert_eq!(windows(&mono(0), 1, 1).unwrap().count(), 0);
    }

    #[test]
    fn test_size_hint_is_exact() {
        for (frames, size, step) in [(10, 3, 2), (100, 7, 3), (5, 5, 1), (50, 1, 50)] {
            let buffer = mono(frames);
            let iter = windows(&buffer, size, step).unwrap();
            let hinted = iter.len();
            assert_eq!(hinted, iter.count(), "frames={frames} size={size} step={step}");
        }
    }

    #[test]
    fn test_huge_window_yields_nothing() {
        let buffer = mono(100);
        assert_eq!(windows(&buffer, usize::MAX, 1).unwrap().len(), 0);
        assert_eq!(windows(&buffer, usize::MAX, 1).unwrap().count(), 0);
        assert_eq!(windows(&buffer, usize::MAX - 1, usize::MAX).unwrap().len(), 0);
    }

    #[test]
    fn test_recomputation_is_deterministic() {
        let buffer = mono(40);
        let a: Vec<usize> = windows(&buffer, 5, 3).unwrap().map(|w| w.start_frame).collect();
        let b: Vec<usize> = windows(&buffer, 5, 3).unwrap().map(|w| w.start_frame).collect();
        assert_eq!(a, b);
    }
}
