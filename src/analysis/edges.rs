/// Iterator adapter yielding the indices where a boolean sequence turns
/// from false to true. The value before index 0 counts as false.
#[derive(Debug, Clone)]
pub struct RisingEdges<I> {
    inner: I,
    index: usize,
    previous: bool,
}

/// Finds the starts of `true` runs in a single pass.
pub fn rising_edges<I>(flags: I) -> RisingEdges<I::IntoIter>
where
    I: IntoIterator<Item = bool>,
{
    RisingEdges {
        inner: flags.into_iter(),
        index: 0,
        previous: false,
    }
}

impl<I: Iterator<Item = bool>> Iterator for RisingEdges<I> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        for flag in self.inner.by_ref() {
            let index = self.index;
            let rising = flag && !self.previous;
            self.previous = flag;
            self.index += 1;
            if rising {
                return Some(index);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At most one edge per two flags, plus one if the next flag can rise
        let (_, upper) = self.inner.size_hint();
        let extra = usize::from(!self.previous);
        (0, upper.map(|n| n.saturating_add(extra) / 2))
    }
}
