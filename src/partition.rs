//! Contiguous chunking of finite sources for parallel evaluation.

use std::ops::Range;

/// Ordered, disjoint, contiguous index ranges covering a source exactly once.
///
/// Chunk sizes differ by at most one element: the first `len % parts` chunks carry
/// the extra element. A partition always has at least one chunk, so an empty source
/// still produces a single (empty) chunk and the collector's zero reaches `finish`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkPartition {
    ranges: Vec<Range<usize>>,
}

impl ChunkPartition {
    /// Split `span` into up to `parts` near-equal contiguous ranges.
    ///
    /// `parts` is clamped to `1..=span.len()` (or 1 for an empty span).
    ///
    /// ```
    /// use ironstream::ChunkPartition;
    /// let p = ChunkPartition::split(0..10, 3);
    /// assert_eq!(p.ranges(), &[0..4, 4..7, 7..10]);
    /// ```
    pub fn split(span: Range<usize>, parts: usize) -> Self {
        let len = span.len();
        let parts = parts.max(1).min(len.max(1));
        let base = len / parts;
        let extra = len % parts;

        let mut ranges = Vec::with_capacity(parts);
        let mut start = span.start;
        for i in 0..parts {
            let size = base + usize::from(i < extra);
            ranges.push(start..start + size);
            start += size;
        }
        Self { ranges }
    }

    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sizes of each chunk, in order.
    pub fn sizes(&self) -> Vec<usize> {
        self.ranges.iter().map(|r| r.len()).collect()
    }
}

impl IntoIterator for ChunkPartition {
    type Item = Range<usize>;
    type IntoIter = std::vec::IntoIter<Range<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_span_exactly_once() {
        for len in 0..40usize {
            for parts in 1..9usize {
                let p = ChunkPartition::split(5..5 + len, parts);
                let mut next = 5;
                for r in p.ranges() {
                    assert_eq!(r.start, next);
                    next = r.end;
                }
                assert_eq!(next, 5 + len);

                let sizes = p.sizes();
                let max = sizes.iter().copied().max().unwrap();
                let min = sizes.iter().copied().min().unwrap();
                assert!(max - min <= 1, "len={len} parts={parts} sizes={sizes:?}");
            }
        }
    }

    #[test]
    fn empty_span_yields_one_empty_chunk() {
        let p = ChunkPartition::split(0..0, 4);
        assert_eq!(p.ranges(), &[0..0]);
    }

    #[test]
    fn never_more_chunks_than_elements() {
        let p = ChunkPartition::split(0..3, 8);
        assert_eq!(p.len(), 3);
        assert_eq!(p.sizes(), vec![1, 1, 1]);
    }
}
