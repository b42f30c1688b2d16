/// How a collector's `combine` step may be used when partial results are merged.
///
/// The parallel runner always folds chunk results left-to-right by chunk index, so
/// an associative `combine` already reproduces the sequential result. `Commutative`
/// additionally promises order-independence; `SequentialOnly` opts out of parallel
/// evaluation entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MergeLaw {
    /// `combine` is associative but order-sensitive (lists, joined strings).
    Associative,
    /// `combine` is associative and commutative (counts, sets, sums).
    Commutative,
    /// Partial results cannot be merged safely.
    SequentialOnly,
}

impl MergeLaw {
    pub fn allows_parallel(self) -> bool {
        !matches!(self, MergeLaw::SequentialOnly)
    }

    /// The weaker of two laws; used by collectors that wrap a downstream collector.
    pub fn weakest(self, other: MergeLaw) -> MergeLaw {
        use MergeLaw::*;
        match (self, other) {
            (SequentialOnly, _) | (_, SequentialOnly) => SequentialOnly,
            (Associative, _) | (_, Associative) => Associative,
            (Commutative, Commutative) => Commutative,
        }
    }
}

/// Associative aggregation strategy: `zero`, `accumulate`, `combine`, `finish`.
///
/// Implementations must keep `combine` associative and satisfy
/// `combine(zero, a) == a` for every reachable accumulator `a`; the parallel runner
/// relies on both to reproduce the sequential result.
///
/// Each element type `T` is folded into an accumulator `A`, and `finish` turns the
/// final accumulator into the result `R`.
pub trait Collector<T, A, R>: Send + Sync {
    fn zero(&self) -> A;
    fn accumulate(&self, acc: &mut A, item: T);
    fn combine(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> R;

    fn merge_law(&self) -> MergeLaw {
        MergeLaw::Associative
    }
}

#[cfg(test)]
mod tests {
    use super::MergeLaw::*;

    #[test]
    fn weakest_law_wins() {
        assert_eq!(Commutative.weakest(Commutative), Commutative);
        assert_eq!(Commutative.weakest(Associative), Associative);
        assert_eq!(Associative.weakest(SequentialOnly), SequentialOnly);
        assert!(!SequentialOnly.allows_parallel());
    }
}
