use crate::collector::{Collector, MergeLaw};

/// A collector assembled from four plain function values.
#[derive(Clone)]
pub struct FnCollector<Z, Acc, Cmb, Fin> {
    zero: Z,
    accumulate: Acc,
    combine: Cmb,
    finish: Fin,
    law: MergeLaw,
}

/// Build a collector from `zero`, `accumulate`, `combine` and `finish` functions.
///
/// ```
/// use ironstream::*;
/// use ironstream::collectors::collector_of;
///
/// let longest = collector_of(
///     || 0usize,
///     |acc: &mut usize, s: String| *acc = (*acc).max(s.len()),
///     |acc: &mut usize, other: usize| *acc = (*acc).max(other),
///     |acc: usize| acc,
///     MergeLaw::Commutative,
/// );
/// let n = from_vec(vec!["ab".to_string(), "abcd".to_string()]).collect(longest)?;
/// assert_eq!(n, 4);
/// # Ok::<(), StreamError>(())
/// ```
pub fn collector_of<Z, Acc, Cmb, Fin>(
    zero: Z,
    accumulate: Acc,
    combine: Cmb,
    finish: Fin,
    law: MergeLaw,
) -> FnCollector<Z, Acc, Cmb, Fin> {
    FnCollector {
        zero,
        accumulate,
        combine,
        finish,
        law,
    }
}

impl<T, A, R, Z, Acc, Cmb, Fin> Collector<T, A, R> for FnCollector<Z, Acc, Cmb, Fin>
where
    Z: Fn() -> A + Send + Sync,
    Acc: Fn(&mut A, T) + Send + Sync,
    Cmb: Fn(&mut A, A) + Send + Sync,
    Fin: Fn(A) -> R + Send + Sync,
{
    fn zero(&self) -> A {
        (self.zero)()
    }

    fn accumulate(&self, acc: &mut A, item: T) {
        (self.accumulate)(acc, item)
    }

    fn combine(&self, acc: &mut A, other: A) {
        (self.combine)(acc, other)
    }

    fn finish(&self, acc: A) -> R {
        (self.finish)(acc)
    }

    fn merge_law(&self) -> MergeLaw {
        self.law
    }
}
