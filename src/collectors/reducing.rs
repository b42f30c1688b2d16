use crate::collector::{Collector, MergeLaw};

/// Reduction with a binary operator. The accumulator stays `None` until the first
/// element, so an empty input finishes as `None` rather than an identity value.
///
/// The operator's algebraic properties cannot be inspected, so the caller declares
/// them through `law`.
#[derive(Clone, Debug)]
pub struct Reducing<F> {
    op: F,
    law: MergeLaw,
}

pub fn reducing<F>(op: F, law: MergeLaw) -> Reducing<F> {
    Reducing { op, law }
}

impl<T, F> Collector<T, Option<T>, Option<T>> for Reducing<F>
where
    F: Fn(T, T) -> T + Send + Sync,
{
    fn zero(&self) -> Option<T> {
        None
    }

    fn accumulate(&self, acc: &mut Option<T>, item: T) {
        *acc = Some(match acc.take() {
            Some(prev) => (self.op)(prev, item),
            None => item,
        });
    }

    fn combine(&self, acc: &mut Option<T>, other: Option<T>) {
        if let Some(right) = other {
            self.accumulate(acc, right);
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }

    fn merge_law(&self) -> MergeLaw {
        self.law
    }
}
