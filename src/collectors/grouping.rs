use std::collections::HashMap;
use std::hash::Hash;

use crate::collector::{Collector, MergeLaw};

/* ===================== GroupingBy ===================== */

/// Two-level aggregation: classify each element to a key, then fold it into that
/// key's downstream accumulator.
///
/// Accumulators are created lazily with the downstream `zero` the first time a key
/// is seen. Merging two partial maps combines per key, initialising missing keys from
/// `zero` first, and `finish` runs once per key when the result is materialised.
#[derive(Clone, Debug)]
pub struct GroupingBy<F, C> {
    classifier: F,
    downstream: C,
}

pub fn grouping_by<F, C>(classifier: F, downstream: C) -> GroupingBy<F, C> {
    GroupingBy {
        classifier,
        downstream,
    }
}

impl<T, K, A, R, F, C> Collector<T, HashMap<K, A>, HashMap<K, R>> for GroupingBy<F, C>
where
    K: Eq + Hash,
    F: Fn(&T) -> K + Send + Sync,
    C: Collector<T, A, R>,
{
    fn zero(&self) -> HashMap<K, A> {
        HashMap::new()
    }

    fn accumulate(&self, acc: &mut HashMap<K, A>, item: T) {
        let key = (self.classifier)(&item);
        let slot = acc.entry(key).or_insert_with(|| self.downstream.zero());
        self.downstream.accumulate(slot, item);
    }

    fn combine(&self, acc: &mut HashMap<K, A>, other: HashMap<K, A>) {
        for (key, partial) in other {
            let slot = acc.entry(key).or_insert_with(|| self.downstream.zero());
            self.downstream.combine(slot, partial);
        }
    }

    fn finish(&self, acc: HashMap<K, A>) -> HashMap<K, R> {
        acc.into_iter()
            .map(|(key, a)| (key, self.downstream.finish(a)))
            .collect()
    }

    fn merge_law(&self) -> MergeLaw {
        self.downstream.merge_law()
    }
}

/* ===================== Mapping ===================== */

/// Apply `mapper` to each element before handing it to `downstream`.
#[derive(Clone, Debug)]
pub struct Mapping<F, C> {
    mapper: F,
    downstream: C,
}

pub fn mapping<F, C>(mapper: F, downstream: C) -> Mapping<F, C> {
    Mapping { mapper, downstream }
}

impl<T, U, A, R, F, C> Collector<T, A, R> for Mapping<F, C>
where
    F: Fn(T) -> U + Send + Sync,
    C: Collector<U, A, R>,
{
    fn zero(&self) -> A {
        self.downstream.zero()
    }

    fn accumulate(&self, acc: &mut A, item: T) {
        self.downstream.accumulate(acc, (self.mapper)(item));
    }

    fn combine(&self, acc: &mut A, other: A) {
        self.downstream.combine(acc, other);
    }

    fn finish(&self, acc: A) -> R {
        self.downstream.finish(acc)
    }

    fn merge_law(&self) -> MergeLaw {
        self.downstream.merge_law()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::{counting, to_set};
    use std::collections::HashSet;

    #[test]
    fn partial_maps_merge_per_key() {
        let g = grouping_by(|w: &&str| w.len(), counting());
        let mut left = g.zero();
        for w in ["a", "bb", "cc"] {
            g.accumulate(&mut left, w);
        }
        let mut right = g.zero();
        for w in ["dd", "eee"] {
            g.accumulate(&mut right, w);
        }
        g.combine(&mut left, right);
        let out = g.finish(left);
        assert_eq!(out, HashMap::from([(1, 1), (2, 3), (3, 1)]));
    }

    #[test]
    fn mapping_feeds_downstream() {
        let g = grouping_by(
            |p: &(u8, &str)| p.0,
            mapping(|p: (u8, &str)| p.1.to_string(), to_set()),
        );
        let mut acc = g.zero();
        g.accumulate(&mut acc, (1, "x"));
        g.accumulate(&mut acc, (1, "y"));
        g.accumulate(&mut acc, (1, "x"));
        let out = g.finish(acc);
        assert_eq!(out[&1], HashSet::from(["x".to_string(), "y".to_string()]));
    }
}
