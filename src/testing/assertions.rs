//! Assertion functions for testing pipeline outputs.

use crate::collector::Collector;
use crate::pipeline::Pipeline;
use crate::runner::ParallelConfig;
use crate::type_token::Elem;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::{BuildHasher, Hash};

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics if the collections differ in length or content.
///
/// ```
/// use ironstream::testing::assert_collections_equal;
///
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that two collections hold the same elements, ignoring order.
///
/// # Panics
///
/// Panics if lengths differ or an element is missing on either side.
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected: {expected:?}\n  Actual: {actual:?}"
    );
    let actual_set: HashSet<_> = actual.iter().collect();
    let expected_set: HashSet<_> = expected.iter().collect();
    if actual_set != expected_set {
        let missing: Vec<_> = expected_set.difference(&actual_set).collect();
        let extra: Vec<_> = actual_set.difference(&expected_set).collect();
        panic!("Collection content mismatch:\n  Missing elements: {missing:?}\n  Extra elements: {extra:?}");
    }
}

/// Assert that two maps hold the same keys with equal values.
///
/// # Panics
///
/// Panics on the first missing, extra or differing key.
pub fn assert_maps_equal<K, V, S1, S2>(actual: &HashMap<K, V, S1>, expected: &HashMap<K, V, S2>)
where
    K: Debug + Eq + Hash,
    V: Debug + PartialEq,
    S1: BuildHasher,
    S2: BuildHasher,
{
    for (k, e) in expected {
        match actual.get(k) {
            Some(a) => assert_eq!(a, e, "Value mismatch for key {k:?}"),
            None => panic!("Missing key {k:?}; actual map: {actual:?}"),
        }
    }
    let extra: Vec<_> = actual.keys().filter(|k| !expected.contains_key(*k)).collect();
    assert!(extra.is_empty(), "Unexpected keys: {extra:?}");
}

/// Assert that every element satisfies `predicate`.
///
/// # Panics
///
/// Panics with the first failing element and its index.
pub fn assert_all<T: Debug>(collection: &[T], predicate: impl Fn(&T) -> bool) {
    if let Some((i, e)) = collection.iter().enumerate().find(|(_, e)| !predicate(e)) {
        panic!("Element at index {i} failed the predicate: {e:?}");
    }
}

/// Evaluate `pipeline` sequentially and then in parallel at each width in
/// `parallelisms`, asserting every result equals the sequential one.
///
/// `make` builds a fresh collector per evaluation. Returns the sequential result.
///
/// # Panics
///
/// Panics if any evaluation fails or disagrees with the sequential result.
pub fn assert_parallel_matches_sequential<T, C, A, R>(
    pipeline: &Pipeline<T>,
    make: impl Fn() -> C,
    parallelisms: &[usize],
) -> R
where
    T: Elem,
    C: Collector<T, A, R>,
    A: Send,
    R: Debug + PartialEq,
{
    let sequential = match pipeline.collect(make()) {
        Ok(r) => r,
        Err(e) => panic!("sequential evaluation failed: {e}"),
    };
    for &p in parallelisms {
        let config = ParallelConfig::default().with_parallelism(p);
        match pipeline.collect_par_with(make(), config) {
            Ok(parallel) => assert_eq!(
                parallel, sequential,
                "parallel result with {p} chunk(s) differs from sequential"
            ),
            Err(e) => panic!("parallel evaluation with {p} chunk(s) failed: {e}"),
        }
    }
    sequential
}
