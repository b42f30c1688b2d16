use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::collector::{Collector, MergeLaw};

/* ===================== ToList<T> ===================== */

/// Elements in encounter order. Chunk lists are appended left-to-right, so the
/// parallel result matches the sequential one.
#[derive(Clone, Copy, Debug)]
pub struct ToList<T>(PhantomData<fn() -> T>);

pub fn to_list<T>() -> ToList<T> {
    ToList(PhantomData)
}

impl<T> Collector<T, Vec<T>, Vec<T>> for ToList<T> {
    fn zero(&self) -> Vec<T> {
        Vec::new()
    }

    fn accumulate(&self, acc: &mut Vec<T>, item: T) {
        acc.push(item);
    }

    fn combine(&self, acc: &mut Vec<T>, mut other: Vec<T>) {
        if acc.is_empty() {
            *acc = other;
        } else {
            acc.append(&mut other);
        }
    }

    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/* ===================== ToSet<T> ===================== */

#[derive(Clone, Copy, Debug)]
pub struct ToSet<T>(PhantomData<fn() -> T>);

pub fn to_set<T>() -> ToSet<T> {
    ToSet(PhantomData)
}

impl<T> Collector<T, HashSet<T>, HashSet<T>> for ToSet<T>
where
    T: Eq + Hash,
{
    fn zero(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn accumulate(&self, acc: &mut HashSet<T>, item: T) {
        acc.insert(item);
    }

    fn combine(&self, acc: &mut HashSet<T>, other: HashSet<T>) {
        if acc.is_empty() {
            *acc = other;
        } else {
            acc.extend(other);
        }
    }

    fn finish(&self, acc: HashSet<T>) -> HashSet<T> {
        acc
    }

    fn merge_law(&self) -> MergeLaw {
        MergeLaw::Commutative
    }
}
