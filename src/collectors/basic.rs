use std::marker::PhantomData;
use std::ops::Add;

use crate::collector::{Collector, MergeLaw};

/* ===================== Counting ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct Counting;

pub fn counting() -> Counting {
    Counting
}

impl<T> Collector<T, u64, u64> for Counting {
    fn zero(&self) -> u64 {
        0
    }

    fn accumulate(&self, acc: &mut u64, _item: T) {
        *acc += 1;
    }

    fn combine(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }

    fn merge_law(&self) -> MergeLaw {
        MergeLaw::Commutative
    }
}

/* ===================== Summing<T> ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct Summing<T>(PhantomData<fn() -> T>);

impl<T> Summing<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

pub fn summing<T>() -> Summing<T> {
    Summing::new()
}

impl<T> Collector<T, T, T> for Summing<T>
where
    T: Add<Output = T> + Default,
{
    fn zero(&self) -> T {
        T::default()
    }

    fn accumulate(&self, acc: &mut T, item: T) {
        *acc = std::mem::take(acc) + item;
    }

    fn combine(&self, acc: &mut T, other: T) {
        *acc = std::mem::take(acc) + other;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }

    fn merge_law(&self) -> MergeLaw {
        MergeLaw::Commutative
    }
}
