//! Sequential terminal operations.
//!
//! Each terminal opens the source, pulls elements through the stage chain on the
//! calling thread, and stops at the first error. Short-circuiting terminals
//! (`any_match`, `all_match`, `none_match`, `find_first`) stop pulling as soon as the
//! answer is known, which makes them safe on infinite sources.
//!
//! Terminals borrow the pipeline, so a pipeline over a restartable source can be
//! evaluated again and yields the same elements; a single-pass source fails the
//! second time with [`StreamError::ExhaustedSource`](crate::StreamError::ExhaustedSource).

use crate::collector::Collector;
use crate::collectors::{Counting, to_list};
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::type_token::Elem;
use std::cmp::Ordering;

impl<T: Elem> Pipeline<T> {
    /// Drive the pipeline through `collector`: accumulate from `zero`, then `finish`.
    pub fn collect<C, A, R>(&self, collector: C) -> Result<R>
    where
        C: Collector<T, A, R>,
    {
        let mut acc = collector.zero();
        for item in self.iter()? {
            collector.accumulate(&mut acc, item?);
        }
        Ok(collector.finish(acc))
    }

    /// Left fold without an identity: `None` on empty input, the element itself for a
    /// singleton, `((e1 op e2) op e3) ...` otherwise.
    pub fn reduce<F>(&self, op: F) -> Result<Option<T>>
    where
        F: Fn(T, T) -> T,
    {
        let mut acc: Option<T> = None;
        for item in self.iter()? {
            let item = item?;
            acc = Some(match acc.take() {
                Some(prev) => op(prev, item),
                None => item,
            });
        }
        Ok(acc)
    }

    /// Left fold from `identity`.
    pub fn fold<A, F>(&self, identity: A, op: F) -> Result<A>
    where
        F: Fn(A, T) -> A,
    {
        let mut acc = identity;
        for item in self.iter()? {
            acc = op(acc, item?);
        }
        Ok(acc)
    }

    pub fn count(&self) -> Result<u64> {
        self.collect(Counting)
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.collect(to_list())
    }

    pub fn any_match<P>(&self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool,
    {
        for item in self.iter()? {
            if pred(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn all_match<P>(&self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool,
    {
        for item in self.iter()? {
            if !pred(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn none_match<P>(&self, pred: P) -> Result<bool>
    where
        P: Fn(&T) -> bool,
    {
        Ok(!self.any_match(pred)?)
    }

    pub fn find_first(&self) -> Result<Option<T>> {
        self.iter()?.next().transpose()
    }

    /// Greatest element by `cmp`; the last of equal maxima wins.
    pub fn max_by<F>(&self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.reduce(|a, b| if cmp(&a, &b) == Ordering::Greater { a } else { b })
    }

    /// Least element by `cmp`; the first of equal minima wins.
    pub fn min_by<F>(&self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.reduce(|a, b| if cmp(&b, &a) == Ordering::Less { b } else { a })
    }

    /// Hand every element to `f`. Side effects belong here, never in stages.
    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        for item in self.iter()? {
            f(item?);
        }
        Ok(())
    }
}
