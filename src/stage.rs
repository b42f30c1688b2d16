//! Deferred transformation stages.
//!
//! A [`Stage`] only describes work. Nothing runs until a terminal operation opens
//! the source and calls [`Stage::attach`] for each declared stage, in order, which
//! wraps the upstream [`ElementIter`] in a pull adapter:
//!
//! - `Map` transforms one element per pull.
//! - `Filter` re-pulls upstream until an element passes or upstream ends.
//! - `FlatMap` buffers the current inner sequence and drains it before re-pulling.
//! - `Custom` hands the whole upstream iterator to a function value (used for
//!   `limit`, `skip` and sorting barriers).
//!
//! A failing transform or predicate yields [`StreamError::Stage`] carrying the stage
//! index, its kind and the position of the offending element in that stage's input.

use crate::error::{Result, StreamError};
use crate::type_token::{Element, ElementIter, Elem, downcast, erase};
use std::cmp::Ordering;
use std::sync::Arc;

pub type MapFn = Arc<dyn Fn(Element) -> anyhow::Result<Element> + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(&Element) -> anyhow::Result<bool> + Send + Sync>;
pub type FlatMapFn =
    Arc<dyn Fn(Element) -> anyhow::Result<Box<dyn Iterator<Item = Element>>> + Send + Sync>;
pub type AdapterFn = Arc<dyn Fn(ElementIter) -> ElementIter + Send + Sync>;

#[derive(Clone)]
pub enum Stage {
    Map(MapFn),
    Filter(FilterFn),
    FlatMap(FlatMapFn),
    Custom { name: &'static str, adapter: AdapterFn },
}

impl Stage {
    pub fn kind(&self) -> &'static str {
        match self {
            Stage::Map(_) => "map",
            Stage::Filter(_) => "filter",
            Stage::FlatMap(_) => "flat_map",
            Stage::Custom { name, .. } => *name,
        }
    }

    /// Whether the stage handles each element on its own. `Custom` stages see the
    /// whole upstream (`limit`, `skip`, sorting), so running them per chunk would
    /// change the result.
    pub fn is_elementwise(&self) -> bool {
        !matches!(self, Stage::Custom { .. })
    }

    /// Wrap `upstream` so that pulls thread through this stage.
    pub(crate) fn attach(&self, index: usize, upstream: ElementIter) -> ElementIter {
        match self {
            Stage::Map(f) => Box::new(MapIter {
                upstream,
                f: Arc::clone(f),
                index,
                position: 0,
            }),
            Stage::Filter(p) => Box::new(FilterIter {
                upstream,
                pred: Arc::clone(p),
                index,
                position: 0,
            }),
            Stage::FlatMap(f) => Box::new(FlatMapIter {
                upstream,
                f: Arc::clone(f),
                current: None,
                index,
                position: 0,
            }),
            Stage::Custom { adapter, .. } => adapter(upstream),
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage({})", self.kind())
    }
}

struct MapIter {
    upstream: ElementIter,
    f: MapFn,
    index: usize,
    position: usize,
}

impl Iterator for MapIter {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.upstream.next()? {
            Ok(e) => e,
            Err(err) => return Some(Err(err)),
        };
        let position = self.position;
        self.position += 1;
        Some((self.f)(item).map_err(|cause| StreamError::stage(self.index, "map", position, cause)))
    }
}

struct FilterIter {
    upstream: ElementIter,
    pred: FilterFn,
    index: usize,
    position: usize,
}

impl Iterator for FilterIter {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = match self.upstream.next()? {
                Ok(e) => e,
                Err(err) => return Some(Err(err)),
            };
            let position = self.position;
            self.position += 1;
            match (self.pred)(&item) {
                Ok(true) => return Some(Ok(item)),
                Ok(false) => continue,
                Err(cause) => {
                    return Some(Err(StreamError::stage(self.index, "filter", position, cause)));
                }
            }
        }
    }
}

struct FlatMapIter {
    upstream: ElementIter,
    f: FlatMapFn,
    current: Option<Box<dyn Iterator<Item = Element>>>,
    index: usize,
    position: usize,
}

impl Iterator for FlatMapIter {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(inner) = self.current.as_mut() {
                match inner.next() {
                    Some(e) => return Some(Ok(e)),
                    None => self.current = None,
                }
            }

            let item = match self.upstream.next()? {
                Ok(e) => e,
                Err(err) => return Some(Err(err)),
            };
            let position = self.position;
            self.position += 1;
            match (self.f)(item) {
                Ok(inner) => self.current = Some(inner),
                Err(cause) => {
                    return Some(Err(StreamError::stage(self.index, "flat_map", position, cause)));
                }
            }
        }
    }
}

/// Pass at most `n` elements, then stop pulling upstream.
pub(crate) fn limit(n: usize) -> Stage {
    Stage::Custom {
        name: "limit",
        adapter: Arc::new(move |upstream: ElementIter| -> ElementIter { Box::new(upstream.take(n)) }),
    }
}

/// Drop the first `n` elements. Errors are never skipped.
pub(crate) fn skip(n: usize) -> Stage {
    Stage::Custom {
        name: "skip",
        adapter: Arc::new(move |upstream: ElementIter| -> ElementIter {
            let mut remaining = n;
            Box::new(upstream.filter(move |r| {
                if r.is_err() || remaining == 0 {
                    return true;
                }
                remaining -= 1;
                false
            }))
        }),
    }
}

/// Barrier that drains upstream on the first pull, sorts, then replays.
pub(crate) fn sorted_by<T, F>(cmp: F) -> Stage
where
    T: Elem,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    let cmp = Arc::new(cmp);
    Stage::Custom {
        name: "sorted",
        adapter: Arc::new(move |upstream: ElementIter| -> ElementIter {
            Box::new(SortedIter::<T, F> {
                state: SortState::Pending(upstream),
                cmp: Arc::clone(&cmp),
            })
        }),
    }
}

enum SortState<T> {
    Pending(ElementIter),
    Draining(std::vec::IntoIter<T>),
    Done,
}

struct SortedIter<T, F> {
    state: SortState<T>,
    cmp: Arc<F>,
}

impl<T, F> Iterator for SortedIter<T, F>
where
    T: Elem,
    F: Fn(&T, &T) -> Ordering,
{
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if let SortState::Pending(_) = self.state {
            let SortState::Pending(upstream) = std::mem::replace(&mut self.state, SortState::Done)
            else {
                return None;
            };
            let items = upstream
                .map(|r| r.and_then(downcast::<T>))
                .collect::<Result<Vec<T>>>();
            match items {
                Ok(mut items) => {
                    items.sort_by(|a, b| (self.cmp)(a, b));
                    self.state = SortState::Draining(items.into_iter());
                }
                Err(err) => return Some(Err(err)),
            }
        }
        match &mut self.state {
            SortState::Draining(it) => it.next().map(|t| Ok(erase(t))),
            _ => None,
        }
    }
}
