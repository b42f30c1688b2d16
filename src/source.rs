//! Element sources.
//!
//! A [`Source<T>`] is the head of every pipeline. Sources come in four shapes:
//!
//! - **Memory**: a shared `Vec<T>` plus the index span to read. Restartable and
//!   partitionable.
//! - **Indexed**: a finite span of indices mapped through a function (used by
//!   [`Source::range`]). Restartable and partitionable without materialising.
//! - **Generated**: a factory producing a fresh, possibly infinite iterator per
//!   traversal. Restartable, never partitionable.
//! - **SinglePass**: a one-shot iterator (file lines, random draws). The second
//!   traversal fails with [`StreamError::ExhaustedSource`]. Bounded single-pass
//!   sources are drained once when partitioned for parallel evaluation.
//!
//! Pipelines and the parallel runner never see `T` directly; they drive sources
//! through the crate-private `SourceOps` trait object.

use crate::error::{Result, StreamError};
use crate::partition::ChunkPartition;
use crate::type_token::{Element, ElementIter, SourceElem, erase};
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};

type Factory<T> = Arc<dyn Fn() -> Box<dyn Iterator<Item = T>> + Send + Sync>;
type IndexFn<T> = Arc<dyn Fn(usize) -> T + Send + Sync>;
type OneShot<T> = Box<dyn Iterator<Item = Result<T>> + Send>;

pub enum Source<T> {
    Memory { data: Arc<Vec<T>>, span: Range<usize> },
    Indexed { span: Range<usize>, at: IndexFn<T> },
    Generated(Factory<T>),
    SinglePass(SinglePass<T>),
}

/// A one-shot iterator guarded so that only the first traversal gets it.
pub struct SinglePass<T> {
    name: String,
    bounded: bool,
    iter: Mutex<Option<OneShot<T>>>,
}

impl<T> SinglePass<T> {
    fn take(&self) -> Result<OneShot<T>> {
        let taken = self
            .iter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        taken.ok_or_else(|| {
            tracing::debug!(source = %self.name, "re-traversal of single-pass source");
            StreamError::ExhaustedSource {
                name: self.name.clone(),
            }
        })
    }

    /// Whether the source is known to end.
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: SourceElem> Source<T> {
    /// Restartable source over an owned vector.
    pub fn from_vec(data: Vec<T>) -> Self {
        let span = 0..data.len();
        Source::Memory {
            data: Arc::new(data),
            span,
        }
    }

    /// Restartable source over `data[span]`.
    ///
    /// Fails with [`StreamError::InvalidRange`] when the span is inverted or runs past
    /// the end of `data`.
    pub fn slice(data: Vec<T>, span: Range<usize>) -> Result<Self> {
        let (lower, upper) = (span.start as i64, span.end as i64);
        if span.start > span.end {
            return Err(StreamError::InvalidRange {
                lower,
                upper,
                reason: "start is after end",
            });
        }
        if span.end > data.len() {
            return Err(StreamError::InvalidRange {
                lower,
                upper,
                reason: "end is beyond the collection length",
            });
        }
        Ok(Source::Memory {
            data: Arc::new(data),
            span,
        })
    }

    /// Restartable source backed by a factory; each traversal calls `factory` afresh.
    /// The produced iterator may be infinite.
    pub fn generate<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Source::Generated(Arc::new(move || -> Box<dyn Iterator<Item = T>> {
            Box::new(factory().into_iter())
        }))
    }

    /// Infinite restartable source `seed, step(seed), step(step(seed)), ...`.
    pub fn iterate<F>(seed: T, step: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        let step = Arc::new(step);
        Source::generate(move || {
            let step = Arc::clone(&step);
            std::iter::successors(Some(seed.clone()), move |prev| Some(step(prev)))
        })
    }

    /// Single-pass source over an infallible iterator.
    ///
    /// `bounded` declares whether the iterator ends; only bounded single-pass sources
    /// can be evaluated in parallel.
    pub fn single_pass<I>(name: impl Into<String>, iter: I, bounded: bool) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Source::single_pass_fallible(name, iter.into_iter().map(Ok), bounded)
    }

    /// Single-pass source over an iterator whose items may fail (I/O, for example).
    pub fn single_pass_fallible<I>(name: impl Into<String>, iter: I, bounded: bool) -> Self
    where
        I: Iterator<Item = Result<T>> + Send + 'static,
    {
        Source::SinglePass(SinglePass {
            name: name.into(),
            bounded,
            iter: Mutex::new(Some(Box::new(iter))),
        })
    }

    /// Number of elements, when known without traversal.
    pub fn len(&self) -> Option<usize> {
        match self {
            Source::Memory { span, .. } | Source::Indexed { span, .. } => Some(span.len()),
            Source::Generated(_) | Source::SinglePass(_) => None,
        }
    }

    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// Whether every traversal starts fresh.
    pub fn is_restartable(&self) -> bool {
        !matches!(self, Source::SinglePass(_))
    }
}

impl Source<i64> {
    /// `start, start + 1, ..., end - 1`; empty when `start >= end`.
    pub fn range(range: Range<i64>) -> Self {
        let start = range.start;
        let len = range.end.saturating_sub(range.start).max(0) as usize;
        Source::Indexed {
            span: 0..len,
            at: Arc::new(move |i| start + i as i64),
        }
    }
}

/// Type-erased view of a source used by pipelines and the parallel runner.
pub(crate) trait SourceOps: Send + Sync {
    /// Start a traversal.
    fn open(&self) -> Result<ElementIter>;

    fn len(&self) -> Option<usize>;

    fn describe(&self) -> String;

    /// Split into contiguous chunk sources. Unbounded sources are rejected.
    fn partition(&self, parts: usize) -> Result<Vec<Arc<dyn SourceOps>>>;
}

impl<T: SourceElem> SourceOps for Source<T> {
    fn open(&self) -> Result<ElementIter> {
        let iter: ElementIter = match self {
            Source::Memory { data, span } => {
                let data = Arc::clone(data);
                Box::new(
                    span.clone()
                        .map(move |i| -> Result<Element> { Ok(erase(data[i].clone())) }),
                )
            }
            Source::Indexed { span, at } => {
                let at = Arc::clone(at);
                Box::new(span.clone().map(move |i| -> Result<Element> { Ok(erase(at(i))) }))
            }
            Source::Generated(factory) => {
                Box::new(factory().map(|t| -> Result<Element> { Ok(erase(t)) }))
            }
            Source::SinglePass(sp) => Box::new(sp.take()?.map(|r| r.map(erase))),
        };
        Ok(iter)
    }

    fn len(&self) -> Option<usize> {
        Source::len(self)
    }

    fn describe(&self) -> String {
        match self {
            Source::Memory { span, .. } => format!("memory[{}..{}]", span.start, span.end),
            Source::Indexed { span, .. } => format!("indexed[{}..{}]", span.start, span.end),
            Source::Generated(_) => "generated".to_string(),
            Source::SinglePass(sp) => format!("single-pass `{}`", sp.name),
        }
    }

    fn partition(&self, parts: usize) -> Result<Vec<Arc<dyn SourceOps>>> {
        match self {
            Source::Memory { data, span } => Ok(ChunkPartition::split(span.clone(), parts)
                .into_iter()
                .map(|r| {
                    Arc::new(Source::Memory {
                        data: Arc::clone(data),
                        span: r,
                    }) as Arc<dyn SourceOps>
                })
                .collect()),
            Source::Indexed { span, at } => Ok(ChunkPartition::split(span.clone(), parts)
                .into_iter()
                .map(|r| {
                    Arc::new(Source::Indexed {
                        span: r,
                        at: Arc::clone(at),
                    }) as Arc<dyn SourceOps>
                })
                .collect()),
            Source::Generated(_) => Err(StreamError::unsupported(
                "generated sources are unbounded and cannot be partitioned",
            )),
            Source::SinglePass(sp) if !sp.bounded => Err(StreamError::unsupported(format!(
                "single-pass source `{}` is unbounded",
                sp.name
            ))),
            Source::SinglePass(sp) => {
                let items = sp.take()?.collect::<Result<Vec<T>>>()?;
                tracing::debug!(source = %sp.name, elements = items.len(), "drained single-pass source for partitioning");
                Source::from_vec(items).partition(parts)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_token::downcast;

    fn drain<T: SourceElem>(src: &dyn SourceOps) -> Vec<T> {
        src.open()
            .unwrap()
            .map(|r| downcast::<T>(r.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn memory_source_is_restartable() {
        let s = Source::from_vec(vec![1, 2, 3]);
        assert_eq!(drain::<i32>(&s), vec![1, 2, 3]);
        assert_eq!(drain::<i32>(&s), vec![1, 2, 3]);
    }

    #[test]
    fn slice_validates_bounds() {
        assert!(Source::slice(vec![1, 2, 3], 1..3).is_ok());
        assert!(matches!(
            Source::slice(vec![1, 2, 3], 2..5),
            Err(StreamError::InvalidRange { .. })
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let inverted = Source::slice(vec![1, 2, 3], 2..1);
        assert!(matches!(inverted, Err(StreamError::InvalidRange { .. })));
    }

    #[test]
    fn single_pass_fails_on_second_open() {
        let s = Source::single_pass("once", vec![1u8, 2], true);
        assert_eq!(drain::<u8>(&s), vec![1, 2]);
        assert!(matches!(s.open(), Err(StreamError::ExhaustedSource { .. })));
    }

    #[test]
    fn range_partitions_into_contiguous_chunks() {
        let s = Source::range(10..20);
        let chunks = s.partition(3).unwrap();
        let parts: Vec<Vec<i64>> = chunks.iter().map(|c| drain::<i64>(c.as_ref())).collect();
        assert_eq!(parts, vec![(10..14).collect::<Vec<_>>(), (14..17).collect(), (17..20).collect()]);
    }

    #[test]
    fn generated_source_cannot_partition() {
        let s = Source::generate(|| 0u32..);
        assert!(matches!(
            s.partition(2),
            Err(StreamError::UnsupportedForParallel(_))
        ));
    }
}
