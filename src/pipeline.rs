use crate::error::Result;
use crate::source::{Source, SourceOps};
use crate::stage::{self, Stage};
use crate::type_token::{Element, ElementIter, Elem, SourceElem, downcast, downcast_ref, erase};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::Arc;

/// -------- Pipeline --------
/// A source plus an ordered list of deferred stages. Building a pipeline never
/// touches the source; only terminal operations pull elements.
pub struct Pipeline<T> {
    pub(crate) source: Arc<dyn SourceOps>,
    pub(crate) stages: Vec<Stage>,
    _t: PhantomData<fn() -> T>,
}

/// Allow `Pipeline` cloning without requiring `T: Clone`.
impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Pipeline {
            source: Arc::clone(&self.source),
            stages: self.stages.clone(),
            _t: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source.describe())
            .field("stages", &self.stages)
            .finish()
    }
}

pub fn from_source<T: SourceElem>(source: Source<T>) -> Pipeline<T> {
    Pipeline {
        source: Arc::new(source),
        stages: Vec::new(),
        _t: PhantomData,
    }
}

pub fn from_vec<T: SourceElem>(data: Vec<T>) -> Pipeline<T> {
    from_source(Source::from_vec(data))
}

/// Pipeline over `data[span]`; see [`Source::slice`].
pub fn from_slice_range<T: SourceElem>(data: Vec<T>, span: Range<usize>) -> Result<Pipeline<T>> {
    Ok(from_source(Source::slice(data, span)?))
}

/// Pipeline over the entries of a map.
pub fn from_map<K, V>(map: HashMap<K, V>) -> Pipeline<(K, V)>
where
    K: SourceElem,
    V: SourceElem,
{
    from_vec(map.into_iter().collect())
}

pub fn range(range: Range<i64>) -> Pipeline<i64> {
    from_source(Source::range(range))
}

pub fn generate<T, F, I>(factory: F) -> Pipeline<T>
where
    T: SourceElem,
    F: Fn() -> I + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
{
    from_source(Source::generate(factory))
}

pub fn iterate<T, F>(seed: T, step: F) -> Pipeline<T>
where
    T: SourceElem,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    from_source(Source::iterate(seed, step))
}

/// ---- Stage composition ----
impl<T: Elem> Pipeline<T> {
    fn push<O>(self, stage: Stage) -> Pipeline<O> {
        let mut stages = self.stages;
        stages.push(stage);
        Pipeline {
            source: self.source,
            stages,
            _t: PhantomData,
        }
    }

    pub fn map<O, F>(self, f: F) -> Pipeline<O>
    where
        O: Elem,
        F: 'static + Send + Sync + Fn(&T) -> O,
    {
        self.push(Stage::Map(Arc::new(
            move |e: Element| -> anyhow::Result<Element> { Ok(erase(f(downcast_ref::<T>(&e)?))) },
        )))
    }

    pub fn filter<P>(self, pred: P) -> Pipeline<T>
    where
        P: 'static + Send + Sync + Fn(&T) -> bool,
    {
        self.push(Stage::Filter(Arc::new(
            move |e: &Element| -> anyhow::Result<bool> { Ok(pred(downcast_ref::<T>(e)?)) },
        )))
    }

    pub fn flat_map<O, I, F>(self, f: F) -> Pipeline<O>
    where
        O: Elem,
        I: IntoIterator<Item = O>,
        I::IntoIter: 'static,
        F: 'static + Send + Sync + Fn(&T) -> I,
    {
        self.push(Stage::FlatMap(Arc::new(
            move |e: Element| -> anyhow::Result<Box<dyn Iterator<Item = Element>>> {
                let inner = f(downcast_ref::<T>(&e)?).into_iter();
                Ok(Box::new(inner.map(erase)))
            },
        )))
    }

    /// Like [`map`](Self::map), but the transform may fail; the first failure aborts
    /// the evaluation with [`StreamError::Stage`](crate::StreamError::Stage).
    pub fn try_map<O, F>(self, f: F) -> Pipeline<O>
    where
        O: Elem,
        F: 'static + Send + Sync + Fn(&T) -> anyhow::Result<O>,
    {
        self.push(Stage::Map(Arc::new(
            move |e: Element| -> anyhow::Result<Element> { Ok(erase(f(downcast_ref::<T>(&e)?)?)) },
        )))
    }

    pub fn try_filter<P>(self, pred: P) -> Pipeline<T>
    where
        P: 'static + Send + Sync + Fn(&T) -> anyhow::Result<bool>,
    {
        self.push(Stage::Filter(Arc::new(
            move |e: &Element| -> anyhow::Result<bool> { pred(downcast_ref::<T>(e)?) },
        )))
    }

    /// Pass at most `n` elements. Makes infinite sources finite.
    pub fn limit(self, n: usize) -> Pipeline<T> {
        self.push(stage::limit(n))
    }

    pub fn skip(self, n: usize) -> Pipeline<T> {
        self.push(stage::skip(n))
    }

    /// Sort with a comparator. This is a barrier: the whole upstream is drained on the
    /// first pull, so it must not follow an unbounded source without a `limit`.
    pub fn sorted_by<F>(self, cmp: F) -> Pipeline<T>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.push(stage::sorted_by::<T, F>(cmp))
    }

    pub fn sorted(self) -> Pipeline<T>
    where
        T: Ord,
    {
        self.sorted_by(T::cmp)
    }

    /// Kinds of the declared stages, in order.
    pub fn stage_kinds(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::kind).collect()
    }

    /// Thread `upstream` through every declared stage.
    pub(crate) fn attach_stages(&self, upstream: ElementIter) -> ElementIter {
        self.stages
            .iter()
            .enumerate()
            .fold(upstream, |up, (index, stage)| stage.attach(index, up))
    }

    /// Open the source and return a typed pull iterator over the pipeline's output.
    ///
    /// Nothing is evaluated until the iterator is advanced.
    pub fn iter(&self) -> Result<Elements<T>> {
        tracing::trace!(source = %self.source.describe(), stages = self.stages.len(), "opening pipeline");
        let upstream = self.source.open()?;
        Ok(Elements::new(self.attach_stages(upstream)))
    }
}

/// Typed pull iterator over a pipeline's output.
pub struct Elements<T> {
    inner: ElementIter,
    _t: PhantomData<fn() -> T>,
}

impl<T: Elem> Elements<T> {
    pub(crate) fn new(inner: ElementIter) -> Self {
        Self {
            inner,
            _t: PhantomData,
        }
    }
}

impl<T: Elem> Iterator for Elements<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.and_then(downcast::<T>))
    }
}
