use crate::collector::{Collector, MergeLaw};
use crate::collectors::{Counting, reducing};
use crate::error::{Result, StreamError};
use crate::metrics::RunMetrics;
use crate::pipeline::{Elements, Pipeline};
use crate::source::SourceOps;
use crate::type_token::{Elem, ElementIter};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// How a terminal collection is evaluated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    #[default]
    Sequential,
    Parallel(ParallelConfig),
}

/// Knobs for parallel evaluation.
///
/// Deserializes from JSON such as `{"parallelism": 4, "deadline_ms": 250}`; both
/// fields are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Worker count and target chunk count. `None` means one per logical CPU.
    pub parallelism: Option<usize>,
    /// Overall time budget for one run.
    #[serde(rename = "deadline_ms", with = "duration_ms")]
    pub deadline: Option<Duration>,
}

impl ParallelConfig {
    pub fn with_parallelism(mut self, n: usize) -> Self {
        self.parallelism = Some(n);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn resolved_parallelism(&self) -> Result<usize> {
        match self.parallelism {
            Some(0) => Err(StreamError::config("parallelism must be at least 1")),
            Some(n) => Ok(n),
            None => Ok(num_cpus::get().max(1)),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| StreamError::config(format!("parallel config: {e}")))
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        d.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// Lifecycle of a [`Coordinator`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinatorState {
    Idle,
    Partitioning,
    Dispatched,
    Merging,
    Done,
    Failed,
}

/// Shared cancellation flag, checked by every chunk before each element pull.
#[derive(Clone, Debug)]
struct CancelToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug)]
struct TokenInner {
    cancelled: AtomicBool,
    timed_out: AtomicBool,
    pulled: AtomicU64,
    deadline: Option<Instant>,
}

impl CancelToken {
    fn new(budget: Option<Duration>) -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                timed_out: AtomicBool::new(false),
                pulled: AtomicU64::new(0),
                deadline: budget.map(|b| Instant::now() + b),
            }),
        }
    }

    fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// True once cancelled or past the deadline. Passing the deadline cancels.
    fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        match self.inner.deadline {
            Some(at) if Instant::now() >= at => {
                self.inner.timed_out.store(true, Ordering::SeqCst);
                self.cancel();
                true
            }
            _ => false,
        }
    }

    fn timed_out(&self) -> bool {
        self.inner.timed_out.load(Ordering::SeqCst)
    }

    fn pulled(&self) -> u64 {
        self.inner.pulled.load(Ordering::SeqCst)
    }
}

/// Source-side guard: fails the pull with `Cancelled` once the token trips.
struct CancelIter {
    inner: ElementIter,
    token: CancelToken,
    stopped: bool,
}

impl Iterator for CancelIter {
    type Item = Result<crate::type_token::Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped {
            return None;
        }
        if self.token.is_cancelled() {
            self.stopped = true;
            return Some(Err(StreamError::Cancelled));
        }
        let next = self.inner.next();
        if next.is_some() {
            self.token.inner.pulled.fetch_add(1, Ordering::Relaxed);
        }
        next
    }
}

enum ChunkOutcome<A> {
    Done(A),
    Cancelled,
    Failed(StreamError),
}

fn run_chunk<T, C, A, R>(
    index: usize,
    pipeline: &Pipeline<T>,
    chunk: &Arc<dyn SourceOps>,
    collector: &C,
    token: &CancelToken,
) -> ChunkOutcome<A>
where
    T: Elem,
    C: Collector<T, A, R>,
{
    if token.is_cancelled() {
        return ChunkOutcome::Cancelled;
    }
    tracing::trace!(chunk = index, source = %chunk.describe(), "chunk started");
    let upstream = match chunk.open() {
        Ok(it) => it,
        Err(e) => {
            token.cancel();
            return ChunkOutcome::Failed(e);
        }
    };
    let guarded: ElementIter = Box::new(CancelIter {
        inner: upstream,
        token: token.clone(),
        stopped: false,
    });
    let mut acc = collector.zero();
    for item in Elements::<T>::new(pipeline.attach_stages(guarded)) {
        match item {
            Ok(v) => collector.accumulate(&mut acc, v),
            Err(StreamError::Cancelled) => {
                tracing::trace!(chunk = index, "chunk cancelled");
                return ChunkOutcome::Cancelled;
            }
            Err(e) => {
                tracing::debug!(chunk = index, error = %e, "chunk failed; cancelling siblings");
                token.cancel();
                return ChunkOutcome::Failed(e);
            }
        }
    }
    ChunkOutcome::Done(acc)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs one collection over a pipeline in parallel chunks.
///
/// The source is split into contiguous chunks; each chunk is pulled through the
/// full stage chain on a worker into its own accumulator. Partial results are then
/// combined strictly left-to-right by chunk index, so any collector with an
/// associative `combine` yields the same result as sequential evaluation.
///
/// Failure handling:
/// - the first failing chunk cancels the others; the error of the lowest-index
///   failed chunk is reported as [`StreamError::ParallelEvaluation`].
/// - passing the deadline cancels every chunk and reports [`StreamError::Timeout`].
/// - a panic inside a chunk is caught and reported like a chunk failure, carrying
///   [`StreamError::Panicked`].
/// - a `SequentialOnly` collector, a whole-stream stage (`limit`, `skip`, sorting)
///   or an unbounded source is rejected with [`StreamError::UnsupportedForParallel`]
///   before any chunk is dispatched.
#[derive(Debug)]
pub struct Coordinator {
    config: ParallelConfig,
    state: CoordinatorState,
    metrics: RunMetrics,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(ParallelConfig::default())
    }
}

impl Coordinator {
    pub fn new(config: ParallelConfig) -> Self {
        Self {
            config,
            state: CoordinatorState::Idle,
            metrics: RunMetrics::default(),
        }
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Metrics of the most recent run.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    fn transition(&mut self, next: CoordinatorState) {
        tracing::debug!(from = ?self.state, to = ?next, "coordinator transition");
        self.state = next;
    }

    /// Evaluate `pipeline` into `collector`. The coordinator may be reused; each
    /// call starts again from [`CoordinatorState::Idle`].
    pub fn collect<T, C, A, R>(&mut self, pipeline: &Pipeline<T>, collector: C) -> Result<R>
    where
        T: Elem,
        C: Collector<T, A, R>,
        A: Send,
    {
        self.state = CoordinatorState::Idle;
        self.metrics = RunMetrics::default();
        let started = Instant::now();
        let result = self.run(pipeline, &collector);
        self.metrics.elapsed_micros = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => self.transition(CoordinatorState::Done),
            Err(e) => {
                tracing::warn!(error = %e, "parallel evaluation failed");
                self.transition(CoordinatorState::Failed);
            }
        }
        result
    }

    fn run<T, C, A, R>(&mut self, pipeline: &Pipeline<T>, collector: &C) -> Result<R>
    where
        T: Elem,
        C: Collector<T, A, R>,
        A: Send,
    {
        if !collector.merge_law().allows_parallel() {
            return Err(StreamError::unsupported(
                "collector declares a sequential-only merge",
            ));
        }
        if let Some(stage) = pipeline.stages.iter().find(|s| !s.is_elementwise()) {
            return Err(StreamError::unsupported(format!(
                "`{}` stage depends on the whole stream and cannot run per chunk",
                stage.kind()
            )));
        }
        let parallelism = self.config.resolved_parallelism()?;

        self.transition(CoordinatorState::Partitioning);
        let chunks = pipeline.source.partition(parallelism)?;
        self.metrics.chunks = chunks.len();
        self.metrics.chunk_sizes = chunks.iter().map(|c| c.len().unwrap_or(0)).collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(chunks.len().max(1))
            .build()
            .map_err(|e| StreamError::config(format!("cannot build worker pool: {e}")))?;
        let token = CancelToken::new(self.config.deadline);

        self.transition(CoordinatorState::Dispatched);
        let outcomes: Vec<ChunkOutcome<A>> = pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(i, chunk)| {
                    panic::catch_unwind(AssertUnwindSafe(|| {
                        run_chunk(i, pipeline, chunk, collector, &token)
                    }))
                    .unwrap_or_else(|payload| {
                        token.cancel();
                        ChunkOutcome::Failed(StreamError::Panicked(panic_message(payload.as_ref())))
                    })
                })
                .collect()
        });
        self.metrics.elements_pulled = token.pulled();

        let mut partials = Vec::with_capacity(outcomes.len());
        let mut failure: Option<(usize, StreamError)> = None;
        let mut cancelled = 0;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                ChunkOutcome::Done(acc) => partials.push(acc),
                ChunkOutcome::Cancelled => cancelled += 1,
                ChunkOutcome::Failed(e) => {
                    if failure.is_none() {
                        failure = Some((i, e));
                    }
                }
            }
        }
        let completed = partials.len();
        self.metrics.completed_chunks = completed;
        self.metrics.cancelled_chunks = cancelled;

        if let Some((chunk, cause)) = failure {
            self.metrics.failed_chunk = Some(chunk);
            return Err(StreamError::ParallelEvaluation {
                chunk,
                cause: Box::new(cause),
            });
        }
        if token.timed_out() {
            return Err(StreamError::Timeout {
                completed,
                cancelled,
            });
        }
        if cancelled > 0 {
            return Err(StreamError::Cancelled);
        }

        self.transition(CoordinatorState::Merging);
        let mut partials = partials.into_iter();
        let mut acc = partials.next().unwrap_or_else(|| collector.zero());
        for next in partials {
            collector.combine(&mut acc, next);
        }
        Ok(collector.finish(acc))
    }
}

impl<T: Elem> Pipeline<T> {
    /// Parallel [`collect`](Pipeline::collect) with the default [`ParallelConfig`].
    pub fn collect_par<C, A, R>(&self, collector: C) -> Result<R>
    where
        C: Collector<T, A, R>,
        A: Send,
    {
        self.collect_par_with(collector, ParallelConfig::default())
    }

    pub fn collect_par_with<C, A, R>(&self, collector: C, config: ParallelConfig) -> Result<R>
    where
        C: Collector<T, A, R>,
        A: Send,
    {
        Coordinator::new(config).collect(self, collector)
    }

    pub fn collect_with<C, A, R>(&self, collector: C, mode: &ExecMode) -> Result<R>
    where
        C: Collector<T, A, R>,
        A: Send,
    {
        match mode {
            ExecMode::Sequential => self.collect(collector),
            ExecMode::Parallel(config) => self.collect_par_with(collector, config.clone()),
        }
    }

    /// Parallel reduction. Chunks reduce independently and the partial results are
    /// reduced again, so `op` must be declared [`MergeLaw::Commutative`].
    pub fn reduce_par<F>(&self, op: F, law: MergeLaw) -> Result<Option<T>>
    where
        F: Fn(T, T) -> T + Send + Sync,
    {
        if law != MergeLaw::Commutative {
            return Err(StreamError::unsupported(format!(
                "parallel reduce needs a commutative operator, got {law:?}"
            )));
        }
        self.collect_par(reducing(op, law))
    }

    pub fn count_par(&self) -> Result<u64> {
        self.collect_par(Counting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_partial_json() {
        let cfg = ParallelConfig::from_json(r#"{"deadline_ms": 1500}"#).unwrap();
        assert_eq!(cfg.parallelism, None);
        assert_eq!(cfg.deadline, Some(Duration::from_millis(1500)));
        assert!(ParallelConfig::from_json("{\"parallelism\": \"x\"}").is_err());
    }

    #[test]
    fn zero_parallelism_is_a_config_error() {
        let cfg = ParallelConfig::default().with_parallelism(0);
        assert!(matches!(cfg.resolved_parallelism(), Err(StreamError::Config(_))));
    }

    #[test]
    fn tripped_token_stops_the_guard() {
        let token = CancelToken::new(None);
        let mut it = CancelIter {
            inner: Box::new((0..3).map(|i| Ok(Box::new(i) as crate::type_token::Element))),
            token: token.clone(),
            stopped: false,
        };
        assert!(it.next().is_some_and(|r| r.is_ok()));
        token.cancel();
        assert!(matches!(it.next(), Some(Err(StreamError::Cancelled))));
        assert!(it.next().is_none());
        assert_eq!(token.pulled(), 1);
    }
}
