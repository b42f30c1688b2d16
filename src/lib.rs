//! # ironstream
//!
//! **Lazy element pipelines** for Rust: declare a chain of `map` / `filter` /
//! `flat_map` stages over a source, then run a terminal operation that pulls
//! elements through the chain one at a time. Results are aggregated by associative
//! [`Collector`]s, which also makes them evaluable in parallel chunks with a
//! deterministic merge.
//!
//! ## Key Features
//!
//! - **Lazy, pull-based evaluation** - building a pipeline never touches the source;
//!   short-circuiting terminals stop pulling as soon as the answer is known, so
//!   infinite sources are fine
//! - **Sources** - in-memory vectors and slices, integer ranges, generated and iterated
//!   sequences, text-file lines, seeded random integers
//! - **Collectors** - counting, list, set, joining, summing, mapping, reducing,
//!   grouping-by, and custom collectors from function values
//! - **Sequential and parallel execution** - the [`Coordinator`] splits a finite
//!   source into chunks, evaluates them on a rayon pool and folds partial results
//!   left-to-right, so results do not depend on scheduling
//! - **Typed errors** - every failure is a [`StreamError`] with enough context (stage,
//!   element position, chunk index) to diagnose
//!
//! ## Quick Start
//!
//! ```
//! use ironstream::*;
//! use ironstream::collectors::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let lines = from_vec(vec![
//!     "hello world".to_string(),
//!     "hello rust".to_string(),
//! ]);
//!
//! let counts = lines
//!     .flat_map(|line: &String| line.split_whitespace().map(String::from).collect::<Vec<_>>())
//!     .collect(grouping_by(|w: &String| w.clone(), counting()))?;
//!
//! assert_eq!(counts["hello"], 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Pipeline
//!
//! A [`Pipeline<T>`] is a source plus an ordered list of deferred stages. Stage methods
//! consume the pipeline and return a new one; terminals borrow it, so a pipeline over a
//! restartable source can be evaluated more than once with identical results. A
//! single-pass source (file lines, random draws) fails a second traversal with
//! [`StreamError::ExhaustedSource`].
//!
//! ### Collectors
//!
//! A [`Collector<T, A, R>`] describes an aggregation as `zero`, `accumulate`,
//! `combine` and `finish`, and declares a [`MergeLaw`]. The [`collectors`] module
//! provides the built-ins.
//!
//! ### Execution Modes
//!
//! - **Sequential** - [`collect`](Pipeline::collect), [`reduce`](Pipeline::reduce) and
//!   the other terminals run on the calling thread
//! - **Parallel** - [`collect_par`](Pipeline::collect_par),
//!   [`reduce_par`](Pipeline::reduce_par) or a [`Coordinator`] configured by
//!   [`ParallelConfig`] (worker count, optional deadline)
//!
//! For any collector with an associative `combine`, both modes produce the same result.
//!
//! ```
//! use ironstream::*;
//! use ironstream::collectors::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let evens = range(0..10_000).filter(|n: &i64| n % 2 == 0);
//! let config = ParallelConfig::default().with_parallelism(4);
//! assert_eq!(evens.collect_par_with(counting(), config)?, evens.count()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: coordinator state transitions and partitioning
//! at `debug`, failed runs at `warn`, per-evaluation detail at `trace`. Install any
//! subscriber to see them.

pub mod collector;
pub mod collectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod partition;
pub mod pipeline;
pub mod random;
pub mod report;
pub mod runner;
pub mod source;
pub mod stage;
mod terminal;
pub mod testing;
pub mod type_token;
pub mod words;

// General re-exports
pub use collector::{Collector, MergeLaw};
pub use error::{Result, StreamError};
pub use io::{read_lines, read_lines_source};
pub use metrics::RunMetrics;
pub use partition::ChunkPartition;
pub use pipeline::{
    Elements, Pipeline, from_map, from_slice_range, from_source, from_vec, generate, iterate,
    range,
};
pub use random::{RandomGenerator, random_ints};
pub use runner::{Coordinator, CoordinatorState, ExecMode, ParallelConfig};
pub use source::Source;
pub use stage::Stage;
