//! Error taxonomy for pipeline construction and evaluation.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type is
//! [`StreamError`]. Failures are terminal for the enclosing evaluation: nothing is
//! retried and partial results are discarded.

use std::io;
use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T, E = StreamError> = std::result::Result<T, E>;

/// Boxed cause carried by stage and chunk failures.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Bad generation or slicing bounds.
    #[error("invalid range [{lower}, {upper}): {reason}")]
    InvalidRange {
        lower: i64,
        upper: i64,
        reason: &'static str,
    },

    /// A single-pass source was traversed a second time.
    #[error("source `{name}` is single-pass and has already been consumed")]
    ExhaustedSource { name: String },

    #[error("cannot open {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("read failed in {} at line {line}", path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        cause: io::Error,
    },

    /// A transform or predicate failed while an element was pulled through it.
    #[error("{kind} stage #{stage} failed on element {position}")]
    Stage {
        stage: usize,
        kind: &'static str,
        position: usize,
        #[source]
        cause: BoxedCause,
    },

    /// Rejected before any chunk was dispatched.
    #[error("parallel evaluation unsupported: {0}")]
    UnsupportedForParallel(String),

    #[error("deadline exceeded: {completed} chunk(s) completed, {cancelled} cancelled")]
    Timeout { completed: usize, cancelled: usize },

    #[error("chunk {chunk} failed: {cause}")]
    ParallelEvaluation {
        chunk: usize,
        #[source]
        cause: Box<StreamError>,
    },

    /// A stage or collector panicked inside a parallel chunk.
    #[error("chunk evaluation panicked: {0}")]
    Panicked(String),

    /// Cooperative cancellation observed at an element pull.
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("element type mismatch: expected `{expected}`")]
    TypeMismatch { expected: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StreamError {
    pub(crate) fn stage(
        stage: usize,
        kind: &'static str,
        position: usize,
        cause: impl Into<BoxedCause>,
    ) -> Self {
        StreamError::Stage {
            stage,
            kind,
            position,
            cause: cause.into(),
        }
    }

    pub(crate) fn unsupported<S: Into<String>>(msg: S) -> Self {
        StreamError::UnsupportedForParallel(msg.into())
    }

    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        StreamError::Config(msg.into())
    }

    /// Chunk index of a [`StreamError::ParallelEvaluation`], if this is one.
    pub fn chunk(&self) -> Option<usize> {
        match self {
            StreamError::ParallelEvaluation { chunk, .. } => Some(*chunk),
            _ => None,
        }
    }

    /// Innermost `StreamError` below any chunk wrappers.
    pub fn root(&self) -> &StreamError {
        match self {
            StreamError::ParallelEvaluation { cause, .. } => cause.root(),
            other => other,
        }
    }
}
