//! Execution statistics for parallel runs.
//!
//! A [`Coordinator`](crate::Coordinator) fills in a [`RunMetrics`] as it moves
//! through its states. The record can be printed, serialized to JSON or saved to
//! a file once the run is over, whether it succeeded or not.
//!
//! ```no_run
//! use ironstream::*;
//! use ironstream::collectors::counting;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut coordinator = Coordinator::new(ParallelConfig::default().with_parallelism(4));
//! let n = coordinator.collect(&range(0..1_000), counting())?;
//! assert_eq!(n, 1_000);
//! coordinator.metrics().print();
//! coordinator.metrics().save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Counters recorded by one parallel run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Number of chunks the source was split into.
    pub chunks: usize,
    /// Element count of each chunk, by chunk index.
    pub chunk_sizes: Vec<usize>,
    /// Source elements pulled across all chunks.
    pub elements_pulled: u64,
    pub completed_chunks: usize,
    pub cancelled_chunks: usize,
    /// Lowest index of a chunk that failed, if any.
    pub failed_chunk: Option<usize>,
    pub elapsed_micros: u64,
}

impl RunMetrics {
    pub fn elapsed(&self) -> Duration {
        Duration::from_micros(self.elapsed_micros)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("\n========== Run Metrics ==========");
        println!("chunks: {} {:?}", self.chunks, self.chunk_sizes);
        println!("elements pulled: {}", self.elements_pulled);
        println!(
            "completed: {}, cancelled: {}",
            self.completed_chunks, self.cancelled_chunks
        );
        if let Some(chunk) = self.failed_chunk {
            println!("failed chunk: {chunk}");
        }
        println!("elapsed: {:?}", self.elapsed());
        println!("=================================\n");
    }

    /// Write the metrics as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        let formatted = serde_json::to_string_pretty(self)?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }
}
