//! Word frequency over the lines of a text file.
//!
//! Run with: cargo run --example word_frequency -- [PATH] [MIN_LEN] [TOP]
//!
//! Without a path, a short built-in text is used.

use anyhow::Result;
use ironstream::report::{ConsoleSink, report_entries};
use ironstream::words::{most_frequent, word_frequencies};
use ironstream::*;
use std::io::Write;
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "\
It was the best of times, it was the worst of times,
it was the age of wisdom, it was the age of foolishness,
it was the epoch of belief, it was the epoch of incredulity,
it was the season of Light, it was the season of Darkness.";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next();
    let min_len: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(3);
    let top: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(10);

    // Keep the temporary file alive until the pipeline has been read.
    let _sample;
    let lines = match path {
        Some(p) => read_lines(p)?,
        None => {
            let mut f = tempfile::NamedTempFile::new()?;
            f.write_all(SAMPLE.as_bytes())?;
            let lines = read_lines(f.path())?;
            _sample = f;
            lines
        }
    };

    let counts = word_frequencies(lines, min_len)?;
    tracing::info!(distinct = counts.len(), "counted words");

    let ranked = most_frequent(counts, 1)?;
    report_entries(&mut ConsoleSink::stdout(), ranked.into_iter().take(top))?;
    Ok(())
}
