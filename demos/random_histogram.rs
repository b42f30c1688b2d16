//! Histogram of seeded dice rolls, evaluated in parallel.
//!
//! Run with: cargo run --example random_histogram -- [SEED] [ROLLS]

use anyhow::Result;
use ironstream::collectors::{counting, grouping_by};
use ironstream::report::{ConsoleSink, report_all};
use ironstream::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(42);
    let rolls: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(60_000);

    let dice = random_ints(RandomGenerator::seeded(seed), 1, 7, Some(rolls))?;
    let histogram = dice.collect_par(grouping_by(|face: &i64| *face, counting()))?;

    let bars = from_map(histogram)
        .sorted_by(|a: &(i64, u64), b: &(i64, u64)| a.0.cmp(&b.0))
        .map(move |(face, n): &(i64, u64)| {
            let width = (*n as usize * 300) / rolls.max(1);
            format!("{face}: {:>6} {}", n, "#".repeat(width))
        })
        .to_vec()?;
    report_all(&mut ConsoleSink::stdout(), bars)?;
    Ok(())
}
