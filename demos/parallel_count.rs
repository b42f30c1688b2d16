//! Count primes below a bound, sequentially and in parallel, and print run metrics.
//!
//! Run with: cargo run --example parallel_count -- [LIMIT] ['{"parallelism": 8, "deadline_ms": 10000}']

use anyhow::Result;
use ironstream::collectors::counting;
use ironstream::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let limit: i64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(2_000_000);
    let config = match args.next() {
        Some(json) => ParallelConfig::from_json(&json)?,
        None => ParallelConfig::default(),
    };

    let primes = range(0..limit).filter(|n: &i64| is_prime(*n));

    let started = Instant::now();
    let sequential = primes.count()?;
    println!("sequential: {sequential} primes in {:?}", started.elapsed());

    let mut coordinator = Coordinator::new(config);
    let parallel = coordinator.collect(&primes, counting())?;
    println!("parallel:   {parallel} primes");
    coordinator.metrics().print();

    anyhow::ensure!(sequential == parallel, "parallel count disagrees with sequential");
    Ok(())
}
