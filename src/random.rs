//! Bounded random integers from an explicit, seedable generator handle.

use crate::error::{Result, StreamError};
use crate::pipeline::{Pipeline, from_source};
use crate::source::Source;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Explicit random generator handle. Seed it for reproducible pipelines.
#[derive(Clone, Debug)]
pub struct RandomGenerator {
    rng: StdRng,
}

impl RandomGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw `r` with `lower <= r < upper`.
    pub fn next_bounded(&mut self, lower: i64, upper: i64) -> Result<i64> {
        check_range(lower, upper)?;
        Ok(self.rng.gen_range(lower..upper))
    }

    /// Turn this generator into a single-pass source of values in `[lower, upper)`.
    ///
    /// With `count = None` the source is infinite and must be bounded downstream
    /// (for example with [`Pipeline::limit`]).
    pub fn into_source(mut self, lower: i64, upper: i64, count: Option<usize>) -> Result<Source<i64>> {
        check_range(lower, upper)?;
        let draws = std::iter::repeat_with(move || self.rng.gen_range(lower..upper));
        let name = format!("random[{lower}, {upper})");
        Ok(match count {
            Some(n) => Source::single_pass(name, draws.take(n), true),
            None => Source::single_pass(name, draws, false),
        })
    }
}

/// Pipeline of random integers in `[lower, upper)`; `count` bounds it.
pub fn random_ints(
    generator: RandomGenerator,
    lower: i64,
    upper: i64,
    count: Option<usize>,
) -> Result<Pipeline<i64>> {
    Ok(from_source(generator.into_source(lower, upper, count)?))
}

fn check_range(lower: i64, upper: i64) -> Result<()> {
    if lower >= upper {
        return Err(StreamError::InvalidRange {
            lower,
            upper,
            reason: "lower bound must be below upper bound",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_draws_stay_in_range() {
        let mut g = RandomGenerator::seeded(7);
        for _ in 0..1000 {
            let v = g.next_bounded(-3, 4).unwrap();
            assert!((-3..4).contains(&v));
        }
    }

    #[test]
    fn empty_range_is_rejected() {
        let mut g = RandomGenerator::seeded(1);
        assert!(matches!(
            g.next_bounded(5, 5),
            Err(StreamError::InvalidRange { lower: 5, upper: 5, .. })
        ));
        assert!(g.into_source(9, 2, Some(3)).is_err());
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = random_ints(RandomGenerator::seeded(42), 0, 100, Some(20)).unwrap();
        let b = random_ints(RandomGenerator::seeded(42), 0, 100, Some(20)).unwrap();
        assert_eq!(a.to_vec().unwrap(), b.to_vec().unwrap());
    }
}
