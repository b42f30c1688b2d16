//! Testing utilities for ironstream pipelines.
//!
//! - **Assertions**: compare terminal results with expected values, and check that
//!   parallel evaluation agrees with sequential evaluation.
//! - **Fixtures**: small datasets and instrumented sources for common scenarios.
//!
//! # Quick Start
//!
//! ```no_run
//! use ironstream::*;
//! use ironstream::testing::*;
//!
//! #[test]
//! fn doubles() -> anyhow::Result<()> {
//!     let result = from_vec(vec![1, 2, 3]).map(|x: &i32| x * 2).to_vec()?;
//!     assert_collections_equal(&result, &[2, 4, 6]);
//!     Ok(())
//! }
//! ```
//!
//! Instrumented sources count how many elements were actually pulled, which is
//! how laziness and short-circuiting are verified:
//!
//! ```
//! use ironstream::testing::counting_source;
//!
//! let (numbers, pulled) = counting_source();
//! assert!(numbers.any_match(|n: &u64| *n == 2).unwrap());
//! assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 3);
//! ```

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
