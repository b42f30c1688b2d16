//! Built-in collectors for [`Pipeline::collect`](crate::Pipeline::collect) and the
//! parallel runner.
//!
//! These are reusable implementations of [`Collector`](crate::Collector):
//!
//! - [`Counting`] -- number of elements.
//! - [`Summing<T>`] -- sum of elements.
//! - [`ToList<T>`] -- elements in encounter order.
//! - [`ToSet<T>`] -- distinct elements.
//! - [`Joining`] -- string concatenation with a delimiter (and optional prefix/suffix).
//! - [`Mapping`] -- adapt elements before handing them to a downstream collector.
//! - [`Reducing`] -- binary-operator reduction with a declared merge law.
//! - [`GroupingBy`] -- two-level "group, then aggregate" by classifier key.
//! - [`FnCollector`] -- a collector assembled from four function values.
//!
//! Each collector fixes its accumulator type (`A`) and result type (`R`).
//!
//! # Examples
//! ```
//! use ironstream::*;
//! use ironstream::collectors::*;
//!
//! let words = from_vec(vec!["apple", "avocado", "banana"]);
//!
//! let n = words.clone().count()?;
//! assert_eq!(n, 3);
//!
//! let joined = words.clone().collect(joining(", "))?;
//! assert_eq!(joined, "apple, avocado, banana");
//!
//! let by_letter = words.collect(grouping_by(|w: &&str| w.as_bytes()[0], counting()))?;
//! assert_eq!(by_letter[&b'a'], 2);
//! # Ok::<(), ironstream::StreamError>(())
//! ```

mod basic;
mod containers;
mod custom;
mod grouping;
mod joining;
mod reducing;

pub use basic::{Counting, Summing, counting, summing};
pub use containers::{ToList, ToSet, to_list, to_set};
pub use custom::{FnCollector, collector_of};
pub use grouping::{GroupingBy, Mapping, grouping_by, mapping};
pub use joining::{Joining, joining, joining_with};
pub use reducing::{Reducing, reducing};
