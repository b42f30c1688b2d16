//! Pre-built datasets and instrumented sources for tests.

use crate::pipeline::{Pipeline, generate};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

/// A person record keyed by zip code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub zip: u32,
    pub name: String,
}

impl Person {
    pub fn new(zip: u32, name: impl Into<String>) -> Self {
        Self {
            zip,
            name: name.into(),
        }
    }
}

/// Five people across three zip codes; only zip 3 has a single resident.
#[must_use]
pub fn persons() -> Vec<Person> {
    vec![
        Person::new(1, "Andrii"),
        Person::new(1, "Ivan"),
        Person::new(2, "Petro"),
        Person::new(2, "Olga"),
        Person::new(3, "Kiril"),
    ]
}

#[must_use]
pub fn names() -> Vec<String> {
    persons().into_iter().map(|p| p.name).collect()
}

/// Infinite restartable source `0, 1, 2, ...` plus a counter of elements pulled
/// from it across all traversals.
#[must_use]
pub fn counting_source() -> (Pipeline<u64>, Arc<AtomicUsize>) {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pulled);
    let source = generate(move || {
        let counter = Arc::clone(&counter);
        (0u64..).inspect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    });
    (source, pulled)
}

/// Write `lines` to a temporary file, one per line. The file is removed on drop.
pub fn lines_file<S: AsRef<str>>(lines: &[S]) -> anyhow::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    for line in lines {
        writeln!(file, "{}", line.as_ref())?;
    }
    file.flush()?;
    Ok(file)
}
