//! Reporting sinks for finalized results.
//!
//! Terminals return plain values; printing is the caller's business. A [`Sink`]
//! receives one rendered line at a time, so the same reporting code can target
//! stdout, a file, or an in-memory buffer in tests.

use std::fmt::{Debug, Display};
use std::io::{self, Write};

/// Line-oriented destination for reports.
pub trait Sink {
    fn emit(&mut self, line: String) -> io::Result<()>;
}

/// Writes each line to a [`Write`] implementation, stdout by default.
#[derive(Debug)]
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for ConsoleSink<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn emit(&mut self, line: String) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }
}

/// Keeps every emitted line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for MemorySink {
    fn emit(&mut self, line: String) -> io::Result<()> {
        self.lines.push(line);
        Ok(())
    }
}

/// Emit every item on its own line using `Display`.
pub fn report_all<S, I>(sink: &mut S, items: I) -> io::Result<()>
where
    S: Sink + ?Sized,
    I: IntoIterator,
    I::Item: Display,
{
    for item in items {
        sink.emit(item.to_string())?;
    }
    Ok(())
}

/// Emit `key=value` lines. Values are rendered with `Debug`, so sets and lists
/// print in their literal form.
pub fn report_entries<S, I, K, V>(sink: &mut S, entries: I) -> io::Result<()>
where
    S: Sink + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Debug,
{
    for (k, v) in entries {
        sink.emit(format!("{k}={v:?}"))?;
    }
    Ok(())
}
