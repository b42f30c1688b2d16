use crate::error::{Result, StreamError};
use crate::pipeline::{Pipeline, from_source};
use crate::source::Source;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Open `path` as a lazy, single-pass source of lines (terminators stripped).
///
/// Fails with [`StreamError::SourceUnavailable`] if the file cannot be opened.
/// A fault while reading surfaces as [`StreamError::Read`] at the line where it
/// happened and ends the traversal.
pub fn read_lines_source(path: impl AsRef<Path>) -> Result<Source<String>> {
    let path = path.as_ref().to_path_buf();
    let f = File::open(&path).map_err(|cause| StreamError::SourceUnavailable {
        path: path.clone(),
        cause,
    })?;
    let name = path.display().to_string();
    let lines = LineReader {
        lines: BufReader::new(f).lines(),
        path,
        line: 0,
        failed: false,
    };
    Ok(Source::single_pass_fallible(name, lines, true))
}

/// Pipeline over the lines of a text file; see [`read_lines_source`].
pub fn read_lines(path: impl AsRef<Path>) -> Result<Pipeline<String>> {
    Ok(from_source(read_lines_source(path)?))
}

struct LineReader {
    lines: std::io::Lines<BufReader<File>>,
    path: PathBuf,
    line: usize,
    failed: bool,
}

impl Iterator for LineReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.line += 1;
        match self.lines.next()? {
            Ok(l) => Some(Ok(l)),
            Err(cause) => {
                self.failed = true;
                Some(Err(StreamError::Read {
                    path: self.path.clone(),
                    line: self.line,
                    cause,
                }))
            }
        }
    }
}
