//! Sequential line retrieval with line numbering.

use crate::error::Result;
use std::io::BufRead;

/// Wraps a buffered source and yields `(line_number, line)` pairs.
///
/// Line numbers are 1-based and count every physical line, including
/// blank lines and comments, so errors can point at the source.
pub struct LineReader<R> {
    inner: R,
    line_number: usize,
    buffer: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Next line without its terminator, or `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<(usize, &str)>> {
        self.buffer.clear();
        if self.inner.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        let line = self.buffer.trim_end_matches(['\n', '\r']);
        Ok(Some((self.line_number, line)))
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
