//! Newline-delimited JSON source records.

use std::io::BufRead;

use serde_json::Value;

use crate::error::{Error, Result};

/// Streams one JSON value per non-empty line, tagged with its line number.
///
/// Lines that fail to parse either end the stream with
/// [`Error::JsonParse`] or, with `ignore_invalid_lines`, are reported on
/// stderr and skipped.
pub struct JsonRecords<R: BufRead> {
    reader: R,
    line_number: usize,
    buffer: String,
    ignore_invalid_lines: bool,
    skipped_lines: usize,
}

impl<R: BufRead> JsonRecords<R> {
    pub fn new(reader: R, ignore_invalid_lines: bool) -> Self {
        Self {
            reader,
            line_number: 0,
            buffer: String::new(),
            ignore_invalid_lines,
            skipped_lines: 0,
        }
    }

    /// Number of lines read so far, including blank ones.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Number of invalid lines dropped because of `ignore_invalid_lines`.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

impl<R: BufRead> Iterator for JsonRecords<R> {
    type Item = Result<(usize, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buffer.clear();
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(Error::Io(e))),
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str(line) {
                Ok(value) => return Some(Ok((self.line_number, value))),
                Err(e) if self.ignore_invalid_lines => {
                    eprintln!(
                        "Warning: Skipping invalid JSON on line {}: {}",
                        self.line_number, e
                    );
                    self.skipped_lines += 1;
                }
                Err(e) => {
                    return Some(Err(Error::JsonParse {
                        line: self.line_number,
                        message: e.to_string(),
                    }))
                }
            }
        }
    }
}
