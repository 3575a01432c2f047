//! CSV source records.
//!
//! The header row names the fields; every data row becomes a JSON object
//! whose values are all strings. Map with `coerce_quoted_values` to get
//! numbers and booleans into typed destination fields.

use std::io::Read;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Streams CSV rows as `(line_number, object)` pairs. The header is line 1.
pub struct CsvRecords<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    record: csv::StringRecord,
}

impl<R: Read> CsvRecords<R> {
    /// Read the header row and prepare to stream records.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::CsvParse(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            reader,
            headers,
            record: csv::StringRecord::new(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn current_object(&self) -> Value {
        // Extra cells beyond the header row are dropped, missing ones left out.
        let obj: Map<String, Value> = self
            .headers
            .iter()
            .zip(self.record.iter())
            .map(|(key, cell)| (key.clone(), Value::String(cell.to_string())))
            .collect();
        Value::Object(obj)
    }
}

impl<R: Read> Iterator for CsvRecords<R> {
    type Item = Result<(usize, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {
                let line = self
                    .record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or_default();
                Some(Ok((line, self.current_object())))
            }
            Ok(false) => None,
            Err(e) => Some(Err(Error::CsvParse(e.to_string()))),
        }
    }
}
