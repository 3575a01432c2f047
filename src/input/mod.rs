//! Readers for source records and destination templates.

pub mod csv;
pub mod json;

pub use self::csv::CsvRecords;
pub use self::json::JsonRecords;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Format of source record input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Newline-delimited JSON
    #[default]
    Json,
    /// CSV with a header row
    Csv,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" | "ndjson" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            _ => Err(format!("Unknown input format: {}", s)),
        }
    }
}

/// A stream of `(line_number, record)` pairs.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<(usize, Value)>> + 'a>;

/// Stream source records from `reader` in the given format.
pub fn read_records<'a, R: Read + 'a>(
    reader: R,
    format: InputFormat,
    ignore_invalid_lines: bool,
) -> Result<RecordStream<'a>> {
    match format {
        InputFormat::Json => Ok(Box::new(JsonRecords::new(
            BufReader::new(reader),
            ignore_invalid_lines,
        ))),
        InputFormat::Csv => Ok(Box::new(CsvRecords::new(reader)?)),
    }
}

/// Parse a destination template: a single JSON object.
pub fn parse_template(text: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::Template(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::Template(format!(
            "template must be a JSON object, found {}",
            crate::inference::ValueKind::of(&value)
        )));
    }
    Ok(value)
}

/// Read a destination template from a file.
pub fn read_template_from_file(path: &Path) -> Result<Value> {
    let mut text = String::new();
    File::open(path)?.read_to_string(&mut text)?;
    parse_template(&text)
}
