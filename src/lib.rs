//! Struct Mapper
//!
//! Copies same-named, type-compatible fields from one record into another,
//! without a hand-written converter per pair of types.
//!
//! Records expose their fields through the [`Record`] trait. Typed structs
//! opt in with [`impl_record!`]; JSON objects are records out of the box.
//! Fields that have no settable, compatible counterpart in the destination
//! are skipped by default, and [`MapperConfig`] can make that stricter.
//!
//! # Example
//!
//! ```rust
//! use struct_mapper::{impl_record, MapperConfig, StructMapper};
//! use serde_json::json;
//!
//! #[derive(Debug, Default)]
//! struct Product {
//!     id: String,
//!     price: f64,
//! }
//!
//! impl_record!(Product { id, price });
//!
//! let mut product = Product::default();
//! let part = json!({"id": "Lock", "correlation_number": 123});
//!
//! let mapper = StructMapper::new(MapperConfig::default());
//! let report = mapper.map(&mut product, &part).unwrap();
//!
//! assert_eq!(product.id, "Lock");
//! assert_eq!(report.copied, vec!["id"]);
//! assert_eq!(report.skipped[0].name, "correlation_number");
//! ```

pub mod error;
pub mod inference;
pub mod input;
pub mod mapper;
pub mod output;
pub mod record;

// Re-export commonly used types
pub use error::{Error, RecordRole, Result, SkipReason, SkippedField};
pub use input::{
    parse_template, read_records, read_template_from_file, CsvRecords, InputFormat, JsonRecords,
};
pub use mapper::{map_structs, MapReport, MapperConfig, MismatchPolicy, NameMatching, StructMapper};
pub use output::{
    report_to_json, write_records, write_reports, ColorMode, LabeledReport, OutputFormat,
    ReportFormat,
};
pub use record::{FieldDescriptor, NotRecord, Record};

use std::io::{Read, Write};

use serde_json::Value;

/// Totals from a batch mapping run.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// Number of source records mapped
    pub records: usize,
    /// Per-record reports, labeled `line N`
    pub reports: Vec<LabeledReport>,
}

impl BatchSummary {
    /// Number of records where at least one field was skipped.
    pub fn incomplete_records(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| !r.report.is_complete())
            .count()
    }
}

/// Map every record read from `input` onto a fresh copy of `template`.
///
/// Returns the mapped records in input order together with a summary. An
/// input row that is not a record, or a mismatch under
/// [`MismatchPolicy::Fail`], stops the batch with an error.
pub fn map_records<R: Read>(
    input: R,
    format: InputFormat,
    template: &Value,
    mapper: &StructMapper,
    ignore_invalid_lines: bool,
) -> Result<(Vec<Value>, BatchSummary)> {
    let mut mapped = Vec::new();
    let mut summary = BatchSummary::default();

    for item in read_records(input, format, ignore_invalid_lines)? {
        let (line, source) = item?;
        let mut dest = template.clone();
        let report = mapper.map(&mut dest, &source)?;

        mapped.push(dest);
        summary.records += 1;
        summary.reports.push(LabeledReport {
            label: format!("line {}", line),
            report,
        });
    }

    Ok((mapped, summary))
}

/// High-level function: map records from `input` and write them to `output`.
pub fn map_records_to_writer<R: Read, W: Write>(
    input: R,
    output: &mut W,
    format: InputFormat,
    output_format: OutputFormat,
    template: &Value,
    config: MapperConfig,
    ignore_invalid_lines: bool,
) -> Result<BatchSummary> {
    let mapper = StructMapper::new(config);
    let (records, summary) = map_records(input, format, template, &mapper, ignore_invalid_lines)?;
    write_records(&records, output_format, output)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_map_records_json() {
        let input = r#"{"ID": "Lock", "CorrelationNumber": 123}
{"ID": "Key", "Price": 4}"#;
        let template = json!({"ID": "", "Price": 0.0});
        let (records, summary) = map_records(
            Cursor::new(input),
            InputFormat::Json,
            &template,
            &StructMapper::default(),
            false,
        )
        .unwrap();

        assert_eq!(records[0], json!({"ID": "Lock", "Price": 0.0}));
        assert_eq!(records[1], json!({"ID": "Key", "Price": 4.0}));
        assert_eq!(summary.records, 2);
        assert_eq!(summary.incomplete_records(), 1);
        assert_eq!(summary.reports[1].label, "line 2");
    }

    #[test]
    fn test_map_records_csv_with_coercion() {
        let input = "ID,Price\nLock,12.5";
        let template = json!({"ID": "", "Price": 0.0});
        let mapper = StructMapper::new(MapperConfig {
            coerce_quoted_values: true,
            ..MapperConfig::default()
        });
        let (records, _) =
            map_records(Cursor::new(input), InputFormat::Csv, &template, &mapper, false).unwrap();
        assert_eq!(records, vec![json!({"ID": "Lock", "Price": 12.5})]);
    }

    #[test]
    fn test_map_records_rejects_non_record_rows() {
        let template = json!({"ID": ""});
        let err = map_records(
            Cursor::new("[1, 2]"),
            InputFormat::Json,
            &template,
            &StructMapper::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::NotARecord {
                role: RecordRole::Source,
                ..
            }
        ));
    }

    #[test]
    fn test_map_records_to_writer() {
        let mut output = Vec::new();
        let summary = map_records_to_writer(
            Cursor::new(r#"{"ID": "Lock"}"#),
            &mut output,
            InputFormat::Json,
            OutputFormat::JsonLines,
            &json!({"ID": "", "Price": 0.0}),
            MapperConfig::default(),
            false,
        )
        .unwrap();

        assert_eq!(summary.records, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"ID\":\"Lock\",\"Price\":0.0}\n"
        );
    }
}
