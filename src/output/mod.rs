//! Output formatting for mapped records and mapping reports.
//!
//! Mapped records are written as:
//! - JSON lines: one compact object per line (default)
//! - JSON: a single pretty-printed array
//!
//! Mapping reports are written as colored text or JSON.

use std::io::Write;

use colored::Colorize;
use serde_json::{json, Value};

use crate::error::{Result, SkipReason};
use crate::mapper::MapReport;

/// Output format for mapped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    JsonLines,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json-lines" | "json_lines" | "jsonl" | "ndjson" => Ok(OutputFormat::JsonLines),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Output format for mapping reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Color mode for text output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            _ => Err(format!("Unknown color mode: {}", s)),
        }
    }
}

/// A mapping report together with a label naming the mapped record.
#[derive(Debug, Clone)]
pub struct LabeledReport {
    pub label: String,
    pub report: MapReport,
}

// =============================================================================
// Mapped records
// =============================================================================

/// Write mapped records in the given format.
pub fn write_records<W: Write>(
    records: &[Value],
    format: OutputFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut *writer, record).map_err(std::io::Error::from)?;
                writeln!(writer)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, records).map_err(std::io::Error::from)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

// =============================================================================
// Reports
// =============================================================================

/// Short machine-readable code for a skip reason.
pub fn skip_reason_code(reason: &SkipReason) -> &'static str {
    match reason {
        SkipReason::NoSuchField => "no_such_field",
        SkipReason::NotSettable => "not_settable",
        SkipReason::TypeMismatch { .. } => "type_mismatch",
        SkipReason::AlreadyMapped { .. } => "already_mapped",
        SkipReason::Unreadable => "unreadable",
    }
}

/// Convert a report to JSON.
pub fn report_to_json(report: &MapReport) -> Value {
    let skipped: Vec<Value> = report
        .skipped
        .iter()
        .map(|s| {
            json!({
                "field": s.name,
                "reason": skip_reason_code(&s.reason),
                "message": s.reason.to_string(),
            })
        })
        .collect();

    json!({
        "copied": report.copied,
        "skipped": skipped,
    })
}

/// Write mapping reports in the given format.
pub fn write_reports<W: Write>(
    reports: &[LabeledReport],
    format: ReportFormat,
    color_mode: ColorMode,
    writer: &mut W,
) -> std::io::Result<()> {
    match color_mode {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => colored::control::unset_override(),
    }

    match format {
        ReportFormat::Text => write_text_reports(reports, writer),
        ReportFormat::Json => write_json_reports(reports, writer),
    }
}

fn write_text_reports<W: Write>(reports: &[LabeledReport], writer: &mut W) -> std::io::Result<()> {
    for LabeledReport { label, report } in reports {
        writeln!(
            writer,
            "{}: {} copied, {} skipped",
            label.bold(),
            report.copied.len().to_string().green(),
            if report.skipped.is_empty() {
                report.skipped.len().to_string().normal()
            } else {
                report.skipped.len().to_string().yellow()
            }
        )?;
        for field in &report.copied {
            writeln!(writer, "  {} {}", "+".green(), field)?;
        }
        for skipped in &report.skipped {
            writeln!(
                writer,
                "  {} {} {}",
                "-".yellow(),
                skipped.name,
                format!("({})", skipped.reason).dimmed()
            )?;
        }
    }
    Ok(())
}

fn write_json_reports<W: Write>(reports: &[LabeledReport], writer: &mut W) -> std::io::Result<()> {
    let entries: Vec<Value> = reports
        .iter()
        .map(|r| {
            let mut entry = report_to_json(&r.report);
            entry["record"] = Value::String(r.label.clone());
            entry
        })
        .collect();
    let text = serde_json::to_string_pretty(&entries)?;
    writeln!(writer, "{}", text)
}
