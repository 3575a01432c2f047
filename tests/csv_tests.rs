//! CSV-specific tests for Struct Mapper

use serde_json::{json, Value};
use std::io::Cursor;
use struct_mapper::{
    impl_record, map_records, map_records_to_writer, CsvRecords, InputFormat, MapperConfig,
    OutputFormat, SkipReason, StructMapper,
};

/// Helper to map CSV rows onto a template and return the output records
fn map_csv(csv_data: &str, template: Value, config: MapperConfig) -> Vec<Value> {
    let mut output = Vec::new();

    map_records_to_writer(
        Cursor::new(csv_data),
        &mut output,
        InputFormat::Csv,
        OutputFormat::JsonLines,
        &template,
        config,
        false,
    )
    .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn coercing() -> MapperConfig {
    MapperConfig {
        coerce_quoted_values: true,
        ..MapperConfig::default()
    }
}

// =============================================================================
// BASIC CSV TESTS
// =============================================================================

#[test]
fn test_simple_csv() {
    let csv = "name,surname,age\nJohn,Smith,23\nMichael,Johnson,27";
    let records = map_csv(csv, json!({"name": "", "age": ""}), MapperConfig::default());

    assert_eq!(
        records,
        vec![
            json!({"name": "John", "age": "23"}),
            json!({"name": "Michael", "age": "27"}),
        ]
    );
}

#[test]
fn test_csv_values_are_strings_without_coercion() {
    let csv = "id,price,active\n1,2.5,true";
    let records = map_csv(
        csv,
        json!({"id": 0, "price": 0.0, "active": false}),
        MapperConfig::default(),
    );

    assert_eq!(records, vec![json!({"id": 0, "price": 0.0, "active": false})]);
}

#[test]
fn test_csv_coercion_fills_typed_slots() {
    let csv = "id,price,active\n1,2.5,true\n2,3,FALSE";
    let records = map_csv(
        csv,
        json!({"id": 0, "price": 0.0, "active": true}),
        coercing(),
    );

    assert_eq!(
        records,
        vec![
            json!({"id": 1, "price": 2.5, "active": true}),
            json!({"id": 2, "price": 3.0, "active": false}),
        ]
    );
}

#[test]
fn test_csv_coercion_rejects_non_numeric_cells() {
    let csv = "id\nabc";
    let mapper = StructMapper::new(coercing());
    let (records, summary) = map_records(
        Cursor::new(csv),
        InputFormat::Csv,
        &json!({"id": 0}),
        &mapper,
        false,
    )
    .unwrap();

    assert_eq!(records, vec![json!({"id": 0})]);
    assert_eq!(
        summary.reports[0].report.skipped[0].reason,
        SkipReason::TypeMismatch {
            expected: "integer".to_string(),
            found: "string".to_string(),
        }
    );
}

// =============================================================================
// ROW SHAPES
// =============================================================================

#[test]
fn test_csv_short_rows_leave_fields_untouched() {
    let csv = "a,b,c\n1,2\n4,5,6";
    let records = map_csv(
        csv,
        json!({"a": "-", "b": "-", "c": "-"}),
        MapperConfig::default(),
    );

    assert_eq!(records[0], json!({"a": "1", "b": "2", "c": "-"}));
    assert_eq!(records[1], json!({"a": "4", "b": "5", "c": "6"}));
}

#[test]
fn test_csv_extra_cells_are_ignored() {
    let mut rows = CsvRecords::new(Cursor::new("a\n1,2,3")).unwrap();
    let (_, record) = rows.next().unwrap().unwrap();
    assert_eq!(record, json!({"a": "1"}));
}

#[test]
fn test_csv_quoted_cells() {
    let csv = "name,note\n\"Smith, John\",\"said \"\"hi\"\"\"";
    let records = map_csv(
        csv,
        json!({"name": "", "note": ""}),
        MapperConfig::default(),
    );
    assert_eq!(records[0]["name"], "Smith, John");
    assert_eq!(records[0]["note"], "said \"hi\"");
}

#[test]
fn test_csv_headers_only() {
    let records = map_csv("a,b\n", json!({"a": ""}), MapperConfig::default());
    assert!(records.is_empty());
}

#[test]
fn test_csv_line_numbers() {
    let csv = "a\n1\n2\n3";
    let (_, summary) = map_records(
        Cursor::new(csv),
        InputFormat::Csv,
        &json!({"a": ""}),
        &StructMapper::default(),
        false,
    )
    .unwrap();

    let labels: Vec<&str> = summary.reports.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["line 2", "line 3", "line 4"]);
}

// =============================================================================
// TYPED DESTINATIONS
// =============================================================================

#[derive(Debug, Default, PartialEq)]
struct Employee {
    name: String,
    age: u32,
    salary: f64,
    manager: bool,
}

impl_record!(Employee { name, age, salary, manager });

#[test]
fn test_csv_rows_onto_typed_struct() {
    let csv = "name,age,salary,manager,team\nGrace,45,120000.5,true,core";
    let mut rows = CsvRecords::new(Cursor::new(csv)).unwrap();
    let (_, row) = rows.next().unwrap().unwrap();

    let mut employee = Employee::default();
    let report = StructMapper::new(coercing())
        .map(&mut employee, &row)
        .unwrap();

    assert_eq!(
        employee,
        Employee {
            name: "Grace".to_string(),
            age: 45,
            salary: 120000.5,
            manager: true,
        }
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].name, "team");
}
