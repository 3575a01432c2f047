//! Demo subcommand: map a product part onto a product.

use std::io;

use struct_mapper::{
    impl_record, write_reports, ColorMode, LabeledReport, MapReport, MapperConfig, ReportFormat,
    Result, StructMapper,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPart {
    pub id: String,
    pub correlation_number: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: String,
    pub price: f64,
}

impl_record!(ProductPart { id, correlation_number });
impl_record!(Product { id, price });

/// Map the sample part onto an empty product.
pub fn map_sample() -> Result<(Product, MapReport)> {
    let part = ProductPart {
        id: "Lock".to_string(),
        correlation_number: 123,
    };
    let mut product = Product::default();
    let report = StructMapper::new(MapperConfig::default()).map(&mut product, &part)?;
    Ok((product, report))
}

/// Run the demo subcommand
pub fn run(report_format: &str, color: &str) {
    let report_format: ReportFormat = report_format.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Valid report formats: text, json");
        std::process::exit(1);
    });

    let color_mode: ColorMode = color.parse().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Valid color modes: auto, always, never");
        std::process::exit(1);
    });

    let (product, report) = map_sample().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    println!("Mapped product: {:?}", product);

    let reports = [LabeledReport {
        label: "ProductPart -> Product".to_string(),
        report,
    }];
    if let Err(e) = write_reports(&reports, report_format, color_mode, &mut io::stdout()) {
        eprintln!("Error writing report: {}", e);
        std::process::exit(1);
    }
}
