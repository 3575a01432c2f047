//! Map command implementation (default command).

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use struct_mapper::{
    map_records, read_template_from_file, write_records, write_reports, BatchSummary, ColorMode,
    InputFormat, LabeledReport, MapperConfig, MismatchPolicy, NameMatching, OutputFormat,
    ReportFormat, StructMapper,
};

use super::Cli;

/// Errors that can occur while mapping records
#[derive(Debug)]
pub enum MapCommandError {
    /// Invalid input format specified
    InvalidInputFormat(String),
    /// Invalid output format specified
    InvalidOutputFormat(String),
    /// Invalid mismatch policy specified
    InvalidMismatchPolicy(String),
    /// Invalid name matching specified
    InvalidNameMatching(String),
    /// Invalid report format specified
    InvalidReportFormat(String),
    /// Invalid color mode specified
    InvalidColorMode(String),
    /// No destination template given
    MissingTemplate,
    /// Failed to load the destination template
    TemplateLoad(PathBuf, String),
    /// Invalid glob pattern
    InvalidGlobPattern(String, String),
    /// Failed to open input file
    InputFileOpen(PathBuf, io::Error),
    /// Failed to create output file
    OutputFileCreate(PathBuf, io::Error),
    /// Mapping error, tagged with the input it came from
    Mapping(String, struct_mapper::Error),
    /// Writing output failed
    Output(String),
}

impl std::fmt::Display for MapCommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapCommandError::InvalidInputFormat(fmt) => {
                write!(f, "Unknown input format '{}'. Use 'json' or 'csv'.", fmt)
            }
            MapCommandError::InvalidOutputFormat(fmt) => {
                write!(
                    f,
                    "Unknown output format '{}'. Use 'json-lines' or 'json'.",
                    fmt
                )
            }
            MapCommandError::InvalidMismatchPolicy(policy) => {
                write!(
                    f,
                    "Unknown mismatch policy '{}'. Use 'skip', 'report' or 'fail'.",
                    policy
                )
            }
            MapCommandError::InvalidNameMatching(matching) => {
                write!(
                    f,
                    "Unknown name matching '{}'. Use 'exact', 'case-insensitive' or 'normalized'.",
                    matching
                )
            }
            MapCommandError::InvalidReportFormat(fmt) => {
                write!(f, "Unknown report format '{}'. Use 'text' or 'json'.", fmt)
            }
            MapCommandError::InvalidColorMode(mode) => {
                write!(
                    f,
                    "Unknown color mode '{}'. Use 'auto', 'always' or 'never'.",
                    mode
                )
            }
            MapCommandError::MissingTemplate => {
                write!(f, "--dest <TEMPLATE> is required")
            }
            MapCommandError::TemplateLoad(path, e) => {
                write!(
                    f,
                    "Cannot load destination template from '{}': {}",
                    path.display(),
                    e
                )
            }
            MapCommandError::InvalidGlobPattern(pattern, e) => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, e)
            }
            MapCommandError::InputFileOpen(path, e) => {
                write!(f, "Cannot open input file '{}': {}", path.display(), e)
            }
            MapCommandError::OutputFileCreate(path, e) => {
                write!(f, "Cannot create output file '{}': {}", path.display(), e)
            }
            MapCommandError::Mapping(source, e) => {
                write!(f, "{}: {}", source, e)
            }
            MapCommandError::Output(msg) => {
                write!(f, "Cannot write output: {}", msg)
            }
        }
    }
}

impl std::error::Error for MapCommandError {}

/// Validated CLI arguments for mapping
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    pub input_format: InputFormat,
    pub output_format: OutputFormat,
    pub config: MapperConfig,
    /// Destination template every record is mapped onto
    pub template: Value,
    /// Input files (empty means stdin)
    pub input_files: Vec<PathBuf>,
    /// Output path (None means stdout)
    pub output_path: Option<PathBuf>,
    /// Report format, if per-record reports were requested
    pub report: Option<ReportFormat>,
    pub color: ColorMode,
    pub threads: Option<usize>,
    pub quiet: bool,
    pub ignore_invalid_lines: bool,
}

/// Output from a mapping run
#[derive(Debug)]
pub struct MapOutput {
    /// Mapped records, in input order
    pub records: Vec<Value>,
    /// Per-record reports
    pub reports: Vec<LabeledReport>,
    /// Number of files processed (0 for stdin)
    pub files_processed: usize,
}

/// Validate CLI arguments and return validated args
pub fn validate_cli_args(cli: &Cli) -> Result<ValidatedArgs, MapCommandError> {
    let input_format: InputFormat = cli
        .input_format
        .parse()
        .map_err(|_| MapCommandError::InvalidInputFormat(cli.input_format.clone()))?;

    let output_format: OutputFormat = cli
        .output_format
        .parse()
        .map_err(|_| MapCommandError::InvalidOutputFormat(cli.output_format.clone()))?;

    let on_mismatch: MismatchPolicy = cli
        .on_mismatch
        .parse()
        .map_err(|_| MapCommandError::InvalidMismatchPolicy(cli.on_mismatch.clone()))?;

    let name_matching: NameMatching = cli
        .name_matching
        .parse()
        .map_err(|_| MapCommandError::InvalidNameMatching(cli.name_matching.clone()))?;

    let report = match &cli.report {
        Some(fmt) => Some(
            fmt.parse::<ReportFormat>()
                .map_err(|_| MapCommandError::InvalidReportFormat(fmt.clone()))?,
        ),
        None => None,
    };

    let color: ColorMode = cli
        .color
        .parse()
        .map_err(|_| MapCommandError::InvalidColorMode(cli.color.clone()))?;

    let template_path = cli.dest.as_ref().ok_or(MapCommandError::MissingTemplate)?;
    let template = read_template_from_file(template_path)
        .map_err(|e| MapCommandError::TemplateLoad(template_path.clone(), e.to_string()))?;

    let input_files = collect_input_files(&cli.files)?;

    Ok(ValidatedArgs {
        input_format,
        output_format,
        config: MapperConfig {
            on_mismatch,
            name_matching,
            coerce_quoted_values: cli.coerce_quoted_values,
        },
        template,
        input_files,
        output_path: cli.output.clone(),
        report,
        color,
        threads: cli.threads,
        quiet: cli.quiet,
        ignore_invalid_lines: cli.ignore_invalid_lines,
    })
}

/// Map records from validated arguments (testable entry point).
///
/// Nothing is written; see [`write_output`].
pub fn map_inputs(args: &ValidatedArgs) -> Result<MapOutput, MapCommandError> {
    if args.input_files.is_empty() {
        let (records, summary) = map_single_input(io::stdin(), "stdin", args)?;
        return Ok(MapOutput {
            records,
            reports: summary.reports,
            files_processed: 0,
        });
    }

    let num_threads = args.threads.unwrap_or_else(num_cpus::get);
    if num_threads > 1 && args.input_files.len() > 1 {
        map_files_parallel(args, num_threads)
    } else {
        map_files_sequential(args)
    }
}

/// Run the map command (default)
pub fn run(cli: &Cli) {
    let args = match validate_cli_args(cli) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = map_inputs(&args).and_then(|output| {
        write_output(&args, &output)?;
        Ok(output)
    });

    match result {
        Ok(output) => {
            if !args.quiet {
                eprintln!(
                    "Processed {} records from {}",
                    output.records.len(),
                    describe_inputs(output.files_processed)
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn describe_inputs(files: usize) -> String {
    match files {
        0 => "stdin".to_string(),
        1 => "1 file".to_string(),
        n => format!("{} files", n),
    }
}

/// Expand glob patterns into input files
fn collect_input_files(patterns: &[String]) -> Result<Vec<PathBuf>, MapCommandError> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob::glob(pattern)
            .map_err(|e| MapCommandError::InvalidGlobPattern(pattern.clone(), e.to_string()))?;

        let mut found = false;
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    files.push(path);
                    found = true;
                }
                Ok(_) => {}
                Err(e) => eprintln!("Warning: Error reading glob entry: {}", e),
            }
        }

        if !found {
            let path = PathBuf::from(pattern);
            if path.exists() {
                files.push(path);
            } else {
                eprintln!("Warning: No files matched pattern '{}'", pattern);
            }
        }
    }

    Ok(files)
}

/// Map one input stream onto copies of the template
fn map_single_input<R: Read>(
    input: R,
    name: &str,
    args: &ValidatedArgs,
) -> Result<(Vec<Value>, BatchSummary), MapCommandError> {
    let mapper = StructMapper::new(args.config.clone());
    map_records(
        input,
        args.input_format,
        &args.template,
        &mapper,
        args.ignore_invalid_lines,
    )
    .map_err(|e| MapCommandError::Mapping(name.to_string(), e))
}

fn map_file(
    path: &Path,
    args: &ValidatedArgs,
) -> Result<(Vec<Value>, Vec<LabeledReport>), MapCommandError> {
    let file = File::open(path).map_err(|e| MapCommandError::InputFileOpen(path.to_owned(), e))?;
    let name = path.display().to_string();
    let (records, summary) = map_single_input(file, &name, args)?;

    let reports = summary
        .reports
        .into_iter()
        .map(|r| LabeledReport {
            label: format!("{} {}", name, r.label),
            report: r.report,
        })
        .collect();

    Ok((records, reports))
}

/// Map files one after another
fn map_files_sequential(args: &ValidatedArgs) -> Result<MapOutput, MapCommandError> {
    let mut records = Vec::new();
    let mut reports = Vec::new();

    for (idx, path) in args.input_files.iter().enumerate() {
        if !args.quiet {
            eprintln!(
                "Processing file {}/{}: {}",
                idx + 1,
                args.input_files.len(),
                path.display()
            );
        }

        let (file_records, file_reports) = map_file(path, args)?;
        records.extend(file_records);
        reports.extend(file_reports);
    }

    Ok(MapOutput {
        records,
        reports,
        files_processed: args.input_files.len(),
    })
}

/// Map files in parallel, keeping output in file order
fn map_files_parallel(
    args: &ValidatedArgs,
    num_threads: usize,
) -> Result<MapOutput, MapCommandError> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| MapCommandError::Output(e.to_string()))?;

    let progress = if !args.quiet {
        let pb = ProgressBar::new(args.input_files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░░"),
        );
        pb.set_message(format!("{} threads", num_threads));
        Some(pb)
    } else {
        None
    };

    // Each record is mapped onto its own template copy, so workers share
    // nothing but the read-only arguments.
    let results: Vec<Result<(Vec<Value>, Vec<LabeledReport>), MapCommandError>> =
        pool.install(|| {
            args.input_files
                .par_iter()
                .map(|path| {
                    let result = map_file(path, args);
                    if let Some(ref pb) = progress {
                        pb.inc(1);
                    }
                    result
                })
                .collect()
        });

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    let mut records = Vec::new();
    let mut reports = Vec::new();
    for result in results {
        let (file_records, file_reports) = result?;
        records.extend(file_records);
        reports.extend(file_reports);
    }

    Ok(MapOutput {
        records,
        reports,
        files_processed: args.input_files.len(),
    })
}

/// Write mapped records and any requested reports
pub fn write_output(args: &ValidatedArgs, output: &MapOutput) -> Result<(), MapCommandError> {
    let mut writer: Box<dyn Write> = match &args.output_path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| MapCommandError::OutputFileCreate(path.clone(), e))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    write_records(&output.records, args.output_format, &mut writer)
        .map_err(|e| MapCommandError::Output(e.to_string()))?;

    let report_format = match (args.report, args.config.on_mismatch) {
        (Some(format), _) => Some(format),
        (None, MismatchPolicy::Report) => Some(ReportFormat::Text),
        (None, _) => None,
    };

    if let Some(format) = report_format {
        let reports: Vec<LabeledReport> = if args.report.is_some() {
            output.reports.clone()
        } else {
            // --on-mismatch report alone only surfaces incomplete records
            output
                .reports
                .iter()
                .filter(|r| !r.report.is_complete())
                .cloned()
                .collect()
        };
        write_reports(&reports, format, args.color, &mut io::stderr())
            .map_err(|e| MapCommandError::Output(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| MapCommandError::Output(e.to_string()))
}
