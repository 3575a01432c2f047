// Shared CLI definition.
//
// Included by both `src/cli/mod.rs` and `build.rs`, so it may only use
// `clap` items and `PathBuf`, which both include sites bring into scope.

/// Struct Mapper CLI
#[derive(Parser, Debug)]
#[command(
    name = "struct-map",
    about = "Copy same-named, type-compatible fields from source records onto a destination template",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Source files (supports glob patterns). Reads from stdin if not provided.
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// JSON object used as the destination for every source record
    #[arg(long, value_name = "TEMPLATE")]
    pub dest: Option<PathBuf>,

    /// Input format: 'json' (newline-delimited) or 'csv'
    #[arg(long, alias = "input_format", default_value = "json")]
    pub input_format: String,

    /// Output format: 'json-lines' (default) or 'json'
    #[arg(long, alias = "output_format", default_value = "json-lines")]
    pub output_format: String,

    /// What to do with fields that cannot be copied: 'skip', 'report' or 'fail'
    #[arg(long, alias = "on_mismatch", default_value = "skip")]
    pub on_mismatch: String,

    /// How field names are matched: 'exact', 'case-insensitive' or 'normalized'
    #[arg(long, alias = "name_matching", default_value = "exact")]
    pub name_matching: String,

    /// Parse quoted numbers and booleans into numeric/boolean destination fields
    #[arg(long, alias = "coerce_quoted_values")]
    pub coerce_quoted_values: bool,

    /// Ignore lines that cannot be parsed instead of stopping
    #[arg(long, alias = "ignore_invalid_lines")]
    pub ignore_invalid_lines: bool,

    /// Write a per-record mapping report to stderr: 'text' or 'json'
    #[arg(long, value_name = "FORMAT")]
    pub report: Option<String>,

    /// Color output for text reports: 'auto' (default), 'always', or 'never'
    #[arg(long, default_value = "auto")]
    pub color: String,

    /// Suppress progress messages (only output records and errors)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of threads for parallel processing (default: auto-detect CPUs)
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Map a sample ProductPart onto a Product and print the result
    Demo {
        /// Report format: 'text' (default) or 'json'
        #[arg(long, default_value = "text")]
        report: String,

        /// Color output: 'auto' (default), 'always', or 'never'
        #[arg(long, default_value = "auto")]
        color: String,
    },
}
