//! CLI argument definitions for the rubric analytics tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use rubric_concepts::DEFAULT_CONCEPT_FILE;

#[derive(Parser)]
#[command(
    name = "rubric",
    version,
    about = "Rubric analytics - find what students keep getting wrong",
    long_about = "Normalize rubric deduction exports, check them, and report persistent \
                  errors, exam-over-exam changes, misconception clusters and teaching \
                  recommendations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow student identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Suggest a canonical column mapping for a CSV export.
    Suggest(SuggestArgs),

    /// Run the invariant checks on the raw and normalized table.
    ///
    /// Exits with status 1 when normalization fails or a check on the
    /// normalized table fails. Raw-table findings are reported only.
    Validate(ValidateArgs),

    /// Run the full analysis and print a report.
    Analyze(AnalyzeArgs),

    /// Manage the rubric item to concept mapping file.
    Concepts(ConceptsArgs),
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Rubric export to inspect.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,
}

/// How to map source columns onto canonical fields.
#[derive(Args, Clone, Default)]
pub struct MappingArgs {
    /// JSON file mapping canonical fields to source columns.
    #[arg(long = "mapping", value_name = "FILE")]
    pub mapping: Option<PathBuf>,

    /// Map one field inline, e.g. `--map student_id=Learner`. Repeatable.
    #[arg(long = "map", value_name = "FIELD=COLUMN")]
    pub map: Vec<String>,

    /// Do not guess a mapping for non-canonical tables.
    #[arg(long = "no-infer")]
    pub no_infer: bool,

    /// Remember the last used mapping in this file and reuse it when it fits.
    #[arg(long = "mapping-hint", value_name = "FILE")]
    pub mapping_hint: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArgs,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    #[command(flatten)]
    pub mapping: MappingArgs,

    /// Concept mapping file (rubric item to concept).
    #[arg(long = "concepts", value_name = "FILE")]
    pub concepts: Option<PathBuf>,

    /// Exam order, comma separated (default: sorted exam ids).
    #[arg(long = "exam-order", value_name = "EXAMS", value_delimiter = ',')]
    pub exam_order: Vec<String>,

    /// Number of concepts to recommend.
    #[arg(long = "top-n", default_value_t = 5)]
    pub top_n: usize,

    /// Treat the unmapped concept as a regular concept.
    #[arg(long = "include-unmapped")]
    pub include_unmapped: bool,

    /// Only recommend these concepts. Repeatable.
    #[arg(long = "allow-concept", value_name = "CONCEPT")]
    pub allow_concept: Vec<String>,

    /// Restrict the analysis to these students. Repeatable.
    #[arg(long = "student", value_name = "ID")]
    pub student: Vec<String>,

    /// Replace student ids with `Student 001`, `Student 002`, ...
    #[arg(long = "anonymize")]
    pub anonymize: bool,

    /// Number of bins in the score distribution.
    #[arg(long = "bins", default_value_t = 10)]
    pub bins: usize,

    /// Write CSV exports to this directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConceptsArgs {
    /// Concept mapping file.
    #[arg(long = "file", value_name = "FILE", default_value = DEFAULT_CONCEPT_FILE)]
    pub file: PathBuf,

    #[command(subcommand)]
    pub action: ConceptsAction,
}

#[derive(Subcommand)]
pub enum ConceptsAction {
    /// Print every stored mapping.
    List,

    /// Add or update mappings, e.g. `"Off by one=Loops"`. Blank concepts are ignored.
    Set {
        #[arg(value_name = "ITEM=CONCEPT", required = true)]
        pairs: Vec<String>,
    },

    /// List rubric items in a CSV that have neither a topic nor a mapping.
    Unmapped {
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// Show every rubric item with its current concept.
        #[arg(long = "all")]
        all: bool,

        /// Only show rubric items containing this text (case-insensitive).
        #[arg(long = "filter", value_name = "TEXT", default_value = "")]
        filter: String,

        #[command(flatten)]
        mapping: MappingArgs,
    },
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
