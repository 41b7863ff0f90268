//! voc2vott: Pascal VOC to VoTT project converter.
//!
//! Reads a Pascal VOC dataset (one XML annotation per image plus a label
//! map) and writes a VoTT project: one `<asset-id>-asset.json` per image and a
//! single `<name>.vott` project descriptor tying them together.
//!
//! # Modules
//!
//! - [`voc`]: Label map reader, dataset layout and VOC XML parser
//! - [`vott`]: VoTT asset/project schema, id and color generation, JSON output
//! - [`conversion`]: The conversion run and its report
//! - [`validation`]: Optional post-conversion checks
//! - [`error`]: Error types for voc2vott operations

pub mod conversion;
pub mod error;
pub mod validation;
pub mod voc;
pub mod vott;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

pub use error::{ErrorKind, Voc2VottError};

/// The voc2vott CLI application.
#[derive(Parser)]
#[command(name = "voc2vott")]
#[command(version, author, about)]
struct Cli {
    /// Path of the Pascal VOC dataset (defaults to the current directory).
    #[arg(long = "in_path", visible_alias = "pascal_voc_dir")]
    in_path: Option<PathBuf>,

    /// Path to save the VoTT project and annotations to (defaults to the current directory).
    #[arg(long = "out_path", visible_alias = "out_dir")]
    out_path: Option<PathBuf>,

    /// Name to give the created VoTT project.
    #[arg(long, required_unless_present = "template")]
    name: Option<String>,

    /// Existing .vott project file to clone settings from.
    #[arg(long, visible_alias = "vott_file")]
    template: Option<PathBuf>,

    /// What to do with annotation files that fail to parse.
    #[arg(long = "on_parse_error", value_enum, default_value_t = ParseErrorArg::Abort)]
    on_parse_error: ParseErrorArg,

    /// Seed for reproducible ids and tag colors.
    #[arg(long)]
    seed: Option<u64>,

    /// Check the converted assets against the label map and image bounds.
    #[arg(long)]
    validate: bool,

    /// With --validate, treat warnings as errors (exit non-zero if any warnings).
    #[arg(long, requires = "validate")]
    strict: bool,

    /// Output format for the run summary.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Do not show the progress bar.
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ParseErrorArg {
    /// Stop at the first unparsable file.
    Abort,
    /// Warn and continue without the file.
    Skip,
}

impl From<ParseErrorArg> for conversion::ParseErrorPolicy {
    fn from(arg: ParseErrorArg) -> Self {
        match arg {
            ParseErrorArg::Abort => conversion::ParseErrorPolicy::Abort,
            ParseErrorArg::Skip => conversion::ParseErrorPolicy::SkipAndWarn,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Human-readable summary.
    Text,
    /// A single JSON document on stdout, for programmatic use.
    Json,
}

/// Machine-readable summary printed with `--report json`.
#[derive(Serialize)]
struct JsonSummary<'a> {
    conversion: &'a conversion::ConversionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<JsonValidation<'a>>,
}

#[derive(Serialize)]
struct JsonValidation<'a> {
    passed: bool,
    error_count: usize,
    warning_count: usize,
    issues: &'a [validation::ValidationIssue],
}

/// Run the voc2vott CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Voc2VottError> {
    let cli = Cli::parse();
    let text = cli.report == ReportFormat::Text;

    let current_dir = || std::env::current_dir().map_err(Voc2VottError::Io);
    let input_root = match cli.in_path {
        Some(path) => path,
        None => current_dir()?,
    };
    let output_dir = match cli.out_path {
        Some(path) => path,
        None => current_dir()?,
    };

    if text {
        println!();
        println!(
            "Converting Pascal VOC dataset located at {} ...",
            input_root.display()
        );
        println!();
    }

    let opts = conversion::ConvertOptions {
        input_root,
        output_dir,
        project_name: cli.name,
        template: cli.template,
        on_parse_error: cli.on_parse_error.into(),
        seed: cli.seed,
        show_progress: !cli.quiet,
    };
    let result = conversion::convert(&opts)?;

    let validate_opts = validation::ValidateOptions { strict: cli.strict };
    let validation_report = cli
        .validate
        .then(|| validation::validate_conversion(&result.tags, &result.documents));

    match cli.report {
        ReportFormat::Json => {
            let summary = JsonSummary {
                conversion: &result.report,
                validation: validation_report.as_ref().map(|report| JsonValidation {
                    passed: validation_passed(report, &validate_opts),
                    error_count: report.error_count(),
                    warning_count: report.warning_count(),
                    issues: &report.issues,
                }),
            };
            let json =
                serde_json::to_string_pretty(&summary).map_err(Voc2VottError::ReportSerialize)?;
            println!("{json}");
        }
        ReportFormat::Text => {
            println!("Conversion complete!");
            print!("{}", result.report);
            println!(
                "VoTT project file and annotations saved to {}",
                result.report.output_dir.display()
            );
            if let Some(report) = &validation_report {
                println!();
                print!("{}", report);
            }
        }
    }

    match validation_report {
        Some(report) => check_validation(report, &validate_opts),
        None => Ok(()),
    }
}

fn validation_passed(
    report: &validation::ValidationReport,
    opts: &validation::ValidateOptions,
) -> bool {
    if opts.strict {
        report.is_ok_strict()
    } else {
        report.is_ok()
    }
}

/// Turn a failed validation pass into the CLI's error.
fn check_validation(
    report: validation::ValidationReport,
    opts: &validation::ValidateOptions,
) -> Result<(), Voc2VottError> {
    if validation_passed(&report, opts) {
        Ok(())
    } else {
        Err(Voc2VottError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    }
}
