use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use dmlextract_core::{
    DisplayDepth, ExtractionReport, OutputOptions, OutputStrategy, Progress, extract_dml_file,
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("DMLEXTRACT_BUILD_COMMIT"),
    ", ",
    env!("DMLEXTRACT_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "dmlextract")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Extract reference and reconstructed difference images from a .dml frame file.",
    long_about = None,
    after_help = "Examples:\n  dmlextract capture.dml out/\n  dmlextract capture.dml out/ --save_raw_npy 0\n  dmlextract capture.dml out/ --mode record --save_all_imgs 1"
)]
struct Cli {
    /// Path to a .dml file
    dml_path: PathBuf,

    /// Existing output directory
    out_path: PathBuf,

    /// Output layout
    #[arg(long, value_enum, default_value_t = OutputMode::PerFile)]
    mode: OutputMode,

    /// per-file mode: 1 also saves all raw images as one packed all_raw.npy (default 1)
    #[arg(long = "save_raw_npy", value_name = "0|1", value_parser = clap::value_parser!(u8).range(0..=1))]
    save_raw_npy: Option<u8>,

    /// record mode: 1 also saves every normalized image as an indexed PNG (default 0)
    #[arg(long = "save_all_imgs", value_name = "0|1", value_parser = clap::value_parser!(u8).range(0..=1))]
    save_all_imgs: Option<u8>,

    /// Bit depth of the PNG images
    #[arg(long, value_enum, default_value_t = Depth::Eight)]
    depth: Depth,

    /// Also write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Pretty-print the JSON run report
    #[arg(long, requires = "report")]
    pretty: bool,

    /// Suppress progress output
    #[arg(long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Indexed PNGs with the reference at 00000.png, plus all_raw.npy
    PerFile,
    /// reference_image.png plus extracted_data.json
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Depth {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cmd_extract(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

fn cmd_extract(cli: Cli) -> Result<(), CliError> {
    validate_input_file(&cli.dml_path)?;
    validate_output_dir(&cli.out_path)?;
    if let Some(report) = cli.report.as_ref() {
        validate_report_path(report, &cli.dml_path)?;
    }
    let options = output_options(&cli)?;

    let quiet = cli.quiet;
    let input = cli.dml_path.clone();
    let rep = extract_dml_file(&cli.dml_path, &cli.out_path, options, |progress| {
        if quiet {
            return;
        }
        match progress {
            Progress::Started { frames } => {
                println!("File {} contains {} frames.", input.display(), frames)
            }
            Progress::ImageSaved { index } => println!("Saving image {}.", index),
        }
    })
    .with_context(|| format!("Extraction failed for {}", cli.dml_path.display()))?;

    if let Some(report_path) = cli.report.as_ref() {
        write_report(rep.clone(), report_path, cli.pretty)?;
    }
    if !quiet {
        eprintln!(
            "OK: {} files written -> {}",
            rep.outputs.len(),
            cli.out_path.display()
        );
    }
    Ok(())
}

fn output_options(cli: &Cli) -> Result<OutputOptions, CliError> {
    let strategy = match cli.mode {
        OutputMode::PerFile => {
            if cli.save_all_imgs.is_some() {
                return Err(CliError::new(
                    "--save_all_imgs only applies to record mode",
                    Some("add --mode record, or use --save_raw_npy".to_string()),
                ));
            }
            OutputStrategy::PerFileAndRawArray {
                save_raw_array: cli.save_raw_npy.unwrap_or(1) == 1,
            }
        }
        OutputMode::Record => {
            if cli.save_raw_npy.is_some() {
                return Err(CliError::new(
                    "--save_raw_npy only applies to per-file mode",
                    Some("drop --mode record, or use --save_all_imgs".to_string()),
                ));
            }
            OutputStrategy::ReferencePlusRecord {
                save_all_images: cli.save_all_imgs.unwrap_or(0) == 1,
            }
        }
    };
    let depth = match cli.depth {
        Depth::Eight => DisplayDepth::Eight,
        Depth::Sixteen => DisplayDepth::Sixteen,
    };
    Ok(OutputOptions { strategy, depth })
}

fn write_report(mut rep: ExtractionReport, path: &Path, pretty: bool) -> Result<(), CliError> {
    if let Ok(now) = OffsetDateTime::now_utc().format(&Rfc3339) {
        rep.generated_at = now;
    }
    let json = if pretty {
        serde_json::to_string_pretty(&rep)
    } else {
        serde_json::to_string(&rep)
    }
    .context("JSON serialization failed")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create report directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the path to a .dml frame file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the path to a .dml frame file".to_string()),
        ));
    }
    Ok(())
}

fn validate_output_dir(out: &Path) -> Result<(), CliError> {
    if !out.is_dir() {
        return Err(CliError::new(
            format!("output directory not found: {}", out.display()),
            Some("create the directory first".to_string()),
        ));
    }
    Ok(())
}

fn validate_report_path(report: &Path, input: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let same_as_input = fs::canonicalize(report)
        .map(|report_abs| report_abs == input_abs)
        .unwrap_or(false);
    if same_as_input {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different report path".to_string()),
        ));
    }
    Ok(())
}
