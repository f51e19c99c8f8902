//! bv2nii: BrainVoyager to NIfTI-1 converter.
//!
//! bv2nii converts BrainVoyager anatomical volumes (VMR, V16) and functional
//! runs (FMR with STC data) to NIfTI-1 and back. NIfTI is the hub: every
//! conversion has NIfTI on exactly one side.
//!
//! # Modules
//!
//! - [`volume`]: voxel buffers, extents, element kinds and the conversion matrix
//! - [`native`]: BrainVoyager file readers and writers
//! - [`container`]: NIfTI-1 reading and writing
//! - [`bridge`]: translation between native volumes and NIfTI images
//! - [`conversion`]: request planning, the conversion pipeline and reports
//! - [`inspect`]: file summaries
//! - [`error`]: error types for bv2nii operations

pub mod bridge;
pub mod container;
pub mod conversion;
pub mod error;
pub mod inspect;
pub mod native;
pub mod volume;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use conversion::{ConversionRequest, Format};
pub use error::Bv2NiiError;

/// The bv2nii CLI application.
#[derive(Parser)]
#[command(name = "bv2nii")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert between a BrainVoyager format and NIfTI-1.
    Convert(ConvertArgs),
    /// Summarize a VMR, V16, FMR or NIfTI file.
    Inspect(InspectArgs),
}

/// File formats accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Vmr,
    V16,
    Fmr,
    #[value(aliases = ["nii", "nii.gz"])]
    Nifti,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Vmr => Format::Vmr,
            FormatArg::V16 => Format::V16,
            FormatArg::Fmr => Format::Fmr,
            FormatArg::Nifti => Format::Nifti,
        }
    }
}

/// How a report is printed.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input file.
    input: PathBuf,

    /// Output file. `.nii.gz` output is gzip-compressed.
    #[arg(short, long)]
    output: PathBuf,

    /// Input format (inferred from the extension if omitted).
    #[arg(long, value_enum)]
    from: Option<FormatArg>,

    /// Output format (inferred from the extension if omitted).
    #[arg(long, value_enum)]
    to: Option<FormatArg>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// File to inspect.
    input: PathBuf,

    /// Input format (inferred from the extension if omitted).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Output format for the report.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    output: ReportFormat,
}

/// Run the bv2nii CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Bv2NiiError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("bv2nii {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("BrainVoyager VMR/V16/FMR to NIfTI-1 converter.");
            println!();
            println!("Run 'bv2nii --help' for usage information.");
            Ok(())
        }
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when run() is called twice in
    // one process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_convert(args: ConvertArgs) -> Result<(), Bv2NiiError> {
    let source_format = match args.from {
        Some(format) => format.into(),
        None => Format::from_path(&args.input)?,
    };
    let destination_format = match args.to {
        Some(format) => format.into(),
        None => Format::from_path(&args.output)?,
    };
    let request = ConversionRequest::new(
        args.input,
        source_format,
        args.output,
        destination_format,
    );

    let report = conversion::convert(&request)?;

    match args.report {
        ReportFormat::Json => println!("{}", to_json(&report)?),
        ReportFormat::Text => {
            println!(
                "Converted {} ({}) -> {} ({})",
                request.source.display(),
                request.source_format,
                request.destination.display(),
                request.destination_format
            );
            print!("{}", report);
        }
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<(), Bv2NiiError> {
    let report = inspect::inspect_file(&args.input, args.format.map(Format::from))?;
    match args.output {
        ReportFormat::Json => println!("{}", to_json(&report)?),
        ReportFormat::Text => print!("{}", report),
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, Bv2NiiError> {
    serde_json::to_string_pretty(value).map_err(|e| Bv2NiiError::Io(e.into()))
}
