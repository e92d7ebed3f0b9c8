// pickrecon - reconcile Full Circle and WMS pick reports

mod exit_codes;
mod logging;
mod report;
mod sheets;
mod views;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use pickrecon_config::Settings;
use pickrecon_recon::{ItemSource, ReconError, ReportId, ReportType};
use pickrecon_store::SqliteStore;

use exit_codes::{recon_exit_code, EXIT_EXPORT, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "pickrecon")]
#[command(about = "Reconcile Full Circle and WMS pick reports")]
#[command(version)]
struct Cli {
    /// SQLite database (overrides the settings file)
    #[arg(long, global = true, env = "PICKRECON_DB")]
    db: Option<PathBuf>,

    /// Settings file (default: ~/.config/pickrecon/settings.toml)
    #[arg(long, global = true, env = "PICKRECON_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify which known report layout a spreadsheet uses
    #[command(after_help = "\
Examples:
  pickrecon classify pick_slip.xlsx
  pickrecon classify wms_open_orders.csv")]
    Classify {
        /// Spreadsheet (xlsx, xls, xlsb, ods, csv, tsv)
        file: PathBuf,
    },

    /// Print the pick numbers a spreadsheet contributes
    Extract {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Create, list, inspect, close and delete reports
    #[command(subcommand)]
    Report(report::ReportCommands),

    /// Add a spreadsheet's pick numbers to an open report
    #[command(after_help = "\
Examples:
  pickrecon report create --type shipped --date 2026-01-20
  pickrecon upload 1 daily_shipment.xlsx
  pickrecon upload 1 wms_shipped.csv")]
    Upload {
        /// Report id
        report: i64,

        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Show pick numbers present in the authoritative source but absent from the other
    #[command(after_help = "\
Examples:
  pickrecon missing 1
  pickrecon missing 1 --csv missing.csv
  pickrecon missing 1 --save
  pickrecon missing 1 --strict || echo 'picks missing'")]
    Missing {
        /// Report id
        report: i64,

        #[arg(long)]
        json: bool,

        /// Write the missing list as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Write the missing list as an xlsx workbook
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,

        /// Write to the configured export directory in the configured format
        #[arg(long)]
        save: bool,

        /// Exit 1 when anything is missing
        #[arg(long)]
        strict: bool,
    },

    /// Export one source's raw pick numbers as CSV
    Export {
        /// Report id
        report: i64,

        #[arg(value_enum)]
        source: SourceArg,

        /// Output file ("-" for stdout; default: export directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    FullCircle,
    Wms,
}

impl From<SourceArg> for ItemSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::FullCircle => ItemSource::FullCircle,
            SourceArg::Wms => ItemSource::Wms,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Open,
    Shipped,
}

impl From<TypeArg> for ReportType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Open => ReportType::OpenOrders,
            TypeArg::Shipped => ReportType::ShippedOrders,
        }
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Resolved settings plus the database path after `--db` overrides.
pub struct Context {
    pub settings: Settings,
    pub db: PathBuf,
}

impl Context {
    pub fn open_store(&self) -> Result<SqliteStore, CliError> {
        Ok(SqliteStore::open(&self.db)?)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path).map_err(|e| {
            CliError::args(e).with_hint("settings use the [storage], [export] and [logging] tables")
        })?,
        None => Settings::load(),
    };
    logging::init(&settings, cli.verbose);

    let ctx = Context {
        db: cli.db.unwrap_or_else(|| settings.database_path()),
        settings,
    };
    log::debug!("database {}", ctx.db.display());

    match cli.command {
        Commands::Classify { file } => sheets::cmd_classify(&file),
        Commands::Extract { file, json } => sheets::cmd_extract(&file, json),
        Commands::Report(cmd) => report::cmd_report(&ctx, cmd),
        Commands::Upload { report, file, json } => sheets::cmd_upload(&ctx, ReportId(report), &file, json),
        Commands::Missing { report, json, csv, xlsx, save, strict } => {
            views::cmd_missing(&ctx, ReportId(report), json, csv, xlsx, save, strict)
        }
        Commands::Export { report, source, output } => {
            views::cmd_export(&ctx, ReportId(report), source.into(), output)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self { code: EXIT_EXPORT, message: msg.into(), hint: None }
    }

    /// Exit with `code` and print nothing.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::UnknownFormat => Some(
                "expected a Full Circle pick slip or daily shipment report, \
                 or a WMS export with an OrdId or ShippingInfoId column",
            ),
            ReconError::ConstraintViolation { .. } => {
                Some("pass --manual to add another report for the same date")
            }
            ReconError::InvalidTransition { .. } => {
                Some("closed reports are read-only; create a manual report for corrections")
            }
            ReconError::ReportNotFound(_) => Some("run `pickrecon report list` to see report ids"),
            _ => None,
        };
        Self {
            code: recon_exit_code(&err),
            message: err.to_string(),
            hint: hint.map(String::from),
        }
    }
}

pub fn ensure_parent(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| CliError::export(format!("{}: {e}", parent.display()))),
        _ => Ok(()),
    }
}

/// Create an output file, making parent directories as needed.
pub fn create_output(path: &Path) -> Result<File, CliError> {
    ensure_parent(path)?;
    File::create(path).map_err(|e| CliError::export(format!("{}: {e}", path.display())))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::export(e.to_string()))?;
    println!("{text}");
    Ok(())
}
