//! Cartola CLI - bank statement PDFs to spreadsheets

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use cartola_core::ports::ExportFormat;
use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod logging;
mod output;

use commands::config::ConfigChanges;
use commands::{config, convert, preview, year};

/// Cartola - turn password-protected bank statements into spreadsheets
#[derive(Parser)]
#[command(name = "cartola", version, about, long_about = None)]
struct Cli {
    /// Log more to stderr (-v warn, -vv info, -vvv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Write a debug log to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a statement PDF into a spreadsheet
    Convert {
        /// Path to the statement PDF
        pdf: PathBuf,
        /// PDF password (falls back to CARTOLA_PDF_PASSWORD, then a prompt)
        #[arg(short, long)]
        password: Option<String>,
        /// Output file (default: next to the PDF)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format: xlsx or csv
        #[arg(long)]
        format: Option<ExportFormat>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show parsed transactions without writing a file
    Preview {
        /// Path to the statement PDF
        pdf: PathBuf,
        /// PDF password
        #[arg(short, long)]
        password: Option<String>,
        /// Maximum rows to show
        #[arg(long, default_value_t = 25)]
        limit: usize,
        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the year the statement dates will use
    Year {
        /// Path to the statement PDF
        pdf: PathBuf,
        /// PDF password
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show settings, or change them with the flags below
    Config {
        /// Year used when a statement names none
        #[arg(long, value_parser = clap::value_parser!(i32).range(1000..=9999))]
        fallback_year: Option<i32>,
        /// Default output format: xlsx or csv
        #[arg(long)]
        format: Option<ExportFormat>,
        /// Worksheet name for XLSX output
        #[arg(long)]
        sheet_name: Option<String>,
        /// Excel number format for the date column
        #[arg(long)]
        date_format: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        output::error(&format!("{:#}", e));
        return ExitCode::FAILURE;
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert { pdf, password, output, format, json } => {
            convert::run(pdf, password, output, format, json)
        }
        Commands::Preview { pdf, password, limit, json } => {
            preview::run(pdf, password, limit, json)
        }
        Commands::Year { pdf, password, json } => year::run(pdf, password, json),
        Commands::Config { fallback_year, format, sheet_name, date_format, json } => {
            let changes = ConfigChanges {
                fallback_year,
                default_format: format,
                sheet_name,
                date_format,
            };
            config::run(changes, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "cartola", "-vv", "convert", "enero.pdf", "-p", "clave", "--format", "csv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert { pdf, password, format, .. } => {
                assert_eq!(pdf, PathBuf::from("enero.pdf"));
                assert_eq!(password.as_deref(), Some("clave"));
                assert_eq!(format, Some(ExportFormat::Csv));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_config_rejects_short_year() {
        assert!(Cli::try_parse_from(["cartola", "config", "--fallback-year", "24"]).is_err());

        let cli = Cli::try_parse_from(["cartola", "config", "--fallback-year", "2024"]).unwrap();
        match cli.command {
            Commands::Config { fallback_year, format, .. } => {
                assert_eq!(fallback_year, Some(2024));
                assert_eq!(format, None);
            }
            _ => panic!("expected config"),
        }
    }
}
