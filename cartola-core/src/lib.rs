//! Cartola Core - bank statement PDF parsing
//!
//! Turns password-protected Scotiabank "cartola" PDFs into ordered
//! transaction records, following hexagonal architecture:
//!
//! - **domain**: Records, raw rows, statement year, processing report
//! - **ports**: Trait definitions for PDF access and export
//! - **services**: Year inference, row extraction, normalization, assembly
//! - **adapters**: Concrete implementations (lopdf, XLSX, CSV, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;

use adapters::csv_export::CsvExporter;
use adapters::pdf::LopdfDecryptor;
use adapters::xlsx::XlsxExporter;
use config::Config;
use ports::{ExportFormat, RecordExporter};
use services::{StatementProcessor, StatementService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Result};
pub use domain::{
    Document, ExportRow, KindSummary, ProcessReport, RecordKind, SkipReason, SkippedRow,
    StatementYear, TransactionRecord, YearSource,
};
pub use services::ConvertResult;

/// Main context for cartola operations
///
/// Holds the loaded configuration and the PDF-backed statement service.
pub struct CartolaContext {
    pub config: Config,
    pub statement_service: StatementService<LopdfDecryptor>,
}

impl CartolaContext {
    /// Create a context from the settings in `config_dir`
    pub fn new(config_dir: &Path) -> Result<Self> {
        let config = Config::load(config_dir)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let processor = StatementProcessor::new(&config);
        Self {
            statement_service: StatementService::new(LopdfDecryptor, processor),
            config,
        }
    }

    /// Exporter for `format`, configured from settings
    pub fn exporter_for(&self, format: ExportFormat) -> Box<dyn RecordExporter> {
        match format {
            ExportFormat::Xlsx => Box::new(XlsxExporter::new(
                self.config.sheet_name.clone(),
                self.config.date_format.clone(),
            )),
            ExportFormat::Csv => Box::new(CsvExporter::default()),
        }
    }
}
