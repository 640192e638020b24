//! Statement service - unlock, process, export

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{KindSummary, ProcessReport, StatementYear};
use crate::ports::{Decryptor, ExportFormat, RecordExporter};

use super::StatementProcessor;

/// Result of converting one statement
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub output: PathBuf,
    pub format: ExportFormat,
    pub year: StatementYear,
    pub records: usize,
    pub skipped: usize,
    pub summary: KindSummary,
    pub net_total: Decimal,
}

/// Runs the processor over locked statements
pub struct StatementService<D: Decryptor> {
    decryptor: D,
    processor: StatementProcessor,
}

impl<D: Decryptor> StatementService<D> {
    pub fn new(decryptor: D, processor: StatementProcessor) -> Self {
        Self { decryptor, processor }
    }

    /// Unlock and process a statement without exporting it
    ///
    /// The decrypted document, and any temporary copy behind it, is dropped
    /// before this returns.
    pub fn process_file(&self, locked: &Path, password: &str) -> Result<ProcessReport> {
        let document = self.decryptor.unlock(locked, password)?;
        debug!(path = %locked.display(), "statement unlocked");
        self.processor.process(&document)
    }

    /// Unlock a statement and report only its year
    pub fn infer_year(&self, locked: &Path, password: &str) -> Result<StatementYear> {
        let document = self.decryptor.unlock(locked, password)?;
        self.processor.infer_year(&document)
    }

    /// Unlock, process and write the statement to `output`
    ///
    /// The spreadsheet is written to a temporary file next to `output` and
    /// only moved into place once the write succeeded.
    pub fn convert(
        &self,
        locked: &Path,
        password: &str,
        exporter: &dyn RecordExporter,
        output: &Path,
    ) -> Result<ConvertResult> {
        let report = self.process_file(locked, password)?;
        let rows = report.document.export_rows();

        let parent = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let staged = tempfile::Builder::new()
            .prefix(".cartola-")
            .suffix(&format!(".{}", exporter.format().extension()))
            .tempfile_in(parent)?;

        exporter.write(&rows, staged.path())?;
        staged.persist(output).map_err(|e| Error::Io(e.error))?;

        info!(
            output = %output.display(),
            format = %exporter.format(),
            records = rows.len(),
            "statement exported"
        );

        Ok(ConvertResult {
            output: output.to_path_buf(),
            format: exporter.format(),
            year: report.year,
            records: rows.len(),
            skipped: report.skipped.len(),
            summary: report.document.summary(),
            net_total: report.document.net_total(),
        })
    }
}
