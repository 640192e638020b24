//! CSV exporter

use std::path::Path;

use crate::domain::result::{Error, Result};
use crate::domain::{ExportRow, EXPORT_HEADERS};
use crate::ports::{ExportFormat, RecordExporter};

/// Writes a header line plus one line per record
///
/// Amounts keep their decimal point; dates use `date_format` (chrono
/// syntax) or the raw statement text when undated.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    date_format: String,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

impl CsvExporter {
    fn record(&self, row: &ExportRow) -> [String; 8] {
        let date = match row.date {
            Some(date) => date.format(&self.date_format).to_string(),
            None => row.raw_date.clone(),
        };
        [
            date,
            row.description.clone(),
            row.net_amount.to_string(),
            row.charge.to_string(),
            row.credit.to_string(),
            row.balance.to_string(),
            row.document_id.clone(),
            row.kind.label().to_string(),
        ]
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::export(e.to_string())
}

impl RecordExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write(&self, rows: &[ExportRow], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;

        writer.write_record(EXPORT_HEADERS).map_err(csv_error)?;
        for row in rows {
            writer.write_record(self.record(row)).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}
