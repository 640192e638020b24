//! XLSX exporter backed by rust_xlsxwriter

use std::path::Path;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::domain::result::{Error, Result};
use crate::domain::{ExportRow, EXPORT_HEADERS};
use crate::ports::{ExportFormat, RecordExporter};

const COLUMN_WIDTHS: [f64; 8] = [12.0, 40.0, 14.0, 14.0, 14.0, 16.0, 14.0, 16.0];

/// Writes one worksheet with a frozen header row
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    sheet_name: String,
    date_format: String,
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new("Movimientos", "dd/mm/yyyy")
    }
}

impl XlsxExporter {
    pub fn new(sheet_name: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            date_format: date_format.into(),
        }
    }
}

fn xlsx_error(e: XlsxError) -> Error {
    Error::export(e.to_string())
}

fn write_amount(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Decimal,
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value.to_f64() {
        Some(number) => worksheet.write_number_with_format(row, col, number, format).map(|_| ()),
        None => worksheet.write_string(row, col, value.to_string()).map(|_| ()),
    }
}

impl RecordExporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn write(&self, rows: &[ExportRow], path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name).map_err(xlsx_error)?;

        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xEC111A))
            .set_font_color(Color::RGB(0xFFFFFF));
        let date_format = Format::new().set_num_format(&self.date_format);
        let amount_format = Format::new()
            .set_num_format("#,##0.00")
            .set_align(FormatAlign::Right);

        for (col, &width) in COLUMN_WIDTHS.iter().enumerate() {
            worksheet.set_column_width(col as u16, width).map_err(xlsx_error)?;
        }
        for (col, header) in EXPORT_HEADERS.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(xlsx_error)?;
        }

        for (index, export) in rows.iter().enumerate() {
            let row = (index + 1) as u32;

            match export.date {
                Some(date) => {
                    let cell = ExcelDateTime::from_ymd(
                        date.year() as u16,
                        date.month() as u8,
                        date.day() as u8,
                    )
                    .map_err(xlsx_error)?;
                    worksheet
                        .write_datetime_with_format(row, 0, &cell, &date_format)
                        .map_err(xlsx_error)?;
                }
                None => {
                    worksheet.write_string(row, 0, &export.raw_date).map_err(xlsx_error)?;
                }
            }
            worksheet.write_string(row, 1, &export.description).map_err(xlsx_error)?;
            write_amount(worksheet, row, 2, export.net_amount, &amount_format).map_err(xlsx_error)?;
            write_amount(worksheet, row, 3, export.charge, &amount_format).map_err(xlsx_error)?;
            write_amount(worksheet, row, 4, export.credit, &amount_format).map_err(xlsx_error)?;
            write_amount(worksheet, row, 5, export.balance, &amount_format).map_err(xlsx_error)?;
            worksheet.write_string(row, 6, &export.document_id).map_err(xlsx_error)?;
            worksheet.write_string(row, 7, export.kind.label()).map_err(xlsx_error)?;
        }

        worksheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;
        workbook.save(path).map_err(xlsx_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordKind;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_writes_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movimientos.xlsx");
        let rows = vec![
            ExportRow {
                date: NaiveDate::from_ymd_opt(2025, 1, 3),
                raw_date: "03/ENE/2025".to_string(),
                description: "PAGO TARJETA".to_string(),
                net_amount: Decimal::new(-10000, 0),
                charge: Decimal::new(10000, 0),
                credit: Decimal::ZERO,
                balance: Decimal::new(90000, 0),
                document_id: "1234".to_string(),
                kind: RecordKind::Expense,
            },
            ExportRow {
                date: None,
                raw_date: "31/FEB/2025".to_string(),
                description: "AJUSTE".to_string(),
                net_amount: Decimal::ZERO,
                charge: Decimal::ZERO,
                credit: Decimal::ZERO,
                balance: Decimal::new(90000, 0),
                document_id: "0".to_string(),
                kind: RecordKind::NoMovement,
            },
        ];

        XlsxExporter::default().write(&rows, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_invalid_sheet_name_is_export_error() {
        let dir = TempDir::new().unwrap();
        let exporter = XlsxExporter::new("bad[name]", "dd/mm/yyyy");
        let err = exporter.write(&[], &dir.path().join("x.xlsx")).unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }
}
