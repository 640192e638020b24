//! End-to-end statement processing tests
//!
//! These drive the processor through the in-memory document adapter and
//! the exporters, so no real PDF is needed.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tempfile::TempDir;

use cartola_core::adapters::csv_export::CsvExporter;
use cartola_core::adapters::memory::{InMemoryDecryptor, InMemoryDocument};
use cartola_core::adapters::xlsx::XlsxExporter;
use cartola_core::domain::{net_amount, StrategyKind};
use cartola_core::ports::Table;
use cartola_core::services::{StatementProcessor, StatementService};
use cartola_core::{Error, RecordKind, SkipReason, YearSource};

const PASSWORD: &str = "12345678-9";

fn table(rows: &[&[&str]]) -> Table {
    rows.iter().map(|cells| InMemoryDocument::row(cells)).collect()
}

/// A two-page statement: one page with a detected table, one plain text
fn sample_statement() -> InMemoryDocument {
    let movements = table(&[
        &["FECHA", "DESCRIPCION", "DOCUMENTO", "CARGOS", "ABONOS", "SALDO"],
        &["3/ENE", "PAGO TARJETA", "1234", "10.000,00", "0", "90.000,00"],
        &["4/ENE", "TRANSFERENCIA RECIBIDA", "7.788", "", "250.000", "340.000,00"],
        &["5/ENE", "CUENTA CORRIENTE", "99", "1,2,3", "", ""],
    ]);

    InMemoryDocument::new()
        .with_page(Some("ESTADO DE CUENTA\nPERIODO HASTA 31/DIC/2024"), vec![movements])
        .with_text_page(
            "DETALLE DE MOVIMIENTOS\n\
             12/ENE  DEPOSITO CAJA  4411  0  5.000,00  79.500\n\
             10/ENE  COMPRA SUPERMERCADO  5521  15.000,00  75.000,00\n\
             11/ENE  COMPRA 500 FARMACIA  1500  500  74.500\n\
             07/ENE  COMISION  S/N  2.500  90.000\n\
             08/ENE  SIN SALDO\n",
        )
}

#[test]
fn test_table_row_round_trip() {
    let document = InMemoryDocument::new().with_page(
        None,
        vec![table(&[&["3/ENE", "PAGO TARJETA", "1234", "10.000,00", "0", "90.000,00"]])],
    );

    let report = StatementProcessor::default().process(&document).unwrap();
    assert_eq!(report.year.year, 2025);
    assert_eq!(report.year.source, YearSource::Fallback);

    let records = report.document.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 1, 3));
    assert_eq!(record.raw_date, "03/ENE/2025");
    assert_eq!(record.description, "PAGO TARJETA");
    assert_eq!(record.document_id, "1234");
    assert_eq!(record.charge, Decimal::new(10000, 0));
    assert_eq!(record.credit, Decimal::ZERO);
    assert_eq!(record.net_amount, Decimal::new(-10000, 0));
    assert_eq!(record.balance, Decimal::new(90000, 0));
    assert_eq!(record.kind, RecordKind::Expense);
}

#[test]
fn test_mixed_strategies_sorted_by_date() {
    let report = StatementProcessor::default()
        .process(&sample_statement())
        .unwrap();

    assert_eq!(report.year.year, 2024);
    assert_eq!(report.pages[0].strategy, StrategyKind::Table);
    assert_eq!(report.pages[1].strategy, StrategyKind::Text);

    let descriptions: Vec<&str> = report
        .document
        .records()
        .iter()
        .map(|r| r.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "PAGO TARJETA",
            "TRANSFERENCIA RECIBIDA",
            "COMPRA SUPERMERCADO",
            "COMPRA 500 FARMACIA",
            "DEPOSITO CAJA",
        ]
    );
    assert!(report.document.is_sorted_by_date());

    let transfer = &report.document.records()[1];
    assert_eq!(transfer.document_id, "7788");
    assert_eq!(transfer.credit, Decimal::new(250000, 0));
    assert_eq!(transfer.kind, RecordKind::Income);
}

#[test]
fn test_lone_amount_placement() {
    let report = StatementProcessor::default()
        .process(&sample_statement())
        .unwrap();
    let records = report.document.records();

    let purchase = records.iter().find(|r| r.document_id == "5521").unwrap();
    assert_eq!(purchase.charge, Decimal::new(15000, 0));
    assert_eq!(purchase.credit, Decimal::ZERO);

    // The amount text also appears in the description and document id
    let pharmacy = records.iter().find(|r| r.document_id == "1500").unwrap();
    assert_eq!(pharmacy.charge, Decimal::new(500, 0));
    assert_eq!(pharmacy.credit, Decimal::ZERO);
    assert_eq!(pharmacy.balance, Decimal::new(74500, 0));

    let deposit = records.iter().find(|r| r.document_id == "4411").unwrap();
    assert_eq!(deposit.credit, Decimal::new(5000, 0));
    assert_eq!(deposit.charge, Decimal::ZERO);

    assert!(report
        .skipped
        .iter()
        .any(|s| s.reason == SkipReason::InsufficientNumbers { found: 1 }));
}

#[test]
fn test_skipped_rows_are_reported() {
    let report = StatementProcessor::default()
        .process(&sample_statement())
        .unwrap();

    let reasons: Vec<&SkipReason> = report.skipped.iter().map(|s| &s.reason).collect();
    assert_eq!(reasons.len(), 3);
    assert!(matches!(
        reasons[0],
        SkipReason::InvalidAmount { field: "charge", .. }
    ));
    assert_eq!(report.skipped[0].page, 1);
    assert_eq!(report.skipped[0].strategy, StrategyKind::Table);
    assert!(reasons.contains(&&SkipReason::TooFewParts { found: 1 }));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["skipped"][0]["reason"], "invalid_amount");
    assert_eq!(json["year"]["source"], "dated_pattern");
}

#[test]
fn test_record_invariants_hold() {
    let report = StatementProcessor::default()
        .process(&sample_statement())
        .unwrap();

    for record in report.document.records() {
        assert!(record.charge.is_zero() || record.credit.is_zero());
        assert!(!record.charge.is_sign_negative());
        assert!(!record.credit.is_sign_negative());
        assert_eq!(record.net_amount, net_amount(record.charge, record.credit));
        assert_eq!(record.kind, RecordKind::from_net(record.net_amount));
    }
}

#[test]
fn test_both_amounts_rejected() {
    let document = InMemoryDocument::new().with_page(
        None,
        vec![table(&[
            &["3/ENE", "AJUSTE", "1", "100", "200", "1.000"],
            &["4/ENE", "PAGO", "2", "100", "0", "900"],
        ])],
    );

    let report = StatementProcessor::default().process(&document).unwrap();
    assert_eq!(report.document.len(), 1);
    assert_eq!(report.skipped[0].reason, SkipReason::ConflictingAmounts);
}

#[test]
fn test_no_rows_is_no_transactions() {
    let document = InMemoryDocument::new()
        .with_text_page("RESUMEN\nSALDO ANTERIOR  100.000")
        .with_blank_page();

    let err = StatementProcessor::default().process(&document).unwrap_err();
    assert!(matches!(err, Error::NoTransactions));
}

#[test]
fn test_undated_rows_keep_extraction_order() {
    let document = InMemoryDocument::new().with_page(
        None,
        vec![table(&[
            &["9/XYZ", "SEGUNDO", "2", "500", "0", "1.500"],
            &["1/QRS", "PRIMERO", "1", "0", "1.000", "2.000"],
        ])],
    );

    let report = StatementProcessor::default().process(&document).unwrap();
    let records = report.document.records();
    assert_eq!(records.len(), 2);
    assert!(!report.document.is_sorted_by_date());
    assert_eq!(records[0].description, "SEGUNDO");
    assert_eq!(records[0].date, None);
    assert_eq!(records[0].raw_date, "09/XYZ/2025");
    assert_eq!(records[1].description, "PRIMERO");
}

#[test]
fn test_undated_rows_dropped_when_some_dated() {
    let document = InMemoryDocument::new().with_page(
        None,
        vec![table(&[
            &["9/XYZ", "ILEGIBLE", "2", "500", "0", "1.500"],
            &["2/FEB", "VALIDO", "1", "0", "1.000", "2.000"],
        ])],
    );

    let report = StatementProcessor::default().process(&document).unwrap();
    assert_eq!(report.document.len(), 1);
    assert_eq!(report.document.records()[0].description, "VALIDO");
}

#[test]
fn test_year_from_period_marker_and_fallback() {
    let line = "03/ENE  PAGO  1  100  0  900";

    let marked = InMemoryDocument::new()
        .with_blank_page()
        .with_text_page(&format!("PERIODO DESDE 01-12-2023\n{}", line));
    let report = StatementProcessor::default().process(&marked).unwrap();
    assert_eq!(report.year.year, 2023);
    assert_eq!(report.year.source, YearSource::PeriodMarker);
    assert_eq!(report.year.page, Some(2));

    let plain = InMemoryDocument::new().with_text_page(line);
    let report = StatementProcessor::with_fallback_year(2019)
        .process(&plain)
        .unwrap();
    assert_eq!(report.year.year, 2019);
    assert!(report.year.is_fallback());
    assert_eq!(report.document.records()[0].date, NaiveDate::from_ymd_opt(2019, 1, 3));
}

#[test]
fn test_convert_to_csv_and_xlsx() {
    let dir = TempDir::new().unwrap();
    let service = StatementService::new(
        InMemoryDecryptor::new(PASSWORD, sample_statement()),
        StatementProcessor::default(),
    );
    let locked = Path::new("cartola.pdf");

    let csv_path = dir.path().join("movimientos.csv");
    let result = service
        .convert(locked, PASSWORD, &CsvExporter::default(), &csv_path)
        .unwrap();
    assert_eq!(result.records, 5);
    assert_eq!(result.skipped, 3);
    assert_eq!(result.summary.income, 2);
    assert_eq!(result.summary.expense, 3);
    assert_eq!(result.net_total, Decimal::new(229500, 0));

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Fecha,Descripción,Monto,Cargo,Abono,Saldo,Documento,Tipo");
    assert!(lines[1].starts_with("03/01/2024,PAGO TARJETA,"));
    assert_eq!(lines.len(), 6);

    let xlsx_path = dir.path().join("movimientos.xlsx");
    service
        .convert(locked, PASSWORD, &XlsxExporter::default(), &xlsx_path)
        .unwrap();
    assert!(std::fs::read(&xlsx_path).unwrap().starts_with(b"PK"));
}

#[test]
fn test_convert_with_wrong_password() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("movimientos.xlsx");
    let service = StatementService::new(
        InMemoryDecryptor::new(PASSWORD, sample_statement()),
        StatementProcessor::default(),
    );

    let err = service
        .convert(Path::new("cartola.pdf"), "incorrecta", &XlsxExporter::default(), &output)
        .unwrap_err();
    assert!(matches!(err, Error::IncorrectPassword));
    assert!(!output.exists());
}
