//! Preview command - show parsed records without writing a file

use std::path::PathBuf;

use anyhow::Result;
use cartola_core::{ProcessReport, RecordKind};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment};

use crate::output;

use super::{get_context, resolve_password};

pub fn run(pdf: PathBuf, password: Option<String>, limit: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let password = resolve_password(password)?;
    let report = ctx.statement_service.process_file(&pdf, &password)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_records(&report, limit);
    print_summary(&report);
    print_skipped(&report);
    Ok(())
}

fn print_records(report: &ProcessReport, limit: usize) {
    let mut table = output::create_table();
    table.set_header(vec![
        "Fecha", "Descripción", "Documento", "Cargo", "Abono", "Saldo", "Tipo",
    ]);

    for record in report.document.records().iter().take(limit) {
        let date = match record.date {
            Some(date) => date.format("%d/%m/%Y").to_string(),
            None => record.raw_date.clone(),
        };
        let kind = match record.kind {
            RecordKind::Income => record.kind.label().green().to_string(),
            RecordKind::Expense => record.kind.label().red().to_string(),
            RecordKind::NoMovement => record.kind.label().dimmed().to_string(),
        };
        table.add_row(vec![
            Cell::new(date),
            Cell::new(&record.description),
            Cell::new(&record.document_id),
            Cell::new(output::money(record.charge)).set_alignment(CellAlignment::Right),
            Cell::new(output::money(record.credit)).set_alignment(CellAlignment::Right),
            Cell::new(output::money(record.balance)).set_alignment(CellAlignment::Right),
            Cell::new(kind),
        ]);
    }

    println!("{}", table);
    let total = report.document.len();
    if total > limit {
        output::info(&format!("Showing {} of {} transactions (use --limit)", limit, total));
    }
    println!();
}

fn print_summary(report: &ProcessReport) {
    let summary = report.document.summary();

    println!("{}", "Summary".bold());
    let mut table = output::create_table();
    table.add_row(vec!["Year".to_string(), report.year.to_string()]);
    table.add_row(vec!["Pages".to_string(), report.pages.len().to_string()]);
    table.add_row(vec!["Transactions".to_string(), report.document.len().to_string()]);
    table.add_row(vec!["Income".to_string(), summary.income.to_string()]);
    table.add_row(vec!["Expense".to_string(), summary.expense.to_string()]);
    table.add_row(vec!["No movement".to_string(), summary.no_movement.to_string()]);
    table.add_row(vec!["Net".to_string(), output::money(report.document.net_total())]);
    table.add_row(vec!["Skipped rows".to_string(), report.skipped.len().to_string()]);
    println!("{}", table);

    if report.year.is_fallback() {
        output::warning(&format!("No date found in the statement; assumed year {}", report.year));
    }
    if !report.document.is_sorted_by_date() {
        output::warning("No dates could be parsed; rows are in statement order");
    }
}

fn print_skipped(report: &ProcessReport) {
    if report.skipped.is_empty() {
        return;
    }

    println!();
    println!("{}", "Skipped rows".bold());
    let mut table = output::create_table();
    table.set_header(vec!["Page", "Row", "Reason"]);
    for skipped in &report.skipped {
        table.add_row(vec![
            skipped.page.to_string(),
            skipped.content.clone(),
            skipped.reason.to_string(),
        ]);
    }
    println!("{}", table);
}
