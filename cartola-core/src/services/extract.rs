//! Row extraction from statement pages
//!
//! Each page is read with one of two strategies, picked once per page:
//! the table strategy when the page yields detected tables, the text
//! strategy otherwise.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::domain::{RawRow, SkipReason, SkippedRow, StrategyKind};
use crate::ports::{Table, TableRow};

use super::disambiguate::{place_amount, AmountColumn, Column, Placement};
use super::normalize::parse_amount;

/// Minimum table cells: date, description, document, charge, credit
const MIN_TABLE_CELLS: usize = 5;

/// Minimum text parts after the date: description, document, balance
const MIN_TEXT_PARTS: usize = 3;

fn table_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})\s*/\s*([A-Z]{3})").expect("valid table date pattern"))
}

fn text_line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})\s*/\s*([A-Z]{3})\s+(.+)").expect("valid text line pattern")
    })
}

fn column_gap_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("valid column gap pattern"))
}

/// Strip thousands separators and turn the decimal comma into a point:
/// `"10.000,50"` becomes `"10000.50"`. Blank input becomes `"0"`.
pub fn normalize_amount_text(raw: &str) -> String {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        "0".to_string()
    } else {
        cleaned
    }
}

/// Split on runs of 2+ whitespace, keeping each column's offset in `text`
fn split_columns(text: &str) -> Vec<Column<'_>> {
    let mut columns = Vec::new();
    let mut start = 0;
    for gap in column_gap_pattern().find_iter(text) {
        columns.push(column_at(text, start, gap.start()));
        start = gap.end();
    }
    columns.push(column_at(text, start, text.len()));
    columns
}

fn column_at(text: &str, start: usize, end: usize) -> Column<'_> {
    let raw = &text[start..end];
    let leading = raw.len() - raw.trim_start().len();
    Column {
        offset: start + leading,
        text: raw.trim(),
    }
}

fn pad_day(day: &str) -> String {
    format!("{:0>2}", day)
}

/// Rows accepted and rejected on one page
#[derive(Debug, Default)]
pub struct PageRows {
    pub rows: Vec<RawRow>,
    pub skipped: Vec<SkippedRow>,
}

/// How a page is read
#[derive(Debug, Clone, Copy)]
pub enum PageStrategy<'a> {
    Table(&'a [Table]),
    Text(Option<&'a str>),
}

impl<'a> PageStrategy<'a> {
    /// Tables win whenever the page has any
    pub fn for_page(text: Option<&'a str>, tables: &'a [Table]) -> Self {
        if tables.is_empty() {
            PageStrategy::Text(text)
        } else {
            PageStrategy::Table(tables)
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            PageStrategy::Table(_) => StrategyKind::Table,
            PageStrategy::Text(_) => StrategyKind::Text,
        }
    }

    /// Extract candidate rows; `page` is the 1-based page number
    pub fn extract(&self, page: usize) -> PageRows {
        let mut out = PageRows::default();
        match self {
            PageStrategy::Table(tables) => {
                for row in tables.iter().flat_map(|table| table.iter()) {
                    extract_table_row(row, page, &mut out);
                }
            }
            PageStrategy::Text(Some(text)) => {
                for line in text.lines() {
                    extract_text_line(line, page, &mut out);
                }
            }
            PageStrategy::Text(None) => {
                debug!(page, "page has neither tables nor text");
            }
        }
        out
    }
}

impl PageRows {
    fn skip(&mut self, page: usize, strategy: StrategyKind, content: String, reason: SkipReason) {
        warn!(page, ?strategy, %content, %reason, "skipping statement row");
        self.skipped.push(SkippedRow {
            page,
            strategy,
            content,
            reason,
        });
    }
}

fn cell(row: &TableRow, index: usize) -> &str {
    row.get(index).and_then(|c| c.as_deref()).unwrap_or("")
}

fn first_invalid<'a>(amounts: &[(&'static str, &'a str)]) -> Option<(&'static str, &'a str)> {
    amounts
        .iter()
        .find(|(_, value)| parse_amount(value).is_none())
        .copied()
}

fn extract_table_row(row: &TableRow, page: usize, out: &mut PageRows) {
    if row.len() < MIN_TABLE_CELLS {
        trace!(page, cells = row.len(), "table row too short");
        return;
    }

    let Some(caps) = table_date_pattern().captures(cell(row, 0).trim()) else {
        trace!(page, "table row without a leading date");
        return;
    };

    let charge = normalize_amount_text(cell(row, 3));
    let credit = normalize_amount_text(cell(row, 4));
    let balance = normalize_amount_text(cell(row, 5));

    if let Some((field, value)) = first_invalid(&[
        ("charge", charge.as_str()),
        ("credit", credit.as_str()),
        ("balance", balance.as_str()),
    ]) {
        let content = row
            .iter()
            .map(|c| c.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" | ");
        let reason = SkipReason::InvalidAmount {
            field,
            value: value.to_string(),
        };
        out.skip(page, StrategyKind::Table, content, reason);
        return;
    }

    out.rows.push(RawRow {
        page,
        source: StrategyKind::Table,
        day: pad_day(&caps[1]),
        month: caps[2].to_string(),
        description: cell(row, 1).trim().to_string(),
        document_id: cell(row, 2).trim().replace('.', ""),
        charge,
        credit,
        balance,
    });
}

fn extract_text_line(line: &str, page: usize, out: &mut PageRows) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let Some(caps) = text_line_pattern().captures(line) else {
        return;
    };
    let remainder = caps[3].trim();
    let columns = split_columns(remainder);
    let parts: Vec<&str> = columns.iter().map(|c| c.text).collect();
    let skip = |out: &mut PageRows, reason| {
        out.skip(page, StrategyKind::Text, line.to_string(), reason)
    };

    if parts.len() < MIN_TEXT_PARTS {
        skip(out, SkipReason::TooFewParts { found: parts.len() });
        return;
    }

    let balance_column = columns[columns.len() - 1];
    let balance = normalize_amount_text(balance_column.text);
    if parse_amount(&balance).is_none() {
        skip(out, SkipReason::InvalidAmount { field: "balance", value: balance });
        return;
    }

    let (charge, credit) = match parts.len() {
        5 => {
            let charge = normalize_amount_text(parts[2]);
            let credit = normalize_amount_text(parts[3]);
            if let Some((field, value)) =
                first_invalid(&[("charge", charge.as_str()), ("credit", credit.as_str())])
            {
                let reason = SkipReason::InvalidAmount {
                    field,
                    value: value.to_string(),
                };
                skip(out, reason);
                return;
            }
            (charge, credit)
        }
        4 => {
            let amount = normalize_amount_text(parts[2]);
            if parse_amount(&amount).is_none() {
                skip(out, SkipReason::InvalidAmount { field: "amount", value: amount });
                return;
            }
            match place_amount(remainder, columns[2], balance_column) {
                Placement::Resolved(AmountColumn::Charge) => (amount, "0".to_string()),
                Placement::Resolved(AmountColumn::Credit) => ("0".to_string(), amount),
                Placement::Insufficient { found } => {
                    skip(out, SkipReason::InsufficientNumbers { found });
                    return;
                }
            }
        }
        found => {
            skip(out, SkipReason::UnexpectedPartCount { found });
            return;
        }
    };

    out.rows.push(RawRow {
        page,
        source: StrategyKind::Text,
        day: pad_day(&caps[1]),
        month: caps[2].to_string(),
        description: parts[0].to_string(),
        document_id: parts[1].replace('.', ""),
        charge,
        credit,
        balance,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    #[test]
    fn test_normalize_amount_text() {
        assert_eq!(normalize_amount_text("10.000,00"), "10000.00");
        assert_eq!(normalize_amount_text(" 1.234.567 "), "1234567");
        assert_eq!(normalize_amount_text(""), "0");
        assert_eq!(normalize_amount_text("12,5"), "12.5");
    }

    #[test]
    fn test_strategy_selection() {
        let tables = vec![vec![row(&["3/ENE", "X", "1", "0", "0"])]];
        assert_eq!(PageStrategy::for_page(Some("text"), &tables).kind(), StrategyKind::Table);
        assert_eq!(PageStrategy::for_page(Some("text"), &[]).kind(), StrategyKind::Text);
    }

    #[test]
    fn test_table_row_is_normalized() {
        let tables = vec![vec![
            row(&["FECHA", "DESCRIPCION", "DOCTO", "CARGO", "ABONO", "SALDO"]),
            row(&["3/ENE", " PAGO TARJETA ", "1.234", "10.000,00", "0", "90.000,00"]),
        ]];
        let out = PageStrategy::Table(&tables).extract(1);

        assert!(out.skipped.is_empty());
        assert_eq!(out.rows.len(), 1);
        let r = &out.rows[0];
        assert_eq!(r.day, "03");
        assert_eq!(r.month, "ENE");
        assert_eq!(r.description, "PAGO TARJETA");
        assert_eq!(r.document_id, "1234");
        assert_eq!(r.charge, "10000.00");
        assert_eq!(r.credit, "0");
        assert_eq!(r.balance, "90000.00");
    }

    #[test]
    fn test_table_row_missing_cells_default_to_zero() {
        let tables = vec![vec![vec![
            Some("15/FEB".to_string()),
            Some("ABONO".to_string()),
            None,
            None,
            Some("5.000".to_string()),
        ]]];
        let out = PageStrategy::Table(&tables).extract(2);

        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].charge, "0");
        assert_eq!(out.rows[0].credit, "5000");
        assert_eq!(out.rows[0].balance, "0");
        assert_eq!(out.rows[0].document_id, "");
        assert_eq!(out.rows[0].page, 2);
    }

    #[test]
    fn test_table_rows_without_date_or_short_are_ignored_silently() {
        let tables = vec![vec![
            row(&["3/ENE", "CORTA", "1"]),
            row(&["TOTAL", "", "", "1.000", "0"]),
        ]];
        let out = PageStrategy::Table(&tables).extract(1);
        assert!(out.rows.is_empty());
        assert!(out.skipped.is_empty());
    }

    #[test]
    fn test_table_row_with_bad_amount_is_skipped() {
        let tables = vec![vec![row(&["4/MAR", "COMPRA", "9", "N/A", "0", "1.000"])]];
        let out = PageStrategy::Table(&tables).extract(1);
        assert!(out.rows.is_empty());
        assert_eq!(out.skipped.len(), 1);
        assert_eq!(
            out.skipped[0].reason,
            SkipReason::InvalidAmount {
                field: "charge",
                value: "N/A".to_string()
            }
        );
    }

    #[test]
    fn test_text_five_parts_map_directly() {
        let text = "FECHA  DESCRIPCION\n07/ABR  TRASPASO  5501  0  250.000,00  340.000,00\n";
        let out = PageStrategy::Text(Some(text)).extract(1);

        assert_eq!(out.rows.len(), 1);
        let r = &out.rows[0];
        assert_eq!(r.day, "07");
        assert_eq!(r.charge, "0");
        assert_eq!(r.credit, "250000.00");
        assert_eq!(r.balance, "340000.00");
        assert_eq!(r.source, StrategyKind::Text);
    }

    #[test]
    fn test_text_four_parts_uses_disambiguation() {
        let text = "3/ENE  PAGO TARJETA  1234  10.000,00  90.000,00";
        let out = PageStrategy::Text(Some(text)).extract(1);

        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].charge, "10000.00");
        assert_eq!(out.rows[0].credit, "0");
    }

    #[test]
    fn test_split_columns_keeps_offsets() {
        let line = "COMPRA 500 FARMACIA  1500   500  9.000";
        let columns = split_columns(line);
        let texts: Vec<&str> = columns.iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["COMPRA 500 FARMACIA", "1500", "500", "9.000"]);
        for column in &columns {
            assert_eq!(&line[column.offset..column.offset + column.text.len()], column.text);
        }
        assert_eq!(columns[2].offset, 28);
    }

    #[test]
    fn test_text_amount_repeated_in_description_is_charge() {
        let text = "11/ENE  COMPRA 500 FARMACIA  1500  500  74.500";
        let out = PageStrategy::Text(Some(text)).extract(1);

        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].charge, "500");
        assert_eq!(out.rows[0].credit, "0");
        assert_eq!(out.rows[0].balance, "74500");
    }

    #[test]
    fn test_text_rejections_are_recorded() {
        let text = [
            "05/MAY  SOLO DESCRIPCION",
            "06/MAY  A  B  C  D  E  1.000",
            "07/MAY  COMISION  S/N  2.500  90.000",
            "08/MAY  GIRO  12  1.000  XX",
        ]
        .join("\n");
        let out = PageStrategy::Text(Some(&text)).extract(3);

        assert!(out.rows.is_empty());
        let reasons: Vec<_> = out.skipped.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::TooFewParts { found: 1 },
                SkipReason::UnexpectedPartCount { found: 6 },
                SkipReason::InsufficientNumbers { found: 1 },
                SkipReason::InvalidAmount {
                    field: "balance",
                    value: "XX".to_string()
                },
            ]
        );
        assert!(out.skipped.iter().all(|s| s.page == 3));
    }
}
