//! Raw row to typed record conversion

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{net_amount, RawRow, RecordKind, SkipReason, StatementYear, TransactionRecord};

/// Spanish month codes as printed on statements, with the English
/// abbreviation chrono understands
const SPANISH_MONTHS: [(&str, &str); 12] = [
    ("ENE", "Jan"),
    ("FEB", "Feb"),
    ("MAR", "Mar"),
    ("ABR", "Apr"),
    ("MAY", "May"),
    ("JUN", "Jun"),
    ("JUL", "Jul"),
    ("AGO", "Aug"),
    ("SEP", "Sep"),
    ("OCT", "Oct"),
    ("NOV", "Nov"),
    ("DIC", "Dec"),
];

/// Translate a Spanish month code; anything else is passed through
pub fn translate_month(code: &str) -> &str {
    SPANISH_MONTHS
        .iter()
        .find(|(es, _)| es.eq_ignore_ascii_case(code))
        .map(|(_, en)| *en)
        .unwrap_or(code)
}

/// Parse `day`/`month code`/`year` into a date, `None` if it is not one
pub fn parse_statement_date(day: &str, month: &str, year: i32) -> Option<NaiveDate> {
    let text = format!("{}/{}/{}", day, translate_month(month), year);
    NaiveDate::parse_from_str(&text, "%d/%b/%Y").ok()
}

/// Parse separator-normalized amount text (`"10000.00"`); blank is zero
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(text).ok()
}

fn amount_field(field: &'static str, text: &str) -> Result<Decimal, SkipReason> {
    parse_amount(text).ok_or_else(|| SkipReason::InvalidAmount {
        field,
        value: text.to_string(),
    })
}

fn non_negative(field: &'static str, text: &str, value: Decimal) -> Result<Decimal, SkipReason> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(SkipReason::NegativeAmount {
            field,
            value: text.to_string(),
        });
    }
    Ok(value)
}

/// Build a typed record from a raw row
///
/// An unparsable date is not an error: the record keeps `date: None`.
/// Amount problems reject the row.
pub fn normalize_row(row: &RawRow, year: &StatementYear) -> Result<TransactionRecord, SkipReason> {
    let charge = amount_field("charge", &row.charge)?;
    let credit = amount_field("credit", &row.credit)?;
    let balance = amount_field("balance", &row.balance)?;

    let charge = non_negative("charge", &row.charge, charge)?;
    let credit = non_negative("credit", &row.credit, credit)?;
    if !charge.is_zero() && !credit.is_zero() {
        return Err(SkipReason::ConflictingAmounts);
    }

    let net = net_amount(charge, credit);

    Ok(TransactionRecord {
        date: parse_statement_date(&row.day, &row.month, year.year),
        raw_date: row.date_text(year),
        description: row.description.clone(),
        document_id: row.document_id.clone(),
        charge,
        credit,
        net_amount: net,
        balance,
        kind: RecordKind::from_net(net),
        page: row.page,
    })
}
