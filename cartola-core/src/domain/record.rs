//! Transaction record domain model

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Nature of a record, derived from the sign of its net amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// "Ingreso": money in
    Income,
    /// "Gasto": money out
    Expense,
    /// "Sin movimiento": neither charge nor credit
    NoMovement,
}

impl RecordKind {
    pub fn from_net(net_amount: Decimal) -> Self {
        if net_amount > Decimal::ZERO {
            RecordKind::Income
        } else if net_amount < Decimal::ZERO {
            RecordKind::Expense
        } else {
            RecordKind::NoMovement
        }
    }

    /// Label written to the exported spreadsheet
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Income => "Ingreso",
            RecordKind::Expense => "Gasto",
            RecordKind::NoMovement => "Sin movimiento",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signed amount for reporting: the credit when there is one, the negated
/// charge otherwise, zero when the row moved no money.
pub fn net_amount(charge: Decimal, credit: Decimal) -> Decimal {
    if credit > Decimal::ZERO {
        credit
    } else if charge > Decimal::ZERO {
        -charge
    } else {
        Decimal::ZERO
    }
}

/// A normalized statement movement
///
/// `charge` and `credit` are never both nonzero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    /// Parsed calendar date, `None` when the printed date could not be parsed
    pub date: Option<NaiveDate>,
    /// Date text as assembled from the statement: `03/ENE/2025`
    pub raw_date: String,
    pub description: String,
    pub document_id: String,
    pub charge: Decimal,
    pub credit: Decimal,
    pub net_amount: Decimal,
    pub balance: Decimal,
    pub kind: RecordKind,
    /// 1-based page number the row was read from
    pub page: usize,
}

impl TransactionRecord {
    pub fn has_date(&self) -> bool {
        self.date.is_some()
    }
}

/// Spreadsheet column headers, in export order
pub const EXPORT_HEADERS: [&str; 8] = [
    "Fecha",
    "Descripción",
    "Monto",
    "Cargo",
    "Abono",
    "Saldo",
    "Documento",
    "Tipo",
];

/// One exported line: Date, Description, Net Amount, Charge, Credit,
/// Balance, Document Id, Type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: Option<NaiveDate>,
    pub raw_date: String,
    pub description: String,
    pub net_amount: Decimal,
    pub charge: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
    pub document_id: String,
    pub kind: RecordKind,
}

impl From<&TransactionRecord> for ExportRow {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            date: record.date,
            raw_date: record.raw_date.clone(),
            description: record.description.clone(),
            net_amount: record.net_amount,
            charge: record.charge,
            credit: record.credit,
            balance: record.balance,
            document_id: record.document_id.clone(),
            kind: record.kind,
        }
    }
}

/// Record counts per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindSummary {
    pub income: usize,
    pub expense: usize,
    pub no_movement: usize,
}

/// All records of one statement, in final order
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    records: Vec<TransactionRecord>,
    /// True when ordering is by date, false when extraction order was kept
    sorted_by_date: bool,
}

impl Document {
    pub(crate) fn new(records: Vec<TransactionRecord>, sorted_by_date: bool) -> Self {
        Self {
            records,
            sorted_by_date,
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_sorted_by_date(&self) -> bool {
        self.sorted_by_date
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        self.records.iter().map(ExportRow::from).collect()
    }

    pub fn summary(&self) -> KindSummary {
        self.records
            .iter()
            .fold(KindSummary::default(), |mut acc, record| {
                match record.kind {
                    RecordKind::Income => acc.income += 1,
                    RecordKind::Expense => acc.expense += 1,
                    RecordKind::NoMovement => acc.no_movement += 1,
                }
                acc
            })
    }

    /// Sum of all net amounts
    pub fn net_total(&self) -> Decimal {
        self.records.iter().map(|r| r.net_amount).sum()
    }
}
