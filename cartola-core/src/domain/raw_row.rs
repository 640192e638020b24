//! Candidate rows as read from a statement page

use serde::Serialize;

use super::StatementYear;

/// Which extraction strategy produced a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Table,
    Text,
}

/// One accepted statement row before typing
///
/// Amount fields hold separator-normalized numeric text (`"10000.00"`),
/// `"0"` when the statement left the cell empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based page number
    pub page: usize,
    pub source: StrategyKind,
    /// Day of month, zero-padded to two digits
    pub day: String,
    /// Three-letter month code as printed (`ENE`, `FEB`, ...)
    pub month: String,
    pub description: String,
    pub document_id: String,
    pub charge: String,
    pub credit: String,
    pub balance: String,
}

impl RawRow {
    /// Date as printed plus the statement year: `03/ENE/2025`
    pub fn date_text(&self, year: &StatementYear) -> String {
        format!("{}/{}/{}", self.day, self.month, year)
    }
}
