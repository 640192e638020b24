//! Per-statement processing report

use serde::Serialize;
use thiserror::Error;

use super::{Document, StatementYear, StrategyKind};

/// Why a candidate row was dropped
///
/// Row problems never abort a statement; they are logged and collected
/// here instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("line split into {found} parts, expected at least 3")]
    TooFewParts { found: usize },

    #[error("line split into {found} parts, expected 4 or 5")]
    UnexpectedPartCount { found: usize },

    #[error("invalid {field} amount '{value}'")]
    InvalidAmount { field: &'static str, value: String },

    #[error("negative {field} amount '{value}'")]
    NegativeAmount { field: &'static str, value: String },

    #[error("both charge and credit are nonzero")]
    ConflictingAmounts,

    #[error("only {found} numeric values before the balance, cannot place the amount")]
    InsufficientNumbers { found: usize },
}

/// A dropped row with enough context to find it in the statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub page: usize,
    pub strategy: StrategyKind,
    /// Line text, or table cells joined with ` | `
    pub content: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// What happened on one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page: usize,
    pub strategy: StrategyKind,
    pub accepted: usize,
    pub skipped: usize,
}

/// Outcome of processing one statement
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub year: StatementYear,
    pub pages: Vec<PageSummary>,
    pub skipped: Vec<SkippedRow>,
    pub document: Document,
}
