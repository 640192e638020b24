//! Core domain entities
//!
//! Plain data structures describing statement rows and the records built
//! from them. No I/O happens here.

mod raw_row;
mod record;
mod report;
mod year;
pub mod result;

pub use raw_row::{RawRow, StrategyKind};
pub use record::{
    net_amount, Document, ExportRow, KindSummary, RecordKind, TransactionRecord, EXPORT_HEADERS,
};
pub use report::{PageSummary, ProcessReport, SkipReason, SkippedRow};
pub use year::{StatementYear, YearSource, FALLBACK_YEAR};
