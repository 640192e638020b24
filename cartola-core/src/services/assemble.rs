//! Statement-wide record assembly

use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{Document, TransactionRecord};

/// Build the final document from records in extraction order
///
/// Undated records are dropped when at least one record has a date, and
/// the remainder is sorted by date (stable, so same-day records keep
/// statement order). When no record has a date everything is kept in
/// extraction order.
pub fn assemble(records: Vec<TransactionRecord>) -> Result<Document> {
    if records.is_empty() {
        return Err(Error::NoTransactions);
    }

    let total = records.len();
    let dated = records.iter().filter(|r| r.has_date()).count();

    if dated == 0 {
        info!(total, "no record has a parseable date, keeping extraction order");
        return Ok(Document::new(records, false));
    }

    let mut kept: Vec<TransactionRecord> = records.into_iter().filter(|r| r.has_date()).collect();
    if kept.len() < total {
        debug!(dropped = total - kept.len(), "dropped records with unparseable dates");
    }
    kept.sort_by_key(|r| r.date);

    Ok(Document::new(kept, true))
}
