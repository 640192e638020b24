//! Readable statement document port

use crate::domain::result::Result;

/// A table cell; `None` where the detector found no content
pub type Cell = Option<String>;

/// One table row; rows may be ragged
pub type TableRow = Vec<Cell>;

/// One detected table, rows in reading order
pub type Table = Vec<TableRow>;

/// A decrypted, readable statement
///
/// Pages are addressed by 0-based index and always enumerate in the same
/// order.
pub trait StatementDocument {
    /// Number of pages
    fn page_count(&self) -> usize;

    /// Plain text of a page, `None` when the page carries no extractable text
    fn page_text(&self, index: usize) -> Result<Option<String>>;

    /// Tables detected on a page; empty when none were found
    fn page_tables(&self, index: usize) -> Result<Vec<Table>>;
}

impl<T: StatementDocument + ?Sized> StatementDocument for &T {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        (**self).page_text(index)
    }

    fn page_tables(&self, index: usize) -> Result<Vec<Table>> {
        (**self).page_tables(index)
    }
}
