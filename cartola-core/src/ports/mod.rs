//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for the I/O collaborators around the parsing
//! core: reading a PDF, unlocking it, and writing the spreadsheet. The
//! services depend only on these traits.

mod decryptor;
mod document;
mod exporter;

pub use decryptor::Decryptor;
pub use document::{Cell, StatementDocument, Table, TableRow};
pub use exporter::{ExportFormat, RecordExporter};
