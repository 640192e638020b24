//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - lopdf for the Decryptor and StatementDocument ports
//! - In-memory pages for tests and pre-extracted input
//! - rust_xlsxwriter and csv for the RecordExporter port

pub mod csv_export;
pub mod memory;
pub mod pdf;
mod pdf_layout;
pub mod xlsx;
