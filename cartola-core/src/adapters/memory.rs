//! In-memory statement pages
//!
//! Used by tests, and by callers that already have page text and tables
//! from some other extractor.

use std::path::Path;

use crate::domain::result::{Error, Result};
use crate::ports::{Decryptor, StatementDocument, Table, TableRow};

#[derive(Debug, Clone, Default)]
struct Page {
    text: Option<String>,
    tables: Vec<Table>,
}

/// A statement built page by page
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocument {
    pages: Vec<Page>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page with text only
    pub fn with_text_page(self, text: &str) -> Self {
        self.with_page(Some(text), Vec::new())
    }

    /// Append a page with no extractable text
    pub fn with_blank_page(self) -> Self {
        self.with_page(None, Vec::new())
    }

    /// Append a page with optional text and detected tables
    pub fn with_page(mut self, text: Option<&str>, tables: Vec<Table>) -> Self {
        self.pages.push(Page {
            text: text.map(str::to_string),
            tables,
        });
        self
    }

    /// Build a table row; empty strings become missing cells
    pub fn row(cells: &[&str]) -> TableRow {
        cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    fn page(&self, index: usize) -> Result<&Page> {
        self.pages
            .get(index)
            .ok_or_else(|| Error::pdf(format!("Page index {} out of range", index)))
    }
}

impl StatementDocument for InMemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        Ok(self.page(index)?.text.clone())
    }

    fn page_tables(&self, index: usize) -> Result<Vec<Table>> {
        Ok(self.page(index)?.tables.clone())
    }
}

/// Hands out a fixed document when given the right password
///
/// The locked path is not read.
#[derive(Debug, Clone)]
pub struct InMemoryDecryptor {
    password: String,
    document: InMemoryDocument,
}

impl InMemoryDecryptor {
    pub fn new(password: impl Into<String>, document: InMemoryDocument) -> Self {
        Self {
            password: password.into(),
            document,
        }
    }
}

impl Decryptor for InMemoryDecryptor {
    type Document = InMemoryDocument;

    fn unlock(&self, _locked: &Path, password: &str) -> Result<InMemoryDocument> {
        if password != self.password {
            return Err(Error::IncorrectPassword);
        }
        Ok(self.document.clone())
    }
}
