//! lopdf-backed statement reader

use std::io::Write;
use std::path::Path;

use lopdf::content::Content;
use lopdf::encryption::DecryptionError;
use lopdf::{Document, ObjectId};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::ports::{Decryptor, StatementDocument, Table};

use super::pdf_layout::layout_text;

/// Opens statements with lopdf, decrypting them with the caller's password
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfDecryptor;

fn decryption_error(error: lopdf::Error) -> Error {
    match error {
        lopdf::Error::Decryption(DecryptionError::IncorrectPassword) => Error::IncorrectPassword,
        other => Error::pdf(format!("Cannot decrypt statement: {}", other)),
    }
}

impl Decryptor for LopdfDecryptor {
    type Document = PdfStatement;

    fn unlock(&self, locked: &Path, password: &str) -> Result<PdfStatement> {
        let mut document = Document::load(locked)
            .map_err(|e| Error::pdf(format!("Failed to open {}: {}", locked.display(), e)))?;

        if !document.is_encrypted() {
            debug!(path = %locked.display(), "statement is not encrypted");
            return PdfStatement::from_document(document, None);
        }

        document.decrypt(password).map_err(decryption_error)?;

        // Decrypted copy lives only as long as the returned statement
        let mut decrypted = NamedTempFile::new()?;
        document
            .save_to(&mut decrypted)
            .map_err(|e| Error::pdf(format!("Failed to write decrypted copy: {}", e)))?;
        decrypted.flush()?;

        let reloaded = Document::load(decrypted.path())
            .map_err(|e| Error::pdf(format!("Failed to reopen decrypted copy: {}", e)))?;
        PdfStatement::from_document(reloaded, Some(decrypted))
    }
}

/// A decrypted statement
///
/// Page text is rebuilt from text positions so table columns stay apart.
/// lopdf has no table detector, so every page goes through the text
/// strategy.
pub struct PdfStatement {
    document: Document,
    pages: Vec<(u32, ObjectId)>,
    _decrypted: Option<NamedTempFile>,
}

impl PdfStatement {
    fn from_document(document: Document, decrypted: Option<NamedTempFile>) -> Result<Self> {
        let pages: Vec<(u32, ObjectId)> = document.get_pages().into_iter().collect();
        if pages.is_empty() {
            return Err(Error::pdf("Document has no pages"));
        }
        Ok(Self {
            document,
            pages,
            _decrypted: decrypted,
        })
    }

    fn page(&self, index: usize) -> Result<(u32, ObjectId)> {
        self.pages
            .get(index)
            .copied()
            .ok_or_else(|| Error::pdf(format!("Page index {} out of range", index)))
    }

    /// Plain lopdf extraction, used when the content stream cannot be decoded
    fn extracted_text(&self, index: usize, number: u32) -> Option<String> {
        match self.document.extract_text(&[number]) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(page = index + 1, error = %e, "no extractable text on page");
                None
            }
        }
    }
}

impl StatementDocument for PdfStatement {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<Option<String>> {
        let (number, id) = self.page(index)?;

        let decoded = self
            .document
            .get_page_content(id)
            .and_then(|bytes| Content::decode(&bytes));
        let text = match decoded {
            Ok(content) => Some(layout_text(&content)),
            Err(e) => {
                debug!(page = index + 1, error = %e, "falling back to plain text extraction");
                self.extracted_text(index, number)
            }
        };

        Ok(text.filter(|t| !t.trim().is_empty()))
    }

    fn page_tables(&self, index: usize) -> Result<Vec<Table>> {
        self.page(index)?;
        Ok(Vec::new())
    }
}
