//! Decryption capability port

use std::path::Path;

use crate::domain::result::Result;

use super::StatementDocument;

/// Unlocks a password-protected statement
///
/// Implementations return [`crate::Error::IncorrectPassword`] when the
/// password is rejected. Any temporary files they create must be owned by
/// the returned document and removed when it is dropped.
pub trait Decryptor {
    type Document: StatementDocument;

    fn unlock(&self, locked: &Path, password: &str) -> Result<Self::Document>;
}
