//! Packaged datasource (`.tdsx`) handling.
//!
//! A `.tdsx` is a zip container holding exactly one `.tds` XML document.

use std::io::{Cursor, Read};

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("not a single-document archive: expected exactly one entry, found {found}")]
    EntryCount { found: usize },

    #[error("I/O error reading archive entry: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive entry is not UTF-8 text: {0}")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Extract the text of the only entry in a zip archive.
///
/// The entry's bytes are returned unchanged, so they must be valid UTF-8.
/// Fails when `bytes` is not a zip, when it holds anything other than one
/// entry, or when that entry is not UTF-8. Nothing is returned on failure;
/// callers holding a plain `.tds` body fall back to the original bytes
/// themselves.
///
/// The size an entry declares in its header is not trusted for allocation.
pub fn extract_single_document(bytes: &[u8]) -> Result<String, ArchiveError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    if archive.len() != 1 {
        return Err(ArchiveError::EntryCount {
            found: archive.len(),
        });
    }

    let mut entry = archive.by_index(0)?;
    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;

    Ok(String::from_utf8(content)?)
}

/// Document text from a datasource download body, archived or not.
///
/// The fallback decodes the raw body lossily: invalid UTF-8 sequences become
/// U+FFFD.
pub fn document_text(bytes: &[u8]) -> String {
    match extract_single_document(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "body is not a packaged datasource, treating as plain XML");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
