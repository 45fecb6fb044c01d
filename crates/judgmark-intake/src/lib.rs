//! Document intake: turn an uploaded judgment file into plain text.
//!
//! Word documents (`.doc`/`.docx`) are read paragraph by paragraph; anything
//! else must be UTF-8 text.

mod docx;
mod error;

use std::path::Path;

use tracing::{info, warn};

pub use docx::{paragraphs_from_xml, read_docx_paragraphs};
pub use error::IntakeError;

/// Shown in place of the document text when a plain-text upload is not UTF-8.
pub const ENCODING_ERROR_MESSAGE: &str = "读取文件时出现编码错误，请检查文件编码是否正确";

/// True for `.doc` and `.docx` file names (case-insensitive).
pub fn is_word_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("doc") || ext.eq_ignore_ascii_case("docx"))
}

/// Read a judgment document as plain text.
///
/// Word paragraphs are joined with `\n`. Plain text has a leading BOM removed
/// and `\r\n` line endings normalised to `\n`.
pub fn read_document(path: &Path) -> Result<String, IntakeError> {
    if is_word_document(path) {
        let paragraphs = read_docx_paragraphs(path)?;
        info!(path = %path.display(), paragraphs = paragraphs.len(), "read word document");
        return Ok(paragraphs.join("\n"));
    }

    let bytes = std::fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| IntakeError::Encoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    info!(path = %path.display(), chars = text.chars().count(), "read text document");
    Ok(text.replace("\r\n", "\n"))
}

/// Text for the input box. Never fails: no file gives `""`, a decoding
/// problem gives [`ENCODING_ERROR_MESSAGE`], any other problem gives its
/// error message.
pub fn intake_text(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return String::new();
    };
    match read_document(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "document intake failed");
            e.to_string()
        }
    }
}
