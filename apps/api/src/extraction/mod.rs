//! Document Extractor — turns an uploaded PDF or DOCX into a `CvDocument`.
//!
//! Parser-library failures (including panics inside the PDF parser) come back as a
//! typed `ExtractionError`; a document without a text layer is `NoTextFound`, never
//! an empty string.

mod docx;
#[cfg(test)]
pub(crate) use docx::tests::build_docx;
pub mod handlers;
mod pdf;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::document::{CvDocument, LayoutSignals, SourceFormat};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("no text found in document")]
    NoTextFound,

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("could not read DOCX: {0}")]
    Docx(String),
}

impl ExtractionError {
    /// Message shown to the user, phrased as something they can act on.
    pub fn user_message(&self) -> String {
        match self {
            ExtractionError::EmptyFile => {
                "The uploaded file is empty. Please upload your CV again.".to_string()
            }
            ExtractionError::NoTextFound => "No text could be found in this document. \
                If it is a scanned image, export it as a text-based PDF or DOCX and retry."
                .to_string(),
            ExtractionError::Pdf(_) => "This PDF could not be read. \
                Try re-saving it from your editor or upload a DOCX version."
                .to_string(),
            ExtractionError::Docx(_) => "This DOCX file could not be read. \
                Make sure it is a Word document (not .doc) and is not password protected."
                .to_string(),
        }
    }
}

/// Extracts and cleans the text of an uploaded document.
pub fn extract_document(bytes: &[u8], format: SourceFormat) -> Result<CvDocument, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::EmptyFile);
    }

    let (raw, layout) = match format {
        SourceFormat::Pdf => (pdf::extract_text(bytes)?, LayoutSignals::default()),
        SourceFormat::Docx => docx::extract_text(bytes)?,
    };

    let text = clean_text(&raw);
    if !text.chars().any(char::is_alphanumeric) {
        debug!(format = format.as_str(), raw_len = raw.len(), "No text layer found");
        return Err(ExtractionError::NoTextFound);
    }

    info!(
        format = format.as_str(),
        chars = text.len(),
        tables = layout.tables,
        images = layout.images,
        "Extracted CV text"
    );
    Ok(CvDocument::extracted(format, text, layout))
}

/// Trims every line and drops blank or single-character lines.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 1)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_drops_blank_and_single_char_lines() {
        let raw = "  Jane Doe  \n\n•\n   Experience\n a \nSkills: Rust";
        assert_eq!(clean_text(raw), "Jane Doe\nExperience\nSkills: Rust");
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(matches!(
            extract_document(&[], SourceFormat::Pdf),
            Err(ExtractionError::EmptyFile)
        ));
    }

    #[test]
    fn test_malformed_pdf_is_a_typed_failure() {
        let result = extract_document(b"definitely not a pdf", SourceFormat::Pdf);
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_malformed_docx_is_a_typed_failure() {
        let result = extract_document(b"PK-but-not-really-a-zip", SourceFormat::Docx);
        assert!(matches!(result, Err(ExtractionError::Docx(_))));
    }

    #[test]
    fn test_docx_without_text_is_no_text_found() {
        let bytes = docx::tests::build_docx(
            r#"<w:document><w:body><w:p><w:r><w:drawing/></w:r></w:p></w:body></w:document>"#,
        );
        assert!(matches!(
            extract_document(&bytes, SourceFormat::Docx),
            Err(ExtractionError::NoTextFound)
        ));
    }

    #[test]
    fn test_docx_extracts_document() {
        let bytes = docx::tests::build_docx(
            r#"<w:document><w:body>
                <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
                <w:p><w:r><w:t>Skills</w:t></w:r></w:p>
                <w:p><w:r><w:t xml:space="preserve">Python &amp; SQL</w:t></w:r></w:p>
            </w:body></w:document>"#,
        );
        let doc = extract_document(&bytes, SourceFormat::Docx).unwrap();
        assert!(doc.extraction_success());
        assert_eq!(doc.source_format(), SourceFormat::Docx);
        assert_eq!(doc.text(), "Jane Doe\nSkills\nPython & SQL");
    }
}
