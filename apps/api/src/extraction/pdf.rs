use std::panic;

use tracing::warn;

use super::ExtractionError;

/// Extracts the text layer of a PDF held in memory.
///
/// The parser can panic on malformed object streams; that is caught here and
/// reported like any other parse failure.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(_) => {
            warn!(len = bytes.len(), "PDF parser panicked on malformed input");
            Err(ExtractionError::Pdf(
                "parser aborted on malformed content".to_string(),
            ))
        }
    }
}
