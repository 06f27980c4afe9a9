use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::ExtractionError;
use crate::models::document::LayoutSignals;

const DOCUMENT_XML: &str = "word/document.xml";

static PARAGRAPH_PROPS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:pPr>.*?</w:pPr>").expect("valid regex"));
static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:p(?:\s[^>]*[^/])?>(.*?)</w:p>").expect("valid regex"));
static RUN_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:(tab|br|cr)\b[^>]*/>").expect("valid regex")
});
static TABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tbl[\s>]").expect("valid regex"));
static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:(?:drawing|pict)[\s>/]").expect("valid regex"));
static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("valid regex"));

/// Reads the paragraphs of `word/document.xml` out of a DOCX archive.
pub(super) fn extract_text(bytes: &[u8]) -> Result<(String, LayoutSignals), ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(format!("invalid archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ExtractionError::Docx(format!("missing {DOCUMENT_XML}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("unreadable {DOCUMENT_XML}: {e}")))?;

    let layout = LayoutSignals {
        tables: TABLE.find_iter(&xml).count(),
        images: IMAGE.find_iter(&xml).count(),
    };

    Ok((paragraphs_to_text(&xml), layout))
}

fn paragraphs_to_text(xml: &str) -> String {
    let xml = PARAGRAPH_PROPS.replace_all(xml, "");
    PARAGRAPH
        .captures_iter(&xml)
        .map(|p| {
            let body = p.get(1).map_or("", |m| m.as_str());
            let mut line = String::new();
            for run in RUN_CONTENT.captures_iter(body) {
                if let Some(text) = run.get(1) {
                    line.push_str(&decode_entities(text.as_str()));
                } else if let Some(tag) = run.get(2) {
                    line.push(if tag.as_str() == "tab" { '\t' } else { '\n' });
                }
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(text, |caps: &Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });
    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
