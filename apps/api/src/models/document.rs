use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
}

impl SourceFormat {
    /// Resolves the declared format from an uploaded file name's extension.
    pub fn from_filename(name: &str) -> Result<Self, ConfigError> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(SourceFormat::Pdf),
            "docx" => Ok(SourceFormat::Docx),
            _ => Err(ConfigError::UnsupportedFormat(if ext.is_empty() {
                name.to_string()
            } else {
                ext
            })),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
        }
    }
}

/// Layout features seen while parsing that plain text no longer shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSignals {
    pub tables: usize,
    pub images: usize,
}

/// Text extracted from one uploaded CV. Built once by the extractor, read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct CvDocument {
    source_format: SourceFormat,
    text: String,
    extraction_success: bool,
    layout: LayoutSignals,
}

impl CvDocument {
    pub(crate) fn extracted(source_format: SourceFormat, text: String, layout: LayoutSignals) -> Self {
        Self {
            source_format,
            text,
            extraction_success: true,
            layout,
        }
    }

    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn extraction_success(&self) -> bool {
        self.extraction_success
    }

    pub fn layout(&self) -> LayoutSignals {
        self.layout
    }
}
