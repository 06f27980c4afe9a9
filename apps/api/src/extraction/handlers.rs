use std::collections::HashMap;

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;
use crate::extraction::extract_document;
use crate::models::document::{CvDocument, SourceFormat};

/// A multipart CV upload: the `file` part plus any text fields sent with it.
#[derive(Debug)]
pub struct CvUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub fields: HashMap<String, String>,
}

impl CvUpload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Reads a multipart body with a `file` part and optional text fields.
pub async fn read_upload(mut multipart: Multipart) -> Result<CvUpload, AppError> {
    let mut file = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
            file = Some((file_name, bytes));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read field '{name}': {e}")))?;
            fields.insert(name, value);
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' part".to_string()))?;
    Ok(CvUpload {
        file_name,
        bytes,
        fields,
    })
}

/// Resolves the format from the file name and runs the parser off the async runtime.
pub async fn extract_upload(upload: &CvUpload) -> Result<CvDocument, AppError> {
    let format = SourceFormat::from_filename(&upload.file_name).map_err(|e| {
        warn!(file_name = %upload.file_name, "Rejected upload: {e}");
        e
    })?;
    let bytes = upload.bytes.clone();
    let document = tokio::task::spawn_blocking(move || extract_document(&bytes, format))
        .await
        .map_err(|e| anyhow::anyhow!("extraction task failed: {e}"))??;
    Ok(document)
}

/// POST /api/v1/extract
pub async fn handle_extract(multipart: Multipart) -> Result<Json<CvDocument>, AppError> {
    let upload = read_upload(multipart).await?;
    Ok(Json(extract_upload(&upload).await?))
}
