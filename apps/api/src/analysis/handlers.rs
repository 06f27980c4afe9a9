use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::analyzer::{AnalysisReport, CvAnalyzer};
use crate::errors::AppError;
use crate::models::document::LayoutSignals;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub cv_text: String,
    pub job_description: String,
}

/// POST /api/v1/score
/// Stateless scoring of already-extracted text with the process default settings.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    if req.cv_text.trim().is_empty() {
        return Err(AppError::Validation("cv_text must not be empty".to_string()));
    }
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description must not be empty".to_string(),
        ));
    }
    let analyzer = CvAnalyzer::new(&state.settings);
    Ok(Json(analyzer.analyze(
        &req.cv_text,
        LayoutSignals::default(),
        &req.job_description,
    )))
}
