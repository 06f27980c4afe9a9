use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::analyzer::{AnalysisReport, CvAnalyzer};
use crate::analysis::report::render_text_report;
use crate::config::SettingsOverrides;
use crate::errors::AppError;
use crate::extraction::handlers::{extract_upload, read_upload};
use crate::models::analysis::{AnalysisHistoryEntry, ChatMessage, SavedSuggestion, SuggestionRecord};
use crate::session::{HistoryTrend, Session, SessionSummary};
use crate::state::AppState;

/// POST /api/v1/sessions
/// Overrides are merged over the process defaults and validated once, here.
/// An empty body keeps the defaults.
pub async fn handle_create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionSummary>), AppError> {
    let overrides: SettingsOverrides = if body.iter().all(u8::is_ascii_whitespace) {
        SettingsOverrides::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid session settings: {e}")))?
    };
    let settings = state.settings.with_overrides(overrides)?;
    let summary = state.sessions.insert(Session::new(settings)).await;
    info!(session_id = %summary.id, model = %summary.model_name, "Session started");
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(state.sessions.get(id).await?.summary()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    info!(session_id = %id, "Session ended");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/analyze
/// Multipart `file` + `job_description` (+ optional `note`): extract, score, record.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let settings = state.sessions.get(id).await?.settings;

    let upload = read_upload(multipart).await?;
    let job_description = upload
        .field("job_description")
        .ok_or_else(|| AppError::Validation("job_description must not be empty".to_string()))?
        .to_string();
    let note = upload.field("note").map(str::to_string);

    let document = extract_upload(&upload).await?;
    let report = CvAnalyzer::new(&settings).analyze(document.text(), document.layout(), &job_description);

    let total = report.breakdown.total;
    let breakdown = report.breakdown.clone();
    let history_len = state
        .sessions
        .update(id, |session| {
            session.history = std::mem::take(&mut session.history).record(breakdown, note);
            session.cv = Some(document);
            session.job_description = Some(job_description);
            session.report = Some(report.clone());
            session.history.len()
        })
        .await?;

    info!(session_id = %id, total, history_len, "Analysis recorded");
    Ok(Json(report))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
}

/// GET /api/v1/sessions/:id/report[?format=text]
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let report = state
        .sessions
        .get(id)
        .await?
        .report
        .ok_or_else(|| AppError::NotFound(format!("Session {id} has no report yet")))?;

    match query.format.as_deref() {
        None | Some("json") => Ok(Json(report).into_response()),
        Some("text") => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            render_text_report(&report.breakdown, &report.summary),
        )
            .into_response()),
        Some(other) => Err(AppError::Validation(format!(
            "Unknown report format '{other}': use json or text"
        ))),
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<AnalysisHistoryEntry>,
    pub trend: HistoryTrend,
    pub saved_suggestions: Vec<SavedSuggestion>,
}

/// GET /api/v1/sessions/:id/history
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state.sessions.get(id).await?.history;
    Ok(Json(HistoryResponse {
        trend: history.trend(),
        entries: history.entries().to_vec(),
        saved_suggestions: history.saved_suggestions().to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SaveSuggestionsRequest {
    pub suggestions: Vec<SuggestionRecord>,
}

#[derive(Debug, Serialize)]
pub struct SaveSuggestionsResponse {
    pub entry_id: Uuid,
    pub saved: usize,
    pub total_saved: usize,
}

/// POST /api/v1/sessions/:id/history/suggestions
/// Keeps the given suggestions against the latest analysis. Nothing is saved implicitly.
pub async fn handle_save_suggestions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveSuggestionsRequest>,
) -> Result<Json<SaveSuggestionsResponse>, AppError> {
    if req.suggestions.is_empty() {
        return Err(AppError::Validation(
            "suggestions must contain at least one entry".to_string(),
        ));
    }
    let saved = req.suggestions.len();
    let (entry_id, total_saved) = state
        .sessions
        .update(id, |session| {
            let entry_id = session.history.latest_entry_id().ok_or_else(|| {
                AppError::Validation(
                    "No analysis in this session yet: analyze a CV before saving suggestions"
                        .to_string(),
                )
            })?;
            session.history =
                std::mem::take(&mut session.history).save_suggestions(entry_id, req.suggestions);
            Ok::<_, AppError>((entry_id, session.history.saved_suggestions().len()))
        })
        .await??;

    info!(session_id = %id, %entry_id, saved, "Suggestions saved to history");
    Ok(Json(SaveSuggestionsResponse {
        entry_id,
        saved,
        total_saved,
    }))
}

/// GET /api/v1/sessions/:id/chat
pub async fn handle_get_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    Ok(Json(state.sessions.get(id).await?.chat))
}

/// DELETE /api/v1/sessions/:id/chat
pub async fn handle_clear_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.update(id, |s| s.chat.clear()).await?;
    Ok(StatusCode::NO_CONTENT)
}
