//! Assistant-backed endpoints. Each one snapshots the session, calls the model
//! without holding the session lock, and writes back only on success.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::sections::{split_sections, CvSection};
use crate::assistant::parse::{parse_analysis, AssistantAnalysis};
use crate::assistant::prompts::{
    advice_options, advice_prompt, analysis_prompt, analysis_options, chat_options, chat_prompt,
    cover_letter_options, cover_letter_prompt, enhance_options, enhance_section_prompt,
    help_options, suggestion_help_prompt, AdviceTopic, ChatContext, QuickPrompt,
};
use crate::assistant::{fallback, AssistantStatus};
use crate::errors::AppError;
use crate::models::analysis::{ChatMessage, SuggestionRecord};
use crate::state::AppState;

/// GET /api/v1/assistant/status
pub async fn handle_status(State(state): State<AppState>) -> Json<AssistantStatus> {
    Json(state.assistant.status().await)
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub score: Option<u32>,
    pub suggestions: Vec<SuggestionRecord>,
    pub analysis: AssistantAnalysis,
}

/// POST /api/v1/sessions/:id/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let (cv_text, job_description, report) = session.analysed_inputs()?;

    let prompt = analysis_prompt(cv_text, job_description, &report.breakdown);
    let options = analysis_options().with_model(&session.settings.model_name);
    let reply = state
        .assistant
        .complete(&prompt, &options)
        .await
        .map_err(|e| {
            warn!(session_id = %id, "Assistant suggestions failed: {e}");
            AppError::assistant(e, fallback::improvement_tip())
        })?;

    let analysis = parse_analysis(&reply);
    Ok(Json(SuggestionsResponse {
        score: analysis.score,
        suggestions: analysis.suggestions(),
        analysis,
    }))
}

#[derive(Debug, Serialize)]
pub struct SuggestionHelpResponse {
    pub title: String,
    pub guidance: String,
}

/// POST /api/v1/sessions/:id/suggestions/help
/// Step-by-step guidance for one suggestion, as returned by the suggestion endpoints.
pub async fn handle_suggestion_help(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(suggestion): Json<SuggestionRecord>,
) -> Result<Json<SuggestionHelpResponse>, AppError> {
    if suggestion.title.trim().is_empty() && suggestion.text.trim().is_empty() {
        return Err(AppError::Validation(
            "suggestion needs a title or text".to_string(),
        ));
    }
    let session = state.sessions.get(id).await?;

    let prompt = suggestion_help_prompt(&suggestion);
    let options = help_options().with_model(&session.settings.model_name);
    let guidance = state
        .assistant
        .complete(&prompt, &options)
        .await
        .map_err(|e| {
            warn!(session_id = %id, "Assistant suggestion help failed: {e}");
            AppError::assistant(e, fallback::suggestion_help(&suggestion.category))
        })?;

    Ok(Json(SuggestionHelpResponse {
        title: suggestion.title,
        guidance,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub topic: AdviceTopic,
}

#[derive(Debug, Serialize)]
pub struct AdviceResponse {
    pub topic: AdviceTopic,
    pub advice: ChatMessage,
    pub transcript_len: usize,
}

/// POST /api/v1/sessions/:id/advice
/// Targeted advice on one topic. The exchange is added to the chat transcript.
pub async fn handle_advice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AdviceRequest>,
) -> Result<Json<AdviceResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let (_, _, report) = session.analysed_inputs()?;

    let prompt = advice_prompt(req.topic, report);
    let options = advice_options().with_model(&session.settings.model_name);
    let advice = state
        .assistant
        .complete(&prompt, &options)
        .await
        .map_err(|e| {
            warn!(session_id = %id, topic = req.topic.label(), "Assistant advice failed: {e}");
            AppError::assistant(e, fallback::advice(req.topic))
        })?;

    let advice = ChatMessage::assistant(advice);
    let transcript_len = state
        .sessions
        .update(id, |s| {
            s.chat
                .push(ChatMessage::user(format!("Advice request: {}", req.topic.label())));
            s.chat.push(advice.clone());
            s.chat.len()
        })
        .await?;

    Ok(Json(AdviceResponse {
        topic: req.topic,
        advice,
        transcript_len,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub quick_prompt: Option<QuickPrompt>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: ChatMessage,
    pub transcript_len: usize,
}

/// POST /api/v1/sessions/:id/chat
/// Free text in `message`, or one of the `quick_prompt`s.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = state.sessions.get(id).await?;

    let (shown, question) = match (req.message.as_deref().map(str::trim), req.quick_prompt) {
        (Some(message), None) if !message.is_empty() => (message.to_string(), message.to_string()),
        (None, Some(quick)) => (
            quick.label().to_string(),
            quick.question(session.report.as_ref().map(|r| r.breakdown.total)),
        ),
        _ => {
            return Err(AppError::Validation(
                "Send either a non-empty message or a quick_prompt".to_string(),
            ))
        }
    };

    let ctx = ChatContext {
        cv_text: session.cv.as_ref().map(|cv| cv.text()),
        job_description: session.job_description.as_deref(),
        report: session.report.as_ref(),
    };
    let prompt = chat_prompt(&question, ctx);
    let options = chat_options().with_model(&session.settings.model_name);
    let reply = state
        .assistant
        .complete(&prompt, &options)
        .await
        .map_err(|e| {
            warn!(session_id = %id, "Assistant chat failed: {e}");
            AppError::assistant(e, fallback::chat_reply(&shown))
        })?;

    let reply = ChatMessage::assistant(reply);
    let transcript_len = state
        .sessions
        .update(id, |s| {
            s.chat.push(ChatMessage::user(shown));
            s.chat.push(reply.clone());
            s.chat.len()
        })
        .await?;

    Ok(Json(ChatResponse {
        reply,
        transcript_len,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub section: CvSection,
    /// Text to rewrite; the matching section of the uploaded CV when omitted.
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub section: CvSection,
    pub original: String,
    pub enhanced: String,
}

const ENHANCEABLE: [CvSection; 4] = [
    CvSection::Summary,
    CvSection::Experience,
    CvSection::Education,
    CvSection::Skills,
];

/// POST /api/v1/sessions/:id/enhance
pub async fn handle_enhance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EnhanceRequest>,
) -> Result<Json<EnhanceResponse>, AppError> {
    if !ENHANCEABLE.contains(&req.section) {
        return Err(AppError::Validation(format!(
            "Section '{}' cannot be enhanced: use summary, experience, education or skills",
            req.section.label().to_lowercase()
        )));
    }

    let session = state.sessions.get(id).await?;
    let (cv_text, job_description, report) = session.analysed_inputs()?;

    let original = match req.content.filter(|c| !c.trim().is_empty()) {
        Some(content) => content,
        None => split_sections(cv_text)
            .remove(&req.section)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "No {} section found in the uploaded CV; send its text as `content`",
                    req.section.label().to_lowercase()
                ))
            })?,
    };

    let requirements = if report.job.requirements.is_empty() {
        job_description.to_string()
    } else {
        report.job.requirements.join("\n")
    };

    let prompt = enhance_section_prompt(req.section, &original, &requirements);
    let options = enhance_options().with_model(&session.settings.model_name);
    let enhanced = state
        .assistant
        .complete(&prompt, &options)
        .await
        .map_err(|e| {
            warn!(session_id = %id, "Assistant enhance failed: {e}");
            AppError::assistant(e, fallback::improvement_tip())
        })?;

    info!(session_id = %id, section = req.section.label(), "Section enhanced");
    Ok(Json(EnhanceResponse {
        section: req.section,
        original,
        enhanced,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct CoverLetterRequest {
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

/// POST /api/v1/sessions/:id/cover-letter
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let (cv_text, job_description, _) = session.analysed_inputs()?;

    let company = req.company_name.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let prompt = cover_letter_prompt(cv_text, job_description, company);
    let options = cover_letter_options().with_model(&session.settings.model_name);
    let cover_letter = state
        .assistant
        .complete(&prompt, &options)
        .await
        .map_err(|e| {
            warn!(session_id = %id, "Assistant cover letter failed: {e}");
            AppError::assistant(e, fallback::cover_letter_tip())
        })?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}
