//! Sessions and the Analytics/History store.
//!
//! A session owns everything one user works with: validated settings, the uploaded
//! CV, the job description, the last report, the chat transcript and the analysis
//! history. Nothing here outlives the process.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::analysis::analyzer::AnalysisReport;
use crate::analysis::report::{Benchmark, ScoreBand};
use crate::analysis::scoring::ScoringWeights;
use crate::config::AnalysisSettings;
use crate::errors::AppError;
use crate::models::analysis::{
    AnalysisHistoryEntry, ChatMessage, SavedSuggestion, ScoreBreakdown, SuggestionRecord,
};
use crate::models::document::CvDocument;

pub mod handlers;

/// Append-only list of completed analyses, oldest first, plus the suggestions the
/// user explicitly saved against them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisHistory {
    entries: Vec<AnalysisHistoryEntry>,
    saved_suggestions: Vec<SavedSuggestion>,
}

impl AnalysisHistory {
    /// Returns the history with one more entry; existing entries are untouched.
    pub fn record(mut self, breakdown: ScoreBreakdown, note: Option<String>) -> Self {
        self.entries.push(AnalysisHistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            breakdown,
            note,
        });
        self
    }

    /// Returns the history with `suggestions` kept against entry `entry_id`.
    pub fn save_suggestions(mut self, entry_id: Uuid, suggestions: Vec<SuggestionRecord>) -> Self {
        let saved_at = Utc::now();
        self.saved_suggestions
            .extend(suggestions.into_iter().map(|suggestion| SavedSuggestion {
                entry_id,
                saved_at,
                suggestion,
            }));
        self
    }

    pub fn entries(&self) -> &[AnalysisHistoryEntry] {
        &self.entries
    }

    pub fn latest_entry_id(&self) -> Option<Uuid> {
        self.entries.last().map(|e| e.id)
    }

    pub fn saved_suggestions(&self) -> &[SavedSuggestion] {
        &self.saved_suggestions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn trend(&self) -> HistoryTrend {
        let totals: Vec<u32> = self.entries.iter().map(|e| e.breakdown.total).collect();
        let latest = totals.last().copied();
        HistoryTrend {
            count: totals.len(),
            latest,
            best: totals.iter().max().copied(),
            average: (!totals.is_empty()).then(|| {
                let sum: u32 = totals.iter().sum();
                (sum as f64 / totals.len() as f64 * 10.0).round() / 10.0
            }),
            change_from_previous: match totals.as_slice() {
                [.., previous, last] => Some(*last as i64 - *previous as i64),
                _ => None,
            },
            band: latest.map(ScoreBand::from_total),
            benchmark: latest.map(Benchmark::for_total),
        }
    }
}

/// Figures a progress chart is drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryTrend {
    pub count: usize,
    pub latest: Option<u32>,
    pub best: Option<u32>,
    pub average: Option<f64>,
    pub change_from_previous: Option<i64>,
    pub band: Option<ScoreBand>,
    pub benchmark: Option<Benchmark>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub settings: AnalysisSettings,
    pub cv: Option<CvDocument>,
    pub job_description: Option<String>,
    pub report: Option<AnalysisReport>,
    pub history: AnalysisHistory,
    pub chat: Vec<ChatMessage>,
}

impl Session {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            settings,
            cv: None,
            job_description: None,
            report: None,
            history: AnalysisHistory::default(),
            chat: Vec::new(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            created_at: self.created_at,
            model_name: self.settings.model_name.clone(),
            scoring_weights: self.settings.weights,
            stopword_count: self.settings.stopwords.len(),
            has_cv: self.cv.is_some(),
            has_job_description: self.job_description.is_some(),
            last_score: self.report.as_ref().map(|r| r.breakdown.total),
            history_len: self.history.len(),
            chat_len: self.chat.len(),
        }
    }

    /// The CV text and job description of the last analysis, or a validation error
    /// naming what is missing.
    pub fn analysed_inputs(&self) -> Result<(&str, &str, &AnalysisReport), AppError> {
        match (&self.cv, &self.job_description, &self.report) {
            (Some(cv), Some(jd), Some(report)) => Ok((cv.text(), jd.as_str(), report)),
            _ => Err(AppError::Validation(
                "No analysis in this session yet: upload a CV and job description first".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub model_name: String,
    pub scoring_weights: ScoringWeights,
    pub stopword_count: usize,
    pub has_cv: bool,
    pub has_job_description: bool,
    pub last_score: Option<u32>,
    pub history_len: usize,
    pub chat_len: usize,
}

/// In-memory session map shared by all handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub async fn insert(&self, session: Session) -> SessionSummary {
        let summary = session.summary();
        self.inner.write().await.insert(session.id, session);
        summary
    }

    /// A snapshot of the session. Work that may be slow (model calls) runs on the
    /// snapshot so the lock is never held across it.
    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        self.inner
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.inner.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
