use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::scoring::ScoringWeights;

/// The five named subscores of a breakdown, in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    KeywordMatch,
    Structure,
    ContentQuality,
    TechnicalSkills,
    AtsFormatting,
}

impl ScoreComponent {
    pub const ALL: [ScoreComponent; 5] = [
        ScoreComponent::KeywordMatch,
        ScoreComponent::Structure,
        ScoreComponent::ContentQuality,
        ScoreComponent::TechnicalSkills,
        ScoreComponent::AtsFormatting,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreComponent::KeywordMatch => "Keyword Match",
            ScoreComponent::Structure => "CV Structure",
            ScoreComponent::ContentQuality => "Content Quality",
            ScoreComponent::TechnicalSkills => "Technical Skills",
            ScoreComponent::AtsFormatting => "ATS Formatting",
        }
    }
}

/// Five subscores in [0, 100] and their weighted total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_match: f64,
    pub structure: f64,
    pub content_quality: f64,
    pub technical_skills: f64,
    pub ats_formatting: f64,
    /// Weighted sum of the subscores, rounded to the nearest integer.
    pub total: u32,
    pub weights: ScoringWeights,
}

impl ScoreBreakdown {
    pub fn get(&self, component: ScoreComponent) -> f64 {
        match component {
            ScoreComponent::KeywordMatch => self.keyword_match,
            ScoreComponent::Structure => self.structure,
            ScoreComponent::ContentQuality => self.content_quality,
            ScoreComponent::TechnicalSkills => self.technical_skills,
            ScoreComponent::AtsFormatting => self.ats_formatting,
        }
    }

    pub fn components(&self) -> [(ScoreComponent, f64); 5] {
        ScoreComponent::ALL.map(|c| (c, self.get(c)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionOrigin {
    /// Produced by the deterministic rules of the analyzer.
    Rules,
    /// Produced by the language model.
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub title: String,
    pub text: String,
    pub priority: Priority,
    pub category: String,
    pub origin: SuggestionOrigin,
}

/// One completed analysis, as kept in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisHistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub breakdown: ScoreBreakdown,
    pub note: Option<String>,
}

/// A suggestion the user chose to keep, tied to the analysis it was made for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSuggestion {
    pub entry_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub suggestion: SuggestionRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}
