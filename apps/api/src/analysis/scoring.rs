//! Scoring Engine — turns keyword overlap, structure and content signals into a
//! weighted 0–100 `ScoreBreakdown`.
//!
//! Every function here is pure: the same inputs always produce the same breakdown.

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::KeywordComparison;
use crate::analysis::structure::StructureAnalysis;
use crate::config::ConfigError;
use crate::models::analysis::{ScoreBreakdown, ScoreComponent};

/// Percentage weights of the five subscores. Always sums to 100 once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword_match: u32,
    pub structure: u32,
    pub content_quality: u32,
    pub technical_skills: u32,
    pub ats_formatting: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword_match: 35,
            structure: 25,
            content_quality: 20,
            technical_skills: 15,
            ats_formatting: 5,
        }
    }
}

impl ScoringWeights {
    /// Parses `"35,25,20,15,5"` in component order and validates the sum.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != ScoreComponent::ALL.len() {
            return Err(ConfigError::WeightsCount(parts.len()));
        }
        let values = parts
            .iter()
            .map(|p| {
                p.parse::<u32>()
                    .map_err(|_| ConfigError::WeightsParse(p.to_string()))
            })
            .collect::<Result<Vec<u32>, _>>()?;
        let weights = Self {
            keyword_match: values[0],
            structure: values[1],
            content_quality: values[2],
            technical_skills: values[3],
            ats_formatting: values[4],
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Every weight must be a percentage and together they must make 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(component) = ScoreComponent::ALL
            .into_iter()
            .find(|c| self.weight(*c) > 100)
        {
            return Err(ConfigError::WeightOutOfRange {
                component: component.label(),
                weight: self.weight(component),
            });
        }
        match self.total() {
            100 => Ok(()),
            other => Err(ConfigError::WeightsSum(other)),
        }
    }

    /// Saturates instead of wrapping, so an oversized weight can never sum to 100.
    pub fn total(&self) -> u32 {
        ScoreComponent::ALL
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(self.weight(*c)))
    }

    pub fn weight(&self, component: ScoreComponent) -> u32 {
        match component {
            ScoreComponent::KeywordMatch => self.keyword_match,
            ScoreComponent::Structure => self.structure,
            ScoreComponent::ContentQuality => self.content_quality,
            ScoreComponent::TechnicalSkills => self.technical_skills,
            ScoreComponent::AtsFormatting => self.ats_formatting,
        }
    }
}

/// Signals the content-quality subscore is computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentSignals {
    pub readability: f64,
    pub word_count: usize,
    pub quantified_achievements: usize,
    pub enhancement_opportunities: usize,
}

/// Share of the compared job keywords found in the CV. Non-decreasing in overlap.
pub fn keyword_match_score(comparison: &KeywordComparison) -> f64 {
    clamp(comparison.match_percentage)
}

pub fn structure_score(s: &StructureAnalysis) -> f64 {
    let mut score = 0.0;

    // Essential sections
    if s.has_contact_info {
        score += 10.0;
    }
    if s.has_summary {
        score += 10.0;
    }
    if s.has_experience {
        score += 15.0;
    }
    if s.has_education {
        score += 5.0;
    }

    // Good practice
    if s.has_skills {
        score += 10.0;
    }
    if s.uses_bullet_points {
        score += 10.0;
    }
    if s.has_quantified_achievements {
        score += 10.0;
    }

    // Overall shape
    if s.appropriate_length {
        score += 15.0;
    }
    score += match s.section_count {
        n if n >= 5 => 15.0,
        n if n >= 3 => 10.0,
        2 => 5.0,
        _ => 0.0,
    };

    clamp(score)
}

pub fn content_quality_score(signals: &ContentSignals) -> f64 {
    let mut score = 50.0;

    if signals.readability >= 60.0 {
        score += 20.0;
    } else if signals.readability >= 40.0 {
        score += 10.0;
    }

    score += match signals.word_count {
        300..=800 => 15.0,
        200..=1000 => 10.0,
        _ => 5.0,
    };

    if signals.quantified_achievements > 0 {
        score += 10.0;
    }

    score -= (signals.enhancement_opportunities.min(5) * 3) as f64;
    clamp(score)
}

/// Banded share of the job's technical skills the CV covers; neutral 70 when the
/// job names none.
pub fn technical_skills_score(comparison: &KeywordComparison) -> f64 {
    let matched = comparison.matched_technical.len();
    let total = matched + comparison.missing_technical.len();
    if total == 0 {
        return 70.0;
    }
    let ratio = matched as f64 / total as f64;
    match ratio {
        r if r >= 0.8 => 95.0,
        r if r >= 0.6 => 85.0,
        r if r >= 0.4 => 70.0,
        r if r >= 0.2 => 55.0,
        _ => 35.0,
    }
}

pub fn ats_formatting_score(s: &StructureAnalysis) -> f64 {
    clamp(100.0 - 15.0 * s.formatting_issues.len() as f64)
}

/// Combines the five subscores: `total = round(Σ weight·score / 100)`.
pub fn compute_breakdown(
    comparison: &KeywordComparison,
    structure: &StructureAnalysis,
    content: &ContentSignals,
    weights: ScoringWeights,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown {
        keyword_match: keyword_match_score(comparison),
        structure: structure_score(structure),
        content_quality: content_quality_score(content),
        technical_skills: technical_skills_score(comparison),
        ats_formatting: ats_formatting_score(structure),
        total: 0,
        weights,
    };
    let weighted: f64 = breakdown
        .components()
        .iter()
        .map(|(component, score)| weights.weight(*component) as f64 * score)
        .sum();
    breakdown.total = (weighted / 100.0).round().clamp(0.0, 100.0) as u32;
    breakdown
}

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}
