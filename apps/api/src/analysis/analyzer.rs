//! CV Analyzer — runs the deterministic pipeline: keywords → structure → content →
//! scoring → summary and rule-based suggestions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::impact::enhancement_opportunities;
use crate::analysis::keywords::{KeywordComparison, KeywordExtractor};
use crate::analysis::readability::flesch_reading_ease;
use crate::analysis::report::ScoreSummary;
use crate::analysis::scoring::{compute_breakdown, ContentSignals, ScoringWeights};
use crate::analysis::structure::{analyze_structure, StructureAnalysis};
use crate::analysis::suggestions::rule_suggestions;
use crate::config::AnalysisSettings;
use crate::models::analysis::{ScoreBreakdown, SuggestionRecord};
use crate::models::document::LayoutSignals;

/// What the job description asks for, as extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInsights {
    pub requirements: Vec<String>,
    pub qualifications: Vec<String>,
    pub soft_skills: Vec<String>,
    pub technical_skills: BTreeSet<String>,
}

/// Full result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub breakdown: ScoreBreakdown,
    pub summary: ScoreSummary,
    pub keywords: KeywordComparison,
    pub structure: StructureAnalysis,
    pub readability: f64,
    pub word_count: usize,
    pub action_verbs: Vec<String>,
    pub achievements: Vec<String>,
    pub enhancement_opportunities: Vec<String>,
    pub job: JobInsights,
    pub suggestions: Vec<SuggestionRecord>,
}

pub struct CvAnalyzer {
    extractor: KeywordExtractor,
    weights: ScoringWeights,
}

impl CvAnalyzer {
    pub fn new(settings: &AnalysisSettings) -> Self {
        Self {
            extractor: KeywordExtractor::new(&settings.stopwords, settings.keyword_limit),
            weights: settings.weights,
        }
    }

    pub fn analyze(&self, cv_text: &str, layout: LayoutSignals, job_description: &str) -> AnalysisReport {
        let cv = self.extractor.extract_cv(cv_text);
        let job = self.extractor.extract_job(job_description);
        let comparison = self.extractor.compare(&cv, &job);

        let structure = analyze_structure(cv_text, layout);
        let readability = flesch_reading_ease(cv_text);
        let opportunities = enhancement_opportunities(cv_text);
        let content = ContentSignals {
            readability,
            word_count: structure.word_count,
            quantified_achievements: cv.achievements.len(),
            enhancement_opportunities: opportunities.len(),
        };

        let breakdown = compute_breakdown(&comparison, &structure, &content, self.weights);
        let summary = ScoreSummary::from_breakdown(&breakdown);
        let suggestions = rule_suggestions(&comparison, &structure, &cv.action_verbs);

        debug!(
            total = breakdown.total,
            keyword_match = breakdown.keyword_match,
            structure = breakdown.structure,
            content_quality = breakdown.content_quality,
            technical_skills = breakdown.technical_skills,
            ats_formatting = breakdown.ats_formatting,
            "Scored CV"
        );

        AnalysisReport {
            breakdown,
            summary,
            keywords: comparison,
            readability,
            word_count: structure.word_count,
            structure,
            action_verbs: cv.action_verbs,
            achievements: cv.achievements,
            enhancement_opportunities: opportunities,
            job: JobInsights {
                requirements: job.requirements,
                qualifications: job.qualifications,
                soft_skills: job.soft_skills,
                technical_skills: job.technical_skills,
            },
            suggestions,
        }
    }
}
