//! Score summary (grade, percentile, strengths, next steps) and the plain-text report.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::models::analysis::{ScoreBreakdown, ScoreComponent};

const STRENGTH_THRESHOLD: f64 = 80.0;
const WEAKNESS_THRESHOLD: f64 = 60.0;
const MAX_NEXT_STEPS: usize = 5;

/// Reference totals a CV is benchmarked against.
pub const INDUSTRY_AVERAGE: u32 = 65;
pub const TOP_QUARTILE: u32 = 80;
pub const TOP_DECILE: u32 = 90;

/// Coarse band a total score falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
    Poor,
}

impl ScoreBand {
    pub fn from_total(total: u32) -> Self {
        match total {
            90.. => ScoreBand::Excellent,
            75..=89 => ScoreBand::Good,
            60..=74 => ScoreBand::Average,
            40..=59 => ScoreBand::NeedsImprovement,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Average => "Average",
            ScoreBand::NeedsImprovement => "Needs Improvement",
            ScoreBand::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub grade: String,
    /// Rough standing against typical CVs.
    pub percentile: u32,
    pub improvement_potential: u32,
    pub band: ScoreBand,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
    pub benchmark: Benchmark,
}

impl ScoreSummary {
    pub fn from_breakdown(breakdown: &ScoreBreakdown) -> Self {
        Self {
            grade: grade(breakdown.total).to_string(),
            percentile: percentile(breakdown.total),
            improvement_potential: 100u32.saturating_sub(breakdown.total),
            band: ScoreBand::from_total(breakdown.total),
            strengths: strengths(breakdown),
            weaknesses: weaknesses(breakdown),
            next_steps: next_steps(breakdown),
            benchmark: Benchmark::for_total(breakdown.total),
        }
    }
}

/// A total placed against the industry reference points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub score: u32,
    pub industry_average: u32,
    pub top_quartile: u32,
    pub top_decile: u32,
    /// Percentile rank among benchmarked CVs.
    pub percentile: u32,
    pub points_to_top_quartile: u32,
    pub verdict: String,
}

impl Benchmark {
    pub fn for_total(total: u32) -> Self {
        let percentile = match total {
            90.. => 95,
            80..=89 => 85,
            70..=79 => 70,
            60..=69 => 55,
            _ => 30,
        };
        let verdict = match percentile {
            80.. => "Excellent! Your CV is better than most candidates",
            60..=79 => "Good performance, with room for improvement",
            _ => "Focus on improvements to compete effectively",
        };
        Self {
            score: total,
            industry_average: INDUSTRY_AVERAGE,
            top_quartile: TOP_QUARTILE,
            top_decile: TOP_DECILE,
            percentile,
            points_to_top_quartile: TOP_QUARTILE.saturating_sub(total),
            verdict: verdict.to_string(),
        }
    }
}

pub fn grade(total: u32) -> &'static str {
    match total {
        90.. => "A+",
        85..=89 => "A",
        80..=84 => "A-",
        75..=79 => "B+",
        70..=74 => "B",
        65..=69 => "B-",
        60..=64 => "C+",
        55..=59 => "C",
        50..=54 => "C-",
        _ => "D",
    }
}

pub fn percentile(total: u32) -> u32 {
    match total {
        85.. => 95,
        75..=84 => 80,
        65..=74 => 60,
        55..=64 => 40,
        _ => 20,
    }
}

fn strength_message(component: ScoreComponent) -> &'static str {
    match component {
        ScoreComponent::KeywordMatch => "Excellent keyword optimization for ATS systems",
        ScoreComponent::Structure => "Well-organized CV with all essential sections",
        ScoreComponent::ContentQuality => "High-quality, readable content with good flow",
        ScoreComponent::TechnicalSkills => "Strong technical skills alignment with job requirements",
        ScoreComponent::AtsFormatting => "ATS-friendly formatting and structure",
    }
}

fn weakness_message(component: ScoreComponent) -> &'static str {
    match component {
        ScoreComponent::KeywordMatch => "Low keyword matching - missing important job-related terms",
        ScoreComponent::Structure => "CV structure needs improvement - missing key sections",
        ScoreComponent::ContentQuality => "Content quality could be enhanced with better writing",
        ScoreComponent::TechnicalSkills => "Technical skills section needs strengthening",
        ScoreComponent::AtsFormatting => "Formatting issues may cause ATS parsing problems",
    }
}

fn step_recommendations(component: ScoreComponent) -> [&'static str; 2] {
    match component {
        ScoreComponent::KeywordMatch => [
            "Review job description and identify missing keywords",
            "Naturally incorporate relevant keywords throughout your CV",
        ],
        ScoreComponent::Structure => [
            "Add missing essential sections (contact, summary, experience, education)",
            "Reorganize content with clear section headers",
        ],
        ScoreComponent::ContentQuality => [
            "Quantify achievements with specific numbers and metrics",
            "Use strong action verbs to start bullet points",
        ],
        ScoreComponent::TechnicalSkills => [
            "Add relevant technical skills mentioned in job posting",
            "Create dedicated skills section if missing",
        ],
        ScoreComponent::AtsFormatting => [
            "Use simple, ATS-friendly formatting",
            "Avoid tables, graphics, and unusual fonts",
        ],
    }
}

fn strengths(breakdown: &ScoreBreakdown) -> Vec<String> {
    let strong: Vec<String> = breakdown
        .components()
        .iter()
        .filter(|(_, score)| *score >= STRENGTH_THRESHOLD)
        .map(|(c, _)| strength_message(*c).to_string())
        .collect();
    if !strong.is_empty() {
        return strong;
    }
    // Nothing excellent: name the best component, first one on ties.
    let components = breakdown.components();
    let best = components
        .iter()
        .fold(components[0], |best, c| if c.1 > best.1 { *c } else { best });
    vec![format!("Relatively strong {}", best.0.label().to_lowercase())]
}

fn weaknesses(breakdown: &ScoreBreakdown) -> Vec<String> {
    breakdown
        .components()
        .iter()
        .filter(|(_, score)| *score < WEAKNESS_THRESHOLD)
        .map(|(c, _)| weakness_message(*c).to_string())
        .collect()
}

/// Two recommendations for each of the three weakest components scoring below 80.
fn next_steps(breakdown: &ScoreBreakdown) -> Vec<String> {
    let mut ranked = breakdown.components().to_vec();
    // Stable sort keeps component order on equal scores.
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
        .iter()
        .take(3)
        .filter(|(_, score)| *score < STRENGTH_THRESHOLD)
        .flat_map(|(c, _)| step_recommendations(*c))
        .take(MAX_NEXT_STEPS)
        .map(str::to_string)
        .collect()
}

/// Renders the plain-text CV assessment report.
pub fn render_text_report(breakdown: &ScoreBreakdown, summary: &ScoreSummary) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "CV ASSESSMENT REPORT");
    let _ = writeln!(out, "====================");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Overall Score: {}/100 (Grade: {})",
        breakdown.total, summary.grade
    );
    let _ = writeln!(out, "Percentile Ranking: {}th percentile", summary.percentile);
    let _ = writeln!(out, "Rating: {}", summary.band.label());
    let _ = writeln!(out);
    let _ = writeln!(out, "COMPONENT BREAKDOWN:");
    for (component, score) in breakdown.components() {
        let _ = writeln!(
            out,
            "• {}: {:.1}/100 (weight {}%)",
            component.label(),
            score,
            breakdown.weights.weight(component)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "STRENGTHS:");
    for strength in &summary.strengths {
        let _ = writeln!(out, "✓ {strength}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "AREAS FOR IMPROVEMENT:");
    for weakness in &summary.weaknesses {
        let _ = writeln!(out, "• {weakness}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "NEXT STEPS:");
    for (i, step) in summary.next_steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {step}", i + 1);
    }

    let _ = writeln!(out);
    let _ = write!(
        out,
        "Improvement Potential: {} points",
        summary.improvement_potential
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::ScoringWeights;

    fn breakdown(scores: [f64; 5], total: u32) -> ScoreBreakdown {
        ScoreBreakdown {
            keyword_match: scores[0],
            structure: scores[1],
            content_quality: scores[2],
            technical_skills: scores[3],
            ats_formatting: scores[4],
            total,
            weights: ScoringWeights::default(),
        }
    }

    #[test]
    fn test_grades_and_percentiles() {
        assert_eq!(grade(95), "A+");
        assert_eq!(grade(85), "A");
        assert_eq!(grade(72), "B");
        assert_eq!(grade(50), "C-");
        assert_eq!(grade(12), "D");
        assert_eq!(percentile(86), 95);
        assert_eq!(percentile(64), 40);
        assert_eq!(percentile(0), 20);
    }

    #[test]
    fn test_benchmark_against_industry() {
        let average = Benchmark::for_total(65);
        assert_eq!(average.industry_average, 65);
        assert_eq!(average.percentile, 55);
        assert_eq!(average.points_to_top_quartile, 15);
        assert_eq!(average.verdict, "Focus on improvements to compete effectively");

        let strong = Benchmark::for_total(92);
        assert_eq!(strong.percentile, 95);
        assert_eq!(strong.points_to_top_quartile, 0);
        assert!(strong.verdict.starts_with("Excellent"));

        assert_eq!(Benchmark::for_total(74).verdict, "Good performance, with room for improvement");
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_total(90), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_total(75), ScoreBand::Good);
        assert_eq!(ScoreBand::from_total(60), ScoreBand::Average);
        assert_eq!(ScoreBand::from_total(40), ScoreBand::NeedsImprovement);
        assert_eq!(ScoreBand::from_total(39), ScoreBand::Poor);
    }

    #[test]
    fn test_strengths_and_weaknesses() {
        let summary = ScoreSummary::from_breakdown(&breakdown([90.0, 50.0, 70.0, 85.0, 100.0], 74));
        assert_eq!(summary.strengths.len(), 3);
        assert_eq!(
            summary.weaknesses,
            vec!["CV structure needs improvement - missing key sections".to_string()]
        );
        assert_eq!(summary.improvement_potential, 26);
    }

    #[test]
    fn test_best_component_named_when_nothing_is_strong() {
        let summary = ScoreSummary::from_breakdown(&breakdown([40.0, 70.0, 60.0, 55.0, 70.0], 55));
        assert_eq!(summary.strengths, vec!["Relatively strong cv structure".to_string()]);
    }

    #[test]
    fn test_next_steps_cover_three_weakest_and_cap_at_five() {
        let summary = ScoreSummary::from_breakdown(&breakdown([10.0, 20.0, 30.0, 40.0, 50.0], 20));
        assert_eq!(summary.next_steps.len(), 5);
        assert_eq!(
            summary.next_steps[0],
            "Review job description and identify missing keywords"
        );
        assert_eq!(
            summary.next_steps[4],
            "Quantify achievements with specific numbers and metrics"
        );
    }

    #[test]
    fn test_no_next_steps_when_everything_is_strong() {
        let summary = ScoreSummary::from_breakdown(&breakdown([90.0; 5], 90));
        assert!(summary.next_steps.is_empty());
    }

    #[test]
    fn test_text_report_layout() {
        let b = breakdown([66.67, 80.0, 75.0, 70.0, 100.0], 75);
        let report = render_text_report(&b, &ScoreSummary::from_breakdown(&b));
        assert!(report.starts_with("CV ASSESSMENT REPORT\n"));
        assert!(report.contains("Overall Score: 75/100 (Grade: B+)"));
        assert!(report.contains("• Keyword Match: 66.7/100 (weight 35%)"));
        assert!(report.contains("✓ Well-organized CV with all essential sections"));
        assert!(report.ends_with("Improvement Potential: 25 points"));
    }
}
