//! Reads the sectioned review the analysis prompt asks for and turns it into
//! `SuggestionRecord`s.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::analysis::{Priority, SuggestionOrigin, SuggestionRecord};

static SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SCORE:\s*\**\s*(\d{1,3})").expect("valid regex"));
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*•▪●]|\d+[.)])\s*").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Strengths,
    Improvements,
    MissingKeywords,
    Score,
    Recommendations,
}

impl Heading {
    fn detect(line: &str) -> Option<Self> {
        let upper = line.trim_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
            .to_uppercase();
        const HEADINGS: &[(&str, Heading)] = &[
            ("STRENGTHS", Heading::Strengths),
            ("AREAS FOR IMPROVEMENT", Heading::Improvements),
            ("MISSING KEYWORDS", Heading::MissingKeywords),
            ("ATS OPTIMIZATION SCORE", Heading::Score),
            ("SPECIFIC RECOMMENDATIONS", Heading::Recommendations),
            ("RECOMMENDATIONS", Heading::Recommendations),
        ];
        HEADINGS
            .iter()
            .find(|(label, _)| {
                upper
                    .strip_prefix(label)
                    .map_or(false, |rest| rest.is_empty() || rest.starts_with(':'))
            })
            .map(|(_, heading)| *heading)
    }
}

/// The model's review, split by section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssistantAnalysis {
    /// Score the model gave, if it gave one.
    pub score: Option<u32>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub raw: String,
}

impl AssistantAnalysis {
    fn is_structured(&self) -> bool {
        !(self.improvements.is_empty()
            && self.missing_keywords.is_empty()
            && self.recommendations.is_empty())
    }

    /// Improvements and missing keywords are high priority, recommendations medium.
    /// A reply without any of those sections becomes one medium suggestion.
    pub fn suggestions(&self) -> Vec<SuggestionRecord> {
        if !self.is_structured() {
            return vec![assistant_suggestion(
                "Assistant Feedback",
                self.raw.trim(),
                Priority::Medium,
                "general",
            )];
        }

        let mut out = Vec::new();
        for item in &self.improvements {
            out.push(assistant_suggestion(
                "Area for Improvement",
                item,
                Priority::High,
                "improvement",
            ));
        }
        for keyword in &self.missing_keywords {
            out.push(assistant_suggestion(
                "Missing Keyword",
                keyword,
                Priority::High,
                "keywords",
            ));
        }
        for item in &self.recommendations {
            out.push(assistant_suggestion(
                "Recommendation",
                item,
                Priority::Medium,
                "recommendation",
            ));
        }
        out
    }
}

fn assistant_suggestion(title: &str, text: &str, priority: Priority, category: &str) -> SuggestionRecord {
    SuggestionRecord {
        title: title.to_string(),
        text: text.to_string(),
        priority,
        category: category.to_string(),
        origin: SuggestionOrigin::Assistant,
    }
}

pub fn parse_analysis(text: &str) -> AssistantAnalysis {
    let mut analysis = AssistantAnalysis {
        score: SCORE
            .captures(text)
            .and_then(|c| c[1].parse::<u32>().ok())
            .map(|s| s.min(100)),
        raw: text.to_string(),
        ..Default::default()
    };

    let mut current: Option<Heading> = None;
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(heading) = Heading::detect(line) {
            current = Some(heading);
            // "MISSING KEYWORDS: kafka, terraform" carries items on the heading line.
            if let Some((_, rest)) = line.split_once(':') {
                let rest = rest.trim().trim_start_matches('*').trim();
                if !rest.is_empty() && heading == Heading::MissingKeywords {
                    analysis.missing_keywords.extend(split_keywords(rest));
                }
            }
            continue;
        }

        let item = LIST_MARKER.replace(line, "").trim().to_string();
        if item.is_empty() {
            continue;
        }
        match current {
            Some(Heading::Strengths) => analysis.strengths.push(item),
            Some(Heading::Improvements) => analysis.improvements.push(item),
            Some(Heading::MissingKeywords) => analysis.missing_keywords.extend(split_keywords(&item)),
            Some(Heading::Recommendations) => analysis.recommendations.push(item),
            Some(Heading::Score) | None => {}
        }
    }
    analysis
}

fn split_keywords(text: &str) -> Vec<String> {
    text.split(',')
        .map(|k| k.trim().trim_end_matches('.').trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVIEW: &str = "Here is my review.

**STRENGTHS:**
- Clear structure
- Relevant Python experience

AREAS FOR IMPROVEMENT:
1. Quantify the migration project
2. Shorten the summary

MISSING KEYWORDS:
- Kubernetes, Terraform
- machine learning

ATS OPTIMIZATION SCORE: 72/100
- Good keyword coverage overall

SPECIFIC RECOMMENDATIONS:
- Add a skills section near the top
";

    #[test]
    fn test_sections_are_split() {
        let a = parse_analysis(REVIEW);
        assert_eq!(a.score, Some(72));
        assert_eq!(a.strengths, vec!["Clear structure", "Relevant Python experience"]);
        assert_eq!(
            a.improvements,
            vec!["Quantify the migration project", "Shorten the summary"]
        );
        assert_eq!(
            a.missing_keywords,
            vec!["Kubernetes", "Terraform", "machine learning"]
        );
        assert_eq!(a.recommendations, vec!["Add a skills section near the top"]);
    }

    #[test]
    fn test_suggestion_priorities() {
        let suggestions = parse_analysis(REVIEW).suggestions();
        assert_eq!(suggestions.len(), 6);
        assert!(suggestions[..5].iter().all(|s| s.priority == Priority::High));
        assert_eq!(suggestions[5].priority, Priority::Medium);
        assert!(suggestions.iter().all(|s| s.origin == SuggestionOrigin::Assistant));
    }

    #[test]
    fn test_keywords_on_heading_line() {
        let a = parse_analysis("MISSING KEYWORDS: Docker, CI/CD.\n");
        assert_eq!(a.missing_keywords, vec!["Docker", "CI/CD"]);
    }

    #[test]
    fn test_unstructured_reply_is_single_suggestion() {
        let suggestions = parse_analysis("  Your CV looks solid; add more metrics.  ").suggestions();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].priority, Priority::Medium);
        assert_eq!(suggestions[0].text, "Your CV looks solid; add more metrics.");
    }

    #[test]
    fn test_score_is_capped() {
        assert_eq!(parse_analysis("SCORE: 250").score, Some(100));
        assert_eq!(parse_analysis("no score here").score, None);
    }
}
