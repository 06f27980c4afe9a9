//! Deterministic improvement suggestions derived from the keyword comparison and
//! structure analysis. Always available, with or without the model server.

use crate::analysis::keywords::KeywordComparison;
use crate::analysis::structure::StructureAnalysis;
use crate::models::analysis::{Priority, SuggestionOrigin, SuggestionRecord};

const LOW_MATCH_PERCENTAGE: f64 = 50.0;
const SHORT_CV_WORDS: usize = 200;
const LONG_CV_WORDS: usize = 800;

fn rule(title: &str, text: String, priority: Priority, category: &str) -> SuggestionRecord {
    SuggestionRecord {
        title: title.to_string(),
        text,
        priority,
        category: category.to_string(),
        origin: SuggestionOrigin::Rules,
    }
}

pub fn rule_suggestions(
    comparison: &KeywordComparison,
    structure: &StructureAnalysis,
    action_verbs: &[String],
) -> Vec<SuggestionRecord> {
    let mut suggestions = Vec::new();

    if comparison.match_percentage < LOW_MATCH_PERCENTAGE {
        let missing: Vec<&str> = comparison
            .missing_keywords
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        suggestions.push(rule(
            "Improve Keyword Matching",
            format!(
                "Your CV matches only {:.1}% of job keywords. Consider incorporating these missing keywords: {}",
                comparison.match_percentage,
                missing.join(", ")
            ),
            Priority::High,
            "keywords",
        ));
    }

    if !comparison.missing_technical.is_empty() {
        let missing: Vec<&str> = comparison
            .missing_technical
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        suggestions.push(rule(
            "Add Technical Skills",
            format!(
                "Include these technical skills if you have experience: {}",
                missing.join(", ")
            ),
            Priority::High,
            "technical_skills",
        ));
    }

    if !structure.has_summary {
        suggestions.push(rule(
            "Add Professional Summary",
            "Include a 2-3 sentence professional summary at the top of your CV highlighting your key qualifications.".to_string(),
            Priority::Medium,
            "structure",
        ));
    }

    if !structure.has_experience || !structure.has_education || !structure.has_skills {
        let missing: Vec<&str> = [
            (structure.has_experience, "Experience"),
            (structure.has_education, "Education"),
            (structure.has_skills, "Skills"),
        ]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, name)| name)
        .collect();
        suggestions.push(rule(
            "Add Missing Sections",
            format!(
                "Add clearly headed sections for: {}. ATS parsers look for these headings.",
                missing.join(", ")
            ),
            Priority::Medium,
            "structure",
        ));
    }

    if !structure.uses_bullet_points {
        suggestions.push(rule(
            "Use Bullet Points",
            "Format your experience and achievements using bullet points for better ATS readability.".to_string(),
            Priority::Medium,
            "formatting",
        ));
    }

    if !structure.has_quantified_achievements {
        suggestions.push(rule(
            "Quantify Your Achievements",
            "Add numbers, percentages, and metrics to your accomplishments (e.g., \"Increased sales by 25%\").".to_string(),
            Priority::High,
            "content",
        ));
    }

    if action_verbs.is_empty() {
        suggestions.push(rule(
            "Use Strong Action Verbs",
            "Start bullet points with action verbs like \"achieved,\" \"managed,\" \"developed,\" \"implemented.\"".to_string(),
            Priority::Medium,
            "content",
        ));
    }

    for issue in &structure.formatting_issues {
        suggestions.push(rule(
            "Fix Formatting",
            format!("{}. Keep the layout to plain text, one column, standard fonts.", issue.message()),
            Priority::Low,
            "formatting",
        ));
    }

    if structure.word_count < SHORT_CV_WORDS {
        suggestions.push(rule(
            "Expand Content",
            "Your CV is quite short. Consider adding more detail about your experience and achievements.".to_string(),
            Priority::Medium,
            "content",
        ));
    } else if structure.word_count > LONG_CV_WORDS {
        suggestions.push(rule(
            "Reduce Length",
            "Your CV is quite long. Consider condensing content to focus on the most relevant information.".to_string(),
            Priority::Low,
            "content",
        ));
    }

    // High first; rules keep their order within a priority.
    suggestions.sort_by_key(|s| s.priority);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::KeywordDensity;
    use crate::analysis::structure::FormattingIssue;

    fn comparison(pct: f64, missing: &[&str], missing_tech: &[&str]) -> KeywordComparison {
        KeywordComparison {
            matched_keywords: vec![],
            missing_keywords: missing.iter().map(|s| s.to_string()).collect(),
            matched_technical: vec![],
            missing_technical: missing_tech.iter().map(|s| s.to_string()).collect(),
            match_percentage: pct,
            weighted_match_percentage: pct,
            keyword_density: KeywordDensity {
                cv_keyword_count: 0,
                job_keyword_count: 0,
                density_ratio: 0.0,
            },
        }
    }

    fn good_structure() -> StructureAnalysis {
        StructureAnalysis {
            has_contact_info: true,
            has_summary: true,
            has_experience: true,
            has_education: true,
            has_skills: true,
            uses_bullet_points: true,
            has_quantified_achievements: true,
            appropriate_length: true,
            word_count: 450,
            sections: vec![],
            section_count: 5,
            formatting_issues: vec![],
        }
    }

    #[test]
    fn test_strong_cv_gets_no_rule_suggestions() {
        let out = rule_suggestions(
            &comparison(90.0, &[], &[]),
            &good_structure(),
            &["led".to_string()],
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_low_match_lists_missing_keywords() {
        let out = rule_suggestions(
            &comparison(33.3, &["kafka", "terraform"], &["kafka"]),
            &good_structure(),
            &["led".to_string()],
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Improve Keyword Matching");
        assert!(out[0].text.contains("33.3%"));
        assert!(out[0].text.contains("kafka, terraform"));
        assert_eq!(out[1].category, "technical_skills");
        assert!(out.iter().all(|s| s.origin == SuggestionOrigin::Rules));
    }

    #[test]
    fn test_missing_sections_are_named() {
        let mut structure = good_structure();
        structure.has_education = false;
        structure.has_skills = false;
        let out = rule_suggestions(&comparison(90.0, &[], &[]), &structure, &["led".to_string()]);
        assert_eq!(out.len(), 1);
        assert!(out[0].text.contains("Education, Skills"));
    }

    #[test]
    fn test_missing_experience_alone_is_suggested() {
        let mut structure = good_structure();
        structure.has_experience = false;
        let out = rule_suggestions(&comparison(90.0, &[], &[]), &structure, &["led".to_string()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Add Missing Sections");
        assert!(out[0].text.contains("sections for: Experience."));
    }

    #[test]
    fn test_sorted_by_priority() {
        let mut structure = good_structure();
        structure.has_summary = false;
        structure.has_quantified_achievements = false;
        structure.word_count = 900;
        structure.formatting_issues = vec![FormattingIssue::Tables];
        let out = rule_suggestions(&comparison(90.0, &[], &[]), &structure, &[]);
        let priorities: Vec<Priority> = out.iter().map(|s| s.priority).collect();
        assert_eq!(
            priorities,
            vec![
                Priority::High,
                Priority::Medium,
                Priority::Medium,
                Priority::Low,
                Priority::Low
            ]
        );
        assert_eq!(out[0].title, "Quantify Your Achievements");
        assert_eq!(out[4].title, "Reduce Length");
    }
}
