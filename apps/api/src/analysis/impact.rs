//! Impact checks on CV statements: quantified achievements, action verbs, weak phrasing.

use crate::analysis::keywords::{contains_phrase, normalize};

pub const ACTION_VERBS: &[&str] = &[
    "achieved",
    "managed",
    "led",
    "developed",
    "implemented",
    "created",
    "designed",
    "improved",
    "increased",
    "reduced",
    "optimized",
    "collaborated",
    "coordinated",
    "supervised",
    "trained",
    "analyzed",
    "evaluated",
    "researched",
    "planned",
    "launched",
    "delivered",
    "built",
];

/// Verbs whose statements read much stronger with a number attached.
const QUANTIFIABLE_VERBS: &[&str] = &["managed", "led", "increased", "reduced", "improved"];

const WEAK_PHRASES: &[&str] = &[
    "responsible for",
    "duties included",
    "helped with",
    "worked on",
    "assisted with",
    "involved in",
];

const MAX_ACHIEVEMENTS: usize = 10;
const MAX_SNIPPET_CHARS: usize = 120;

/// A statement counts as quantified when it carries a number, a percentage,
/// a currency amount or an `Nx` multiplier.
pub fn is_quantified(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');
    let has_written_scale = ["million", "thousand", "billion"]
        .iter()
        .any(|w| text_lower.contains(w));
    has_digit || has_percent || has_currency || has_written_scale
}

/// Splits text into statements: lines, further split at sentence ends.
fn statements(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split(". "))
        .map(|s| s.trim().trim_start_matches(['•', '-', '*', '▪', '●']).trim())
        .filter(|s| !s.is_empty())
}

/// Statements that pair an action verb with a quantity, e.g. "Reduced costs by 20%".
pub fn quantified_achievements(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for statement in statements(text) {
        let words = normalize(statement);
        let has_verb = ACTION_VERBS.iter().any(|v| contains_phrase(&words, v));
        if has_verb && is_quantified(statement) {
            let snippet: String = statement.chars().take(MAX_SNIPPET_CHARS).collect();
            if !found.contains(&snippet) {
                found.push(snippet);
            }
            if found.len() == MAX_ACHIEVEMENTS {
                break;
            }
        }
    }
    found
}

/// Action verbs present in the text, in catalogue order.
pub fn action_verbs_used(text: &str) -> Vec<String> {
    let words = normalize(text);
    ACTION_VERBS
        .iter()
        .filter(|v| contains_phrase(&words, v))
        .map(|v| v.to_string())
        .collect()
}

/// Concrete rewrites worth making: weak phrasing, and quantifiable verbs that are
/// never accompanied by a number.
pub fn enhancement_opportunities(text: &str) -> Vec<String> {
    let words = normalize(text);
    let mut opportunities = Vec::new();

    for phrase in WEAK_PHRASES {
        if contains_phrase(&words, phrase) {
            opportunities.push(format!("Replace \"{phrase}\" with stronger action verbs"));
        }
    }

    for verb in QUANTIFIABLE_VERBS {
        let mut uses = statements(text)
            .filter(|s| contains_phrase(&normalize(s), verb))
            .peekable();
        if uses.peek().is_some() && !uses.any(is_quantified) {
            opportunities.push(format!("Add numbers/metrics to \"{verb}\" statements"));
        }
    }

    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantified_with_percentage() {
        assert!(is_quantified("Reduced latency by 40% through caching"));
    }

    #[test]
    fn test_quantified_with_currency() {
        assert!(is_quantified("Saved $50,000 annually by optimizing queries"));
        assert!(is_quantified("Generated €200k in new revenue"));
    }

    #[test]
    fn test_quantified_with_written_scale() {
        assert!(is_quantified("Grew revenue to two million"));
    }

    #[test]
    fn test_not_quantified_without_metrics() {
        assert!(!is_quantified("Improved the user experience"));
    }

    #[test]
    fn test_achievement_needs_verb_and_number() {
        let text = "• Increased sales by 25% in 6 months\n• Python, SQL, 5 years\n• Led the migration";
        let found = quantified_achievements(text);
        assert_eq!(found, vec!["Increased sales by 25% in 6 months".to_string()]);
    }

    #[test]
    fn test_achievements_split_on_sentences() {
        let text = "Managed 8 engineers. Reduced cloud spend by $40k.";
        assert_eq!(quantified_achievements(text).len(), 2);
    }

    #[test]
    fn test_led_does_not_match_inside_skilled() {
        assert!(action_verbs_used("Skilled communicator").is_empty());
        assert_eq!(action_verbs_used("Led a team"), vec!["led".to_string()]);
    }

    #[test]
    fn test_weak_phrase_flagged() {
        let ops = enhancement_opportunities("Responsible for the reporting pipeline");
        assert!(ops.iter().any(|o| o.contains("responsible for")));
    }

    #[test]
    fn test_unquantified_verb_flagged_once() {
        let ops = enhancement_opportunities("Managed the support desk\nManaged vendors");
        assert_eq!(
            ops,
            vec!["Add numbers/metrics to \"managed\" statements".to_string()]
        );
    }

    #[test]
    fn test_quantified_verb_not_flagged() {
        let ops = enhancement_opportunities("Managed 12 vendors\nManaged the desk");
        assert!(ops.is_empty());
    }
}
