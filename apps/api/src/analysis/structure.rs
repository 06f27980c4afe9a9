//! Structure analysis: expected sections, bullet usage, length and ATS formatting issues.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::impact::quantified_achievements;
use crate::analysis::keywords::skill_category;
use crate::analysis::sections::{detect_sections, CvSection};
use crate::models::document::LayoutSignals;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid regex")
});
static QUANTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+\s*%|[$€£]\s?\d|\b\d+(?:\.\d+)?\s*(?:million|thousand|k)\b")
        .expect("valid regex")
});
static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(?:[•\-*+▪●◦]|\d+[.)])\s").expect("valid regex"));
static WIDE_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{3,}").expect("valid regex"));

const MIN_WORDS: usize = 200;
const MAX_WORDS: usize = 1000;
const MAX_SHOUTED_WORDS: usize = 10;
const MAX_WIDE_GAPS: usize = 5;
const MAX_SPECIAL_CHARS: usize = 20;

/// Characters a CV commonly uses that ATS parsers handle fine.
const ORDINARY_SYMBOLS: &str = ".,;:()-@/&'\"+#%$€£•|’‘“”–—▪●◦*_!?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormattingIssue {
    ExcessiveCapitalization,
    InconsistentSpacing,
    SpecialCharacters,
    UnrecognizedGlyphs,
    Tables,
    Images,
}

impl FormattingIssue {
    pub fn message(&self) -> &'static str {
        match self {
            FormattingIssue::ExcessiveCapitalization => "Excessive capitalization detected",
            FormattingIssue::InconsistentSpacing => "Inconsistent spacing detected",
            FormattingIssue::SpecialCharacters => "Too many special characters",
            FormattingIssue::UnrecognizedGlyphs => {
                "Unrecognized characters found (symbol fonts or icons)"
            }
            FormattingIssue::Tables => "Tables detected; ATS parsers often scramble table cells",
            FormattingIssue::Images => "Images or graphics detected; their content is invisible to ATS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub has_contact_info: bool,
    pub has_summary: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub uses_bullet_points: bool,
    pub has_quantified_achievements: bool,
    pub appropriate_length: bool,
    pub word_count: usize,
    pub sections: Vec<CvSection>,
    pub section_count: usize,
    pub formatting_issues: Vec<FormattingIssue>,
}

pub fn analyze_structure(text: &str, layout: LayoutSignals) -> StructureAnalysis {
    let sections = detect_sections(text);
    let has = |section: CvSection| sections.contains(&section);
    let word_count = text.split_whitespace().count();

    StructureAnalysis {
        has_contact_info: EMAIL.is_match(text) || PHONE.is_match(text) || has(CvSection::Contact),
        has_summary: has(CvSection::Summary),
        has_experience: has(CvSection::Experience),
        has_education: has(CvSection::Education),
        has_skills: has(CvSection::Skills),
        uses_bullet_points: BULLET_LINE.is_match(text),
        has_quantified_achievements: QUANTITY.is_match(text)
            || !quantified_achievements(text).is_empty(),
        appropriate_length: (MIN_WORDS..=MAX_WORDS).contains(&word_count),
        word_count,
        section_count: sections.len(),
        sections,
        formatting_issues: formatting_issues(text, layout),
    }
}

pub fn formatting_issues(text: &str, layout: LayoutSignals) -> Vec<FormattingIssue> {
    let mut issues = Vec::new();

    // All-caps words, not counting technology names like SQL or AWS.
    let shouted = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() >= 3 && w.chars().all(char::is_uppercase))
        .filter(|w| skill_category(&w.to_lowercase()).is_none())
        .count();
    if shouted > MAX_SHOUTED_WORDS {
        issues.push(FormattingIssue::ExcessiveCapitalization);
    }

    if WIDE_GAP.find_iter(text).count() > MAX_WIDE_GAPS {
        issues.push(FormattingIssue::InconsistentSpacing);
    }

    let special = text
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && !ORDINARY_SYMBOLS.contains(*c))
        .count();
    if special > MAX_SPECIAL_CHARS {
        issues.push(FormattingIssue::SpecialCharacters);
    }

    if text.chars().any(is_unrecognized_glyph) {
        issues.push(FormattingIssue::UnrecognizedGlyphs);
    }
    if layout.tables > 0 {
        issues.push(FormattingIssue::Tables);
    }
    if layout.images > 0 {
        issues.push(FormattingIssue::Images);
    }

    issues
}

/// Private-use code points (icon fonts), replacement characters and stray control codes.
fn is_unrecognized_glyph(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{F8FF}' | '\u{FFFD}')
        || (c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
}
