//! CV section detection by heading lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::normalize;

/// Longest line still treated as a heading.
const MAX_HEADING_WORDS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvSection {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    /// Text before the first heading, or under a heading that is not recognised.
    Other,
}

impl CvSection {
    pub fn label(&self) -> &'static str {
        match self {
            CvSection::Contact => "Contact",
            CvSection::Summary => "Summary",
            CvSection::Experience => "Experience",
            CvSection::Education => "Education",
            CvSection::Skills => "Skills",
            CvSection::Projects => "Projects",
            CvSection::Certifications => "Certifications",
            CvSection::Other => "Other",
        }
    }

    fn cues(&self) -> &'static [&'static str] {
        match self {
            CvSection::Contact => &["contact", "contact information", "contact details", "personal details"],
            CvSection::Summary => &["summary", "profile", "objective", "about me", "professional summary", "career summary"],
            CvSection::Experience => &["experience", "employment", "work history", "career history", "professional experience"],
            CvSection::Education => &["education", "academic", "qualifications", "degree", "academic background"],
            CvSection::Skills => &["skills", "competencies", "technical skills", "expertise", "technologies"],
            CvSection::Projects => &["projects", "portfolio", "key projects"],
            CvSection::Certifications => &["certifications", "certificates", "licenses", "courses"],
            CvSection::Other => &[],
        }
    }
}

const RECOGNISED: [CvSection; 7] = [
    CvSection::Contact,
    CvSection::Summary,
    CvSection::Experience,
    CvSection::Education,
    CvSection::Skills,
    CvSection::Projects,
    CvSection::Certifications,
];

/// Qualifiers that may precede a heading word, as in "Work Experience".
const HEADING_PREFIXES: &[&str] = &[
    "work", "professional", "relevant", "career", "key", "technical", "core", "academic",
    "personal", "selected", "my",
];

/// The section a heading line opens, if it looks like one.
///
/// The line (or the label in front of a colon, as in `Skills: Rust, SQL`) must be a
/// section cue, optionally after qualifiers like "Work" or joined to another heading
/// with "and". "Strong communication skills" is content, not a heading.
pub fn heading_section(line: &str) -> Option<CvSection> {
    let line = line.trim();
    let label = match line.split_once(':') {
        Some((head, _)) => head,
        None => line,
    };
    let words = normalize(label);
    if words.is_empty() || words.split(' ').count() > MAX_HEADING_WORDS {
        return None;
    }
    let first = words.split(" and ").next().unwrap_or_default();
    section_for_cue(&words).or_else(|| section_for_cue(first))
}

fn section_for_cue(words: &str) -> Option<CvSection> {
    let mut rest = words;
    loop {
        if let Some(section) = RECOGNISED
            .into_iter()
            .find(|section| section.cues().iter().any(|cue| *cue == rest))
        {
            return Some(section);
        }
        let (head, tail) = rest.split_once(' ')?;
        if !HEADING_PREFIXES.iter().any(|p| *p == head) {
            return None;
        }
        rest = tail;
    }
}

/// Recognised sections present in the text, in first-seen order.
pub fn detect_sections(text: &str) -> Vec<CvSection> {
    let mut found = Vec::new();
    for section in text.lines().filter_map(heading_section) {
        if !found.contains(&section) {
            found.push(section);
        }
    }
    found
}

/// Splits the text into per-section bodies. The heading line is not part of the
/// body, except for the content after a `Label:` prefix. Repeated headings append.
pub fn split_sections(text: &str) -> BTreeMap<CvSection, String> {
    let mut sections: BTreeMap<CvSection, String> = BTreeMap::new();
    let mut current = CvSection::Other;

    for line in text.lines() {
        let trimmed = line.trim();
        let body = match heading_section(trimmed) {
            Some(section) => {
                current = section;
                trimmed.split_once(':').map_or("", |(_, rest)| rest.trim())
            }
            None => trimmed,
        };
        if body.is_empty() {
            continue;
        }
        let entry = sections.entry(current).or_default();
        if !entry.is_empty() {
            entry.push('\n');
        }
        entry.push_str(body);
    }
    sections
}
