//! Keyword Extractor — tokenizes CV and job-description text into weighted keyword sets.
//!
//! Both sides go through the same normalization and stopword list so their sets are
//! comparable. Job-description terms are additionally weighted by the section they
//! appear in.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::impact::{action_verbs_used, quantified_achievements};

/// Multi-word terms counted as a single keyword.
const PHRASES: &[&[&str]] = &[
    &["natural", "language", "processing"],
    &["machine", "learning"],
    &["deep", "learning"],
    &["data", "analysis"],
    &["data", "science"],
    &["data", "engineering"],
    &["computer", "vision"],
    &["project", "management"],
    &["product", "management"],
    &["problem", "solving"],
    &["critical", "thinking"],
    &["time", "management"],
    &["cloud", "computing"],
    &["software", "engineering"],
    &["unit", "testing"],
    &["continuous", "integration"],
    &["full", "stack"],
    &["user", "experience"],
    &["customer", "service"],
    &["business", "intelligence"],
];

/// Curated technical skill catalogue, grouped as the report displays them.
pub const TECHNICAL_SKILLS: &[(&str, &[&str])] = &[
    (
        "programming",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "php", "ruby", "go",
            "rust", "swift", "kotlin", "scala",
        ],
    ),
    (
        "web",
        &[
            "html", "css", "react", "vue", "angular", "node.js", "express", "django", "flask",
            "graphql",
        ],
    ),
    (
        "data",
        &[
            "sql", "mongodb", "postgresql", "mysql", "redis", "pandas", "numpy",
            "scikit-learn", "tensorflow", "pytorch", "spark", "kafka",
        ],
    ),
    (
        "cloud",
        &[
            "aws", "azure", "gcp", "docker", "kubernetes", "terraform", "jenkins", "linux",
        ],
    ),
    (
        "tools",
        &["git", "jira", "confluence", "slack", "figma", "photoshop", "excel", "tableau"],
    ),
];

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "problem solving",
    "analytical",
    "creative",
    "adaptable",
    "organized",
    "detail oriented",
    "time management",
    "collaboration",
    "critical thinking",
    "interpersonal",
    "presentation",
];

const MAX_REQUIREMENTS: usize = 10;
const MAX_QUALIFICATIONS: usize = 5;

/// Lowercases, replaces punctuation with spaces and collapses whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole-word phrase test on text already passed through [`normalize`].
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    format!(" {normalized} ").contains(&format!(" {phrase} "))
}

/// Section of a job description a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSection {
    General,
    Requirements,
    Qualifications,
    Responsibilities,
    About,
}

impl JobSection {
    /// Multiplier applied to each occurrence of a term in this section.
    pub fn weight(&self) -> f64 {
        match self {
            JobSection::Requirements => 2.0,
            JobSection::Qualifications => 1.5,
            JobSection::Responsibilities | JobSection::General => 1.0,
            JobSection::About => 0.5,
        }
    }

    /// Section named by a short heading or a "Label:" prefix, judged by its cue phrases.
    fn from_heading(heading: &str) -> Option<Self> {
        let words = normalize(heading);
        if words.is_empty() || words.split(' ').count() > 5 {
            return None;
        }
        SECTION_CUES
            .iter()
            .find(|(_, cues)| cues.iter().any(|c| contains_phrase(&words, c)))
            .map(|(section, _)| *section)
    }

    /// A line standing on its own is a heading only when it holds nothing but cue
    /// and filler words, so "Must have Python and SQL" stays content.
    fn from_bare_line(line: &str) -> Option<Self> {
        let section = Self::from_heading(line)?;
        let words = normalize(line);
        let heading_only = words.split(' ').all(|word| {
            HEADING_FILLER.iter().any(|f| *f == word)
                || SECTION_CUES
                    .iter()
                    .flat_map(|(_, cues)| cues.iter())
                    .any(|cue| cue.split(' ').any(|w| w == word))
        });
        heading_only.then_some(section)
    }
}

const SECTION_CUES: &[(JobSection, &[&str])] = &[
    (
        JobSection::Requirements,
        &["requirements", "requirement", "required", "must have", "essential", "mandatory", "what you ll need", "what you need"],
    ),
    (
        JobSection::Qualifications,
        &["qualifications", "qualification", "education", "degree", "preferred", "nice to have", "bonus"],
    ),
    (
        JobSection::Responsibilities,
        &["responsibilities", "duties", "what you ll do", "the role", "your role"],
    ),
    (
        JobSection::About,
        &["about", "who we are", "benefits", "perks", "our company", "why join"],
    ),
];

const HEADING_FILLER: &[&str] = &[
    "a", "additional", "and", "are", "basic", "company", "core", "desired", "experience", "job",
    "key", "main", "minimum", "offer", "our", "position", "skills", "team", "the", "us", "we",
    "you", "your",
];

/// A single normalized term with its occurrence count and accumulated weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub term: String,
    pub frequency: u32,
    /// Sum of the section weights of every occurrence.
    pub weight: f64,
}

/// Normalized term → frequency/weight. Ordered so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    terms: BTreeMap<String, KeywordEntry>,
}

impl KeywordSet {
    fn add(&mut self, term: String, weight: f64) {
        let entry = self.terms.entry(term.clone()).or_insert(KeywordEntry {
            term,
            frequency: 0,
            weight: 0.0,
        });
        entry.frequency += 1;
        entry.weight += weight;
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn get(&self, term: &str) -> Option<&KeywordEntry> {
        self.terms.get(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The `n` heaviest terms; ties broken by frequency, then alphabetically.
    pub fn top(&self, n: usize) -> Vec<&KeywordEntry> {
        let mut entries: Vec<&KeywordEntry> = self.terms.values().collect();
        entries.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then(b.frequency.cmp(&a.frequency))
                .then(a.term.cmp(&b.term))
        });
        entries.truncate(n);
        entries
    }
}

/// Everything extracted from a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobKeywords {
    pub keywords: KeywordSet,
    pub technical_skills: BTreeSet<String>,
    pub soft_skills: Vec<String>,
    pub requirements: Vec<String>,
    pub qualifications: Vec<String>,
}

/// Everything extracted from a CV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvKeywords {
    pub keywords: KeywordSet,
    pub technical_skills: BTreeSet<String>,
    pub action_verbs: Vec<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub cv_keyword_count: usize,
    pub job_keyword_count: usize,
    pub density_ratio: f64,
}

/// Overlap between the top job-description keywords and the CV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordComparison {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub matched_technical: Vec<String>,
    pub missing_technical: Vec<String>,
    /// Share of the compared job keywords found in the CV, 0–100.
    pub match_percentage: f64,
    /// Same share, each keyword counted by its section weight.
    pub weighted_match_percentage: f64,
    pub keyword_density: KeywordDensity,
}

pub struct KeywordExtractor {
    stopwords: HashSet<String>,
    limit: usize,
}

impl KeywordExtractor {
    pub fn new(stopwords: &[String], limit: usize) -> Self {
        Self {
            stopwords: stopwords.iter().map(|w| w.trim().to_lowercase()).collect(),
            limit,
        }
    }

    /// Normalized terms of `text`: phrases merged, stopwords, short words and
    /// bare numbers dropped.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let normalized = normalize(text);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let mut terms = Vec::new();
        let mut i = 0;
        'outer: while i < tokens.len() {
            for phrase in PHRASES {
                if tokens[i..].starts_with(phrase) {
                    terms.push(phrase.join(" "));
                    i += phrase.len();
                    continue 'outer;
                }
            }
            let token = tokens[i];
            if token.chars().count() > 2
                && !self.stopwords.contains(token)
                && !token.chars().all(|c| c.is_ascii_digit())
            {
                terms.push(token.to_string());
            }
            i += 1;
        }
        terms
    }

    pub fn extract_cv(&self, cv_text: &str) -> CvKeywords {
        let mut keywords = KeywordSet::default();
        for term in self.terms(cv_text) {
            keywords.add(term, 1.0);
        }
        CvKeywords {
            keywords,
            technical_skills: technical_skills(cv_text),
            action_verbs: action_verbs_used(cv_text),
            achievements: quantified_achievements(cv_text),
        }
    }

    pub fn extract_job(&self, job_description: &str) -> JobKeywords {
        let mut keywords = KeywordSet::default();
        let mut requirements = Vec::new();
        let mut qualifications = Vec::new();
        let mut section = JobSection::General;

        for line in job_description.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            // "Requirements: Python, SQL" switches section and keeps the tail as content.
            let labelled = line
                .split_once(':')
                .and_then(|(head, tail)| JobSection::from_heading(head).map(|s| (s, tail)));
            let (content, is_heading) = match labelled {
                Some((heading, tail)) => {
                    section = heading;
                    (tail.trim(), false)
                }
                None if !starts_with_bullet(line) => match JobSection::from_bare_line(line) {
                    Some(heading) => {
                        section = heading;
                        (line, true)
                    }
                    None => (line, false),
                },
                None => (line, false),
            };
            // Heading words ("Benefits", "Duties") name a section, they are not asks.
            if is_heading {
                continue;
            }

            for term in self.terms(content) {
                keywords.add(term, section.weight());
            }

            let item = strip_bullet(content);
            match section {
                JobSection::Requirements
                    if item.chars().count() > 10 && requirements.len() < MAX_REQUIREMENTS =>
                {
                    requirements.push(item.to_string())
                }
                JobSection::Qualifications
                    if item.chars().count() > 5 && qualifications.len() < MAX_QUALIFICATIONS =>
                {
                    qualifications.push(item.to_string())
                }
                _ => {}
            }
        }

        JobKeywords {
            keywords,
            technical_skills: technical_skills(job_description),
            soft_skills: soft_skills(job_description),
            requirements,
            qualifications,
        }
    }

    /// Compares the top job keywords against the whole CV keyword set.
    pub fn compare(&self, cv: &CvKeywords, job: &JobKeywords) -> KeywordComparison {
        let important = job.keywords.top(self.limit);

        let mut matched_keywords = Vec::new();
        let mut missing_keywords = Vec::new();
        let mut matched_weight = 0.0;
        let mut total_weight = 0.0;
        for entry in &important {
            total_weight += entry.weight;
            if cv.keywords.contains(&entry.term) {
                matched_weight += entry.weight;
                matched_keywords.push(entry.term.clone());
            } else {
                missing_keywords.push(entry.term.clone());
            }
        }

        let (matched_technical, missing_technical): (Vec<String>, Vec<String>) = job
            .technical_skills
            .iter()
            .cloned()
            .partition(|skill| cv.technical_skills.contains(skill));

        let match_percentage = if important.is_empty() {
            0.0
        } else {
            round2(matched_keywords.len() as f64 / important.len() as f64 * 100.0)
        };
        let weighted_match_percentage = if total_weight > 0.0 {
            round2(matched_weight / total_weight * 100.0)
        } else {
            0.0
        };

        let cv_keyword_count = cv.keywords.len().min(self.limit);
        let job_keyword_count = important.len();
        KeywordComparison {
            matched_keywords,
            missing_keywords,
            matched_technical,
            missing_technical,
            match_percentage,
            weighted_match_percentage,
            keyword_density: KeywordDensity {
                cv_keyword_count,
                job_keyword_count,
                density_ratio: if job_keyword_count > 0 {
                    round2(cv_keyword_count as f64 / job_keyword_count as f64)
                } else {
                    0.0
                },
            },
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

const BULLETS: [char; 6] = ['•', '-', '*', '▪', '●', '·'];

fn starts_with_bullet(line: &str) -> bool {
    line.starts_with(BULLETS)
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(BULLETS).trim()
}

/// Catalogue skills present in `text`. Tokenizes on a separator set that keeps
/// `+`, `#`, `.` and `-` inside tokens so `c++`, `c#` and `node.js` survive.
pub fn technical_skills(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let tokens: HashSet<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || "+#.-".contains(c)))
        .map(|t| t.trim_end_matches(['.', '-']).trim_start_matches(['.', '-']))
        .filter(|t| !t.is_empty())
        .collect();

    TECHNICAL_SKILLS
        .iter()
        .flat_map(|(_, skills)| skills.iter())
        .filter(|skill| tokens.contains(**skill))
        .map(|skill| skill.to_string())
        .collect()
}

/// Catalogue category a technical skill belongs to.
pub fn skill_category(skill: &str) -> Option<&'static str> {
    TECHNICAL_SKILLS
        .iter()
        .find(|(_, skills)| skills.contains(&skill))
        .map(|(category, _)| *category)
}

fn soft_skills(text: &str) -> Vec<String> {
    let words = normalize(text);
    SOFT_SKILLS
        .iter()
        .filter(|s| contains_phrase(&words, s))
        .map(|s| s.to_string())
        .collect()
}
