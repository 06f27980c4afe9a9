//! Prompt builders for every assistant feature. Inputs are cut to fixed excerpt
//! lengths so prompts stay inside a small local model's context window.

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalysisReport;
use crate::analysis::sections::CvSection;
use crate::assistant::GenerationOptions;
use crate::models::analysis::{ScoreBreakdown, SuggestionRecord};

const PERSONA: &str = "You are Dianelle, an expert AI career advisor and ATS optimization specialist. \
You are friendly, encouraging, and provide practical advice.";

pub fn analysis_options() -> GenerationOptions {
    GenerationOptions::new(0.3, 1500)
}

pub fn enhance_options() -> GenerationOptions {
    GenerationOptions::new(0.4, 800)
}

pub fn cover_letter_options() -> GenerationOptions {
    GenerationOptions::new(0.5, 1000)
}

pub fn chat_options() -> GenerationOptions {
    GenerationOptions::new(0.7, 1000)
}

pub fn help_options() -> GenerationOptions {
    GenerationOptions::new(0.3, 800)
}

pub fn advice_options() -> GenerationOptions {
    GenerationOptions::new(0.5, 1000)
}

/// At most `max_chars` characters of `text`, cut on a char boundary.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Like [`excerpt`], with a trailing ellipsis when something was cut.
fn excerpt_marked(text: &str, max_chars: usize) -> String {
    let cut = excerpt(text, max_chars);
    if cut.len() < text.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

fn breakdown_lines(breakdown: &ScoreBreakdown) -> String {
    let mut lines = vec![format!("Overall: {}/100", breakdown.total)];
    for (component, score) in breakdown.components() {
        lines.push(format!("- {}: {:.1}/100", component.label(), score));
    }
    lines.join("\n")
}

/// Structured CV review. The reply format is what `parse::parse_analysis` reads.
pub fn analysis_prompt(cv_text: &str, job_description: &str, breakdown: &ScoreBreakdown) -> String {
    format!(
        "{PERSONA}

Please analyze the following CV against the job description and provide detailed feedback.

JOB DESCRIPTION:
{job}

CV CONTENT:
{cv}

AUTOMATED SCORE BREAKDOWN:
{scores}

Please provide your analysis in the following format:

STRENGTHS:
- List 3-5 key strengths of this CV

AREAS FOR IMPROVEMENT:
- List 3-5 specific areas that need improvement

MISSING KEYWORDS:
- List important keywords from the job description that are missing from the CV

ATS OPTIMIZATION SCORE: X/100
- Provide a score and brief explanation

SPECIFIC RECOMMENDATIONS:
- Provide 3-5 specific, actionable recommendations to improve this CV",
        job = excerpt(job_description, 2500),
        cv = excerpt(cv_text, 3000),
        scores = breakdown_lines(breakdown),
    )
}

pub fn enhance_section_prompt(section: CvSection, content: &str, job_requirements: &str) -> String {
    let name = section.label().to_lowercase();
    format!(
        "You are Dianelle, a professional AI career advisor and CV writer. Please enhance the \
following {name} section to better match the job requirements while maintaining truthfulness.

CURRENT {upper} SECTION:
{content}

JOB REQUIREMENTS:
{requirements}

Please rewrite this section to:
1. Include relevant keywords naturally
2. Use strong action verbs
3. Quantify achievements where possible
4. Make it more ATS-friendly
5. Keep it professional and truthful

Enhanced {name} section:",
        upper = name.to_uppercase(),
        content = excerpt(content, 2000),
        requirements = excerpt(job_requirements, 1500),
    )
}

pub fn cover_letter_prompt(cv_text: &str, job_description: &str, company_name: Option<&str>) -> String {
    format!(
        "You are Dianelle, a professional AI career advisor and cover letter writer. Create a \
compelling and personalized cover letter based on the following information:

CV SUMMARY:
{cv}

JOB DESCRIPTION:
{job}

COMPANY: {company}

Please write a professional cover letter that:
1. Shows enthusiasm for the role
2. Highlights relevant experience from the CV
3. Addresses key job requirements
4. Is personalized and engaging
5. Is approximately 300-400 words

Cover Letter:",
        cv = excerpt(cv_text, 1500),
        job = excerpt(job_description, 1500),
        company = company_name.unwrap_or("[Company Name]"),
    )
}

/// Step-by-step guidance for acting on one suggestion.
pub fn suggestion_help_prompt(suggestion: &SuggestionRecord) -> String {
    format!(
        "{PERSONA}

The user needs detailed help with this CV improvement suggestion:

Title: {title}
Description: {text}
Category: {category}

Please provide:
1. Step-by-step instructions on how to implement this improvement
2. Specific examples of good vs. bad implementations
3. Common mistakes to avoid
4. Tools or resources that might help

Keep it practical and actionable.",
        title = suggestion.title,
        text = excerpt(&suggestion.text, 1000),
        category = suggestion.category,
    )
}

/// Kinds of targeted advice a user can ask for after an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceTopic {
    OverallStrategy,
    SectionEnhancement,
    KeywordOptimization,
    AchievementQuantification,
    ProfessionalSummary,
    SkillsSection,
    IndustryAdvice,
}

impl AdviceTopic {
    pub fn label(&self) -> &'static str {
        match self {
            AdviceTopic::OverallStrategy => "Overall CV improvement strategy",
            AdviceTopic::SectionEnhancement => "Specific section enhancement",
            AdviceTopic::KeywordOptimization => "Keyword optimization",
            AdviceTopic::AchievementQuantification => "Achievement quantification",
            AdviceTopic::ProfessionalSummary => "Professional summary writing",
            AdviceTopic::SkillsSection => "Skills section improvement",
            AdviceTopic::IndustryAdvice => "Industry-specific advice",
        }
    }
}

pub fn advice_prompt(topic: AdviceTopic, report: &AnalysisReport) -> String {
    let keywords = &report.keywords;
    let missing_skills = if keywords.missing_technical.is_empty() {
        &keywords.missing_keywords
    } else {
        &keywords.missing_technical
    };
    let request = match topic {
        AdviceTopic::OverallStrategy => format!(
            "Based on an ATS score of {}/100, with {} matched keywords and {} missing keywords, \
             what's the best strategy to improve this CV? Provide a prioritized action plan.",
            report.breakdown.total,
            keywords.matched_keywords.len(),
            keywords.missing_keywords.len()
        ),
        AdviceTopic::SectionEnhancement => "Which section of the CV should be the top priority \
            for improvement, and how should it be enhanced? Consider structure, content, and ATS \
            optimization."
            .to_string(),
        AdviceTopic::KeywordOptimization => format!(
            "The CV is missing these keywords: {}. How should these be naturally incorporated \
             without keyword stuffing?",
            first_n(&keywords.missing_keywords, 10)
        ),
        AdviceTopic::AchievementQuantification => "How can I better quantify my achievements \
            with numbers, percentages, and metrics? What are some effective ways to make \
            accomplishments more impactful?"
            .to_string(),
        AdviceTopic::ProfessionalSummary => "What makes an excellent professional summary that \
            passes ATS screening and engages human recruiters? Provide a template and examples."
            .to_string(),
        AdviceTopic::SkillsSection => format!(
            "How should I structure and optimize my skills section? The job requires these \
             technical skills: {}.",
            first_n(missing_skills, 5)
        ),
        AdviceTopic::IndustryAdvice => "What are the most important CV optimization strategies \
            specific to my industry and role level? Consider current market trends."
            .to_string(),
    };
    format!("{PERSONA}\n\n{request}")
}

fn first_n(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

/// Canned questions offered next to the chat box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickPrompt {
    ExplainScore,
    ImprovementTips,
    KeywordHelp,
}

impl QuickPrompt {
    /// What the transcript shows as the user's message.
    pub fn label(&self) -> &'static str {
        match self {
            QuickPrompt::ExplainScore => "Explain my CV score",
            QuickPrompt::ImprovementTips => "Give me improvement tips",
            QuickPrompt::KeywordHelp => "Help with keywords",
        }
    }

    /// The question actually put to the model.
    pub fn question(&self, total_score: Option<u32>) -> String {
        match self {
            QuickPrompt::ExplainScore => match total_score {
                Some(score) => format!(
                    "My CV received an ATS compatibility score of {score}/100. Can you explain what \
                     this score means and what factors contribute to it? Also, what should I focus \
                     on to improve this score?"
                ),
                None => "What does an ATS compatibility score measure, and what should I focus on \
                         to improve mine?"
                    .to_string(),
            },
            QuickPrompt::ImprovementTips => "Based on my CV and the job I'm targeting, what are the \
                top 5 most important improvements I should make? Please be specific and actionable."
                .to_string(),
            QuickPrompt::KeywordHelp => "Help me optimize keywords in my CV for this job. What \
                important keywords am I missing, and how should I naturally incorporate them?"
                .to_string(),
        }
    }
}

/// What the chat prompt may reference about the user's session.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChatContext<'a> {
    pub cv_text: Option<&'a str>,
    pub job_description: Option<&'a str>,
    pub report: Option<&'a AnalysisReport>,
}

pub fn chat_prompt(question: &str, ctx: ChatContext<'_>) -> String {
    let mut parts: Vec<String> = vec![
        "You are Dianelle, a helpful and friendly AI career advisor and CV expert. You provide \
         practical, specific advice with a personal touch. Always be encouraging and supportive \
         while being professional."
            .to_string(),
        String::new(),
    ];

    if let Some(cv) = ctx.cv_text.filter(|t| !t.trim().is_empty()) {
        parts.push("USER'S CV CONTENT (first 1000 chars):".to_string());
        parts.push(excerpt_marked(cv, 1000));
        parts.push(String::new());
    }
    if let Some(job) = ctx.job_description.filter(|t| !t.trim().is_empty()) {
        parts.push("TARGET JOB DESCRIPTION (first 800 chars):".to_string());
        parts.push(excerpt_marked(job, 800));
        parts.push(String::new());
    }
    if let Some(report) = ctx.report {
        parts.push("CV ANALYSIS SUMMARY:".to_string());
        parts.push(format!("- ATS Score: {}/100", report.breakdown.total));
        parts.push(format!(
            "- Matched Keywords: {}",
            report.keywords.matched_keywords.len()
        ));
        parts.push(format!(
            "- Missing Keywords: {}",
            report.keywords.missing_keywords.len()
        ));
        parts.push(String::new());
    }

    parts.push(format!("USER QUESTION: {question}"));
    parts.push(String::new());
    parts.push(
        "As Dianelle, provide a helpful, specific response with a friendly and encouraging tone. \
         If relevant, reference their CV or job description. Keep it concise but actionable."
            .to_string(),
    );
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scoring::ScoringWeights;

    fn breakdown() -> ScoreBreakdown {
        ScoreBreakdown {
            keyword_match: 66.67,
            structure: 80.0,
            content_quality: 75.0,
            technical_skills: 70.0,
            ats_formatting: 100.0,
            total: 75,
            weights: ScoringWeights::default(),
        }
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo", 2), "hé");
        assert_eq!(excerpt("abc", 10), "abc");
        assert_eq!(excerpt_marked("abcdef", 3), "abc...");
        assert_eq!(excerpt_marked("abc", 3), "abc");
    }

    #[test]
    fn test_analysis_prompt_embeds_breakdown_and_truncates() {
        let cv = "x".repeat(5000);
        let prompt = analysis_prompt(&cv, "Python role", &breakdown());
        assert!(prompt.contains("Overall: 75/100"));
        assert!(prompt.contains("- Keyword Match: 66.7/100"));
        assert!(prompt.contains("SPECIFIC RECOMMENDATIONS:"));
        assert!(prompt.contains(&"x".repeat(3000)));
        assert!(!prompt.contains(&"x".repeat(3001)));
    }

    #[test]
    fn test_enhance_prompt_names_section() {
        let prompt = enhance_section_prompt(CvSection::Experience, "Led a team", "Rust");
        assert!(prompt.contains("CURRENT EXPERIENCE SECTION:\nLed a team"));
        assert!(prompt.ends_with("Enhanced experience section:"));
    }

    #[test]
    fn test_cover_letter_placeholder_company() {
        assert!(cover_letter_prompt("cv", "jd", None).contains("COMPANY: [Company Name]"));
        assert!(cover_letter_prompt("cv", "jd", Some("Acme")).contains("COMPANY: Acme"));
    }

    #[test]
    fn test_chat_prompt_includes_only_available_context() {
        let bare = chat_prompt("How long should my CV be?", ChatContext::default());
        assert!(!bare.contains("USER'S CV CONTENT"));
        assert!(bare.contains("USER QUESTION: How long should my CV be?"));

        let long_cv = "y".repeat(1200);
        let with_cv = chat_prompt(
            "Hi",
            ChatContext {
                cv_text: Some(&long_cv),
                job_description: Some("Rust engineer"),
                report: None,
            },
        );
        assert!(with_cv.contains(&format!("{}...", "y".repeat(1000))));
        assert!(with_cv.contains("TARGET JOB DESCRIPTION (first 800 chars):\nRust engineer\n"));
    }

    #[test]
    fn test_help_prompt_names_the_suggestion() {
        let suggestion = SuggestionRecord {
            title: "Use Bullet Points".to_string(),
            text: "Format achievements as bullets".to_string(),
            priority: crate::models::analysis::Priority::Medium,
            category: "formatting".to_string(),
            origin: crate::models::analysis::SuggestionOrigin::Rules,
        };
        let prompt = suggestion_help_prompt(&suggestion);
        assert!(prompt.contains("Title: Use Bullet Points"));
        assert!(prompt.contains("Category: formatting"));
    }

    #[test]
    fn test_advice_topics_parse_from_snake_case() {
        let topic: AdviceTopic = serde_json::from_str("\"achievement_quantification\"").unwrap();
        assert_eq!(topic, AdviceTopic::AchievementQuantification);
        assert_eq!(topic.label(), "Achievement quantification");
        assert_eq!(first_n(&["a".to_string(), "b".to_string(), "c".to_string()], 2), "a, b");
    }

    #[test]
    fn test_quick_prompt_questions() {
        assert!(QuickPrompt::ExplainScore.question(Some(72)).contains("72/100"));
        assert_eq!(QuickPrompt::KeywordHelp.label(), "Help with keywords");
        let parsed: QuickPrompt = serde_json::from_str("\"improvement_tips\"").unwrap();
        assert_eq!(parsed, QuickPrompt::ImprovementTips);
    }
}
