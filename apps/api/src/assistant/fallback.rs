//! Canned guidance returned alongside `AssistantUnavailable` so the user still gets
//! something useful while the model server is down.

use crate::analysis::keywords::normalize;
use crate::assistant::prompts::AdviceTopic;

const SCORE_TIP: &str = "Your ATS score indicates how well your CV is optimized for applicant \
tracking systems. Focus on including relevant keywords, clear formatting, and quantified \
achievements to improve it.";

const KEYWORD_TIP: &str = "To optimize keywords: 1) Identify key terms from the job description, \
2) Naturally incorporate them throughout your CV, 3) Focus on technical skills, action verbs, and \
industry terminology, 4) Avoid keyword stuffing.";

const IMPROVE_TIP: &str = "Key CV improvements: 1) Add quantified achievements with \
numbers/percentages, 2) Use strong action verbs (achieved, managed, led), 3) Include relevant \
keywords naturally, 4) Ensure clear formatting with bullet points, 5) Tailor content to the \
specific job.";

const SUMMARY_TIP: &str = "A strong professional summary should: 1) Be 2-3 sentences long, \
2) Highlight your key qualifications, 3) Include years of experience, 4) Mention relevant \
skills/expertise, 5) Align with the target role.";

const DEFAULT_TIP: &str = "Some general tips while the assistant is offline: use keywords from \
job descriptions, quantify achievements with numbers, use action verbs, keep formatting simple \
and ATS-friendly, and tailor your CV for each application.";

const COVER_LETTER_TIP: &str = "A good cover letter opens with the role you are applying for, \
shows two or three achievements from your CV that match the job's key requirements, and closes \
with a clear call to action. Aim for 300-400 words.";

/// Offline reply to a chat message, picked by what the message asks about.
pub fn chat_reply(message: &str) -> &'static str {
    let text = normalize(message);
    let mentions = |stems: &[&str]| {
        text.split(' ')
            .any(|word| stems.iter().any(|stem| word.starts_with(stem)))
    };

    if mentions(&["score", "rating", "grade"]) {
        SCORE_TIP
    } else if mentions(&["keyword", "optimi", "ats"]) {
        KEYWORD_TIP
    } else if mentions(&["improv", "better", "enhanc", "tip"]) {
        IMPROVE_TIP
    } else if mentions(&["summary", "profile", "objective"]) {
        SUMMARY_TIP
    } else {
        DEFAULT_TIP
    }
}

/// Offline guidance for one suggestion, by its category.
pub fn suggestion_help(category: &str) -> &'static str {
    match category {
        "keywords" => "Research the job description thoroughly and identify key terms. Use \
            industry-specific language and incorporate relevant keywords naturally throughout your \
            CV. Avoid overusing keywords; aim for natural integration.",
        "structure" => "Organize your CV with clear sections: Contact Info, Professional Summary, \
            Work Experience, Education, and Skills. Use consistent formatting and clear headings. \
            Ensure logical flow from most to least relevant information.",
        "content" => "Focus on achievements rather than just responsibilities. Use the STAR \
            method (Situation, Task, Action, Result) to describe accomplishments. Include specific \
            metrics and quantifiable results wherever possible.",
        "formatting" => "Use simple, clean formatting that's ATS-friendly. Avoid tables, graphics, \
            and unusual fonts. Stick to standard fonts like Arial or Calibri. Use consistent \
            spacing and bullet points for easy scanning.",
        "technical_skills" => "List technical skills relevant to the job. Group similar skills \
            together. Include proficiency levels where appropriate. Provide context for how you've \
            used these skills in real projects.",
        "achievements" => "Quantify everything possible with numbers, percentages, dollar \
            amounts, or timeframes. Use strong action verbs. Focus on results and impact rather \
            than just tasks performed.",
        _ => "Focus on making your CV clear, relevant, and results-oriented. Tailor content to the \
            specific job and use quantifiable achievements to demonstrate your value.",
    }
}

const STRATEGY_ADVICE: &str = "Priority action plan:
1. Keywords first: add 5-7 missing job-relevant keywords naturally
2. Quantify achievements: add numbers to at least 3 bullet points
3. Professional summary: write a compelling 2-3 sentence summary
4. Skills section: reorganize skills to match job requirements
5. Format review: ensure ATS-friendly formatting throughout

Focus on high-impact changes that directly address the job requirements.";

const KEYWORD_ADVICE: &str = "Keyword integration strategy:
- Research: identify 10-15 key terms from the job posting
- Natural integration: work keywords into existing bullet points
- Skills section: add technical keywords to the skills list
- Context: use keywords within achievement descriptions
- Avoid: keyword stuffing or unnatural placement";

const QUANTIFY_ADVICE: &str = "Quantification examples:
- \"Managed team\" -> \"Managed team of 8 developers\"
- \"Improved process\" -> \"Improved process efficiency by 30%\"
- \"Increased sales\" -> \"Increased sales by $50K in 6 months\"
- \"Led project\" -> \"Led $1M project delivered 2 weeks early\"

Add metrics to show scale, impact, and timeframe.";

/// Offline answer to a typed advice request.
pub fn advice(topic: AdviceTopic) -> &'static str {
    match topic {
        AdviceTopic::KeywordOptimization => KEYWORD_ADVICE,
        AdviceTopic::AchievementQuantification => QUANTIFY_ADVICE,
        AdviceTopic::ProfessionalSummary => SUMMARY_TIP,
        _ => STRATEGY_ADVICE,
    }
}

pub fn improvement_tip() -> &'static str {
    IMPROVE_TIP
}

pub fn cover_letter_tip() -> &'static str {
    COVER_LETTER_TIP
}
