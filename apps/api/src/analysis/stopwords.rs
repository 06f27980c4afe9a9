//! Default stopword list shared by CV and job-description tokenization.

/// Common English function words.
const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "don", "should", "now", "ain", "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven",
    "isn", "mightn", "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
    "also", "etc", "within", "across", "using", "use", "well", "would", "could", "may",
];

/// Job-posting filler that says nothing about the candidate.
const POSTING_FILLER: &[&str] = &[
    "requirements", "requirement", "required", "requiring", "responsibilities",
    "responsibility", "qualifications", "qualification", "preferred", "ability", "able",
    "including", "include", "must", "plus", "strong", "years", "year", "role", "looking",
    "candidate", "candidates", "join", "ideal", "opportunity", "seeking", "knowledge",
    "understanding", "familiarity", "proficiency", "proficient", "excellent", "good", "great",
    "nice", "need", "needs", "want", "apply", "position", "job",
];

pub fn default_stopwords() -> Vec<String> {
    ENGLISH
        .iter()
        .chain(POSTING_FILLER)
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_is_lowercase_and_nonempty() {
        let words = default_stopwords();
        assert!(words.len() > 150);
        assert!(words.iter().all(|w| w == &w.to_lowercase()));
        assert!(words.contains(&"the".to_string()));
        assert!(words.contains(&"requirements".to_string()));
    }
}
