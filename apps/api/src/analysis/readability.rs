//! Flesch reading ease.

/// Returned when the text has no words to measure.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Flesch reading ease: higher is easier. Lines count as sentence breaks since CV
/// bullets rarely end in a full stop.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let mut sentences = 0usize;
    let mut words = 0usize;
    let mut syllables = 0usize;

    for sentence in text.split(['.', '!', '?', '\n']) {
        let mut in_sentence = 0;
        for word in sentence.split_whitespace() {
            let letters: String = word
                .chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(char::to_lowercase)
                .collect();
            if letters.is_empty() {
                continue;
            }
            in_sentence += 1;
            syllables += count_syllables(&letters);
        }
        if in_sentence > 0 {
            sentences += 1;
            words += in_sentence;
        }
    }

    if words == 0 {
        return NEUTRAL_SCORE;
    }

    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;
    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    (score * 10.0).round() / 10.0
}

/// Vowel groups, less a silent trailing `e`; at least one per word.
pub fn count_syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev_vowel = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    if count > 1 && word.ends_with('e') && !word.ends_with("le") && !word.ends_with("ee") {
        count -= 1;
    }
    count.max(1)
}
