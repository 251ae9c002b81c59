// Text Statistics
// Perplexity and burstiness estimates used by the classifier and scorer

use regex::Regex;
use std::collections::HashMap;

/// Perplexity returned for texts too short to measure.
const SHORT_TEXT_PERPLEXITY: f64 = 10000.0;
/// Fallback when no window produced a usable estimate.
const EMPTY_WINDOW_PERPLEXITY: f64 = 5000.0;
/// Window size and step (chars) for long-text scanning.
const WINDOW_CHARS: usize = 1000;
const WINDOW_STEP: usize = 750;

/// Lowercased word tokens. Apostrophes stay inside tokens ("don't").
pub fn word_tokens(text: &str) -> Vec<String> {
    let re = Regex::new(r"[A-Za-z0-9']+").unwrap();
    re.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Estimate the perplexity of a text.
///
/// Long texts are scored in overlapping windows and the minimum window value
/// is returned, so a predictable span inside a larger document dominates the
/// estimate. Texts under 10 chars read as highly unpredictable.
/// Pure function of the input; identical text gives an identical estimate.
pub fn estimate_perplexity(text: &str) -> f64 {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 10 {
        return SHORT_TEXT_PERPLEXITY;
    }

    if chars.len() > WINDOW_CHARS {
        let mut estimates = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + WINDOW_CHARS).min(chars.len());
            let window: String = chars[start..end].iter().collect();
            if let Some(ppl) = window_perplexity(&window) {
                estimates.push(ppl);
            }
            start += WINDOW_STEP;
        }
        if estimates.is_empty() {
            return EMPTY_WINDOW_PERPLEXITY;
        }
        return estimates.into_iter().fold(f64::INFINITY, f64::min);
    }

    window_perplexity(text).unwrap_or(SHORT_TEXT_PERPLEXITY)
}

/// Unigram-entropy perplexity for one window, scaled into the 10..10000 band.
/// Low vocabulary diversity and heavy repetition push the estimate down.
fn window_perplexity(window: &str) -> Option<f64> {
    let tokens = word_tokens(window);
    if tokens.is_empty() {
        return None;
    }

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in &tokens {
        *freq.entry(t.as_str()).or_insert(0) += 1;
    }

    let total = tokens.len() as f64;
    let entropy = -freq
        .values()
        .map(|&c| {
            let p = c as f64 / total;
            p * (p + 1e-12).ln()
        })
        .sum::<f64>();

    let ppl_uni = entropy.exp();
    let diversity = freq.len() as f64 / total;
    let scaled = ppl_uni * (14.0 + 36.0 * diversity);
    Some(scaled.clamp(10.0, 10000.0))
}

/// Burstiness: fraction of vocabulary items that occur more than once.
/// Range [0,1]; 0 for an empty vocabulary.
pub fn burstiness(text: &str) -> f64 {
    let tokens = word_tokens(text);
    if tokens.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in &tokens {
        *freq.entry(t.as_str()).or_insert(0) += 1;
    }

    let repeated = freq.values().filter(|&&c| c > 1).count();
    repeated as f64 / freq.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVERSE_TEXT: &str = "The quick brown fox jumps over a lazy dog while \
        seventeen curious students sketch wildly different interpretations of \
        an autumn landscape, each choosing unusual colors, strange brushes and \
        borrowed techniques nobody expected.";

    fn repetitive_text() -> String {
        "The model produces the answer. ".repeat(40)
    }

    #[test]
    fn test_word_tokens_lowercase_and_apostrophes() {
        let tokens = word_tokens("Don't STOP, it's 2am!");
        assert_eq!(tokens, vec!["don't", "stop", "it's", "2am"]);
    }

    #[test]
    fn test_short_text_reads_unpredictable() {
        assert_eq!(estimate_perplexity(""), 10000.0);
        assert_eq!(estimate_perplexity("hi"), 10000.0);
    }

    #[test]
    fn test_perplexity_is_deterministic() {
        let a = estimate_perplexity(DIVERSE_TEXT);
        let b = estimate_perplexity(DIVERSE_TEXT);
        assert_eq!(a, b);
        assert!(a > 0.0);
    }

    #[test]
    fn test_repetitive_text_scores_lower_than_diverse() {
        let rep = estimate_perplexity(&repetitive_text());
        let div = estimate_perplexity(DIVERSE_TEXT);
        assert!(
            rep < div,
            "repetitive {} should be below diverse {}",
            rep,
            div
        );
    }

    #[test]
    fn test_long_text_takes_minimum_window() {
        let diverse_long = format!("{} {}", DIVERSE_TEXT, DIVERSE_TEXT);
        let with_ai_span = format!("{} {}", diverse_long, repetitive_text());
        assert!(estimate_perplexity(&with_ai_span) <= estimate_perplexity(&diverse_long));
    }

    #[test]
    fn test_burstiness_range_and_value() {
        assert_eq!(burstiness(""), 0.0);

        // Vocabulary {the: 2, cat: 1, dog: 1}: one repeated item of three.
        let b = burstiness("the cat the dog");
        assert!((b - 1.0 / 3.0).abs() < 1e-9);

        let rep = burstiness(&repetitive_text());
        assert!((0.0..=1.0).contains(&rep));
        assert!(rep > 0.9);
    }
}
