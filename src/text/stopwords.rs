//! English stopword filtering.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The NLTK English stopword list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOPWORDS.iter().copied().collect());

/// Returns `true` when `token` is an English stopword. Matching is case-sensitive.
pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Drop stopwords from whitespace-separated text and rejoin with single spaces.
pub fn remove_stopwords(text: &str) -> String {
    super::split_words(text)
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_common_function_words() {
        assert_eq!(remove_stopwords("i love this product visit"), "love product visit");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(remove_stopwords(""), "");
        assert_eq!(remove_stopwords("   "), "");
    }

    #[test]
    fn all_stopwords_yield_empty_output() {
        assert_eq!(remove_stopwords("it is what it is"), "");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(remove_stopwords("The the"), "The");
    }

    #[test]
    fn collapses_irregular_spacing() {
        assert_eq!(remove_stopwords("  battery \t life   great "), "battery life great");
    }

    #[test]
    fn filter_is_idempotent() {
        let once = remove_stopwords("the battery was not great but the screen is");
        assert_eq!(remove_stopwords(&once), once);
        assert_eq!(once, "battery great screen");
    }

    #[test]
    fn never_emits_a_stopword() {
        let text = ENGLISH_STOPWORDS.join(" ") + " camera lens";
        let filtered = remove_stopwords(&text);
        assert!(filtered.split_whitespace().all(|token| !is_stopword(token)));
        assert_eq!(filtered, "camera lens");
    }
}
