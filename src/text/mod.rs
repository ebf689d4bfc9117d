//! Deterministic text normalization: cleanup and stopword filtering.

mod clean;
mod stopwords;

pub use clean::clean;
pub use stopwords::{ENGLISH_STOPWORDS, is_stopword, remove_stopwords};

/// Split on Unicode whitespace and the `\x1c`-`\x1f` separators, skipping empty pieces.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
        .filter(|word| !word.is_empty())
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    split_words(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators_split_words() {
        assert_eq!(
            split_words(" one\x1ftwo\tthree\x1c ").collect::<Vec<_>>(),
            vec!["one", "two", "three"]
        );
        assert_eq!(word_count("a\x1fb"), 2);
        assert_eq!(word_count(""), 0);
    }
}
