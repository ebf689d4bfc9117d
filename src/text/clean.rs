//! Deterministic review cleanup.

use regex::Regex;
use std::sync::LazyLock;

static NON_ASCII: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").expect("valid non-ascii pattern"));
static URL_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("valid url pattern"));
static MENTION_OR_HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+|#\w+").expect("valid mention pattern"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid digit pattern"));
// `\x1c`-`\x1f` are separators that `\s` misses.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x1c-\x1f]+").expect("valid whitespace pattern"));

/// Normalize a raw review into lowercase ASCII words separated by single spaces.
///
/// Steps run in order: lowercase, non-ASCII runs to a space, URL-like tokens, `@mentions` and
/// `#hashtags`, digit runs, ASCII punctuation, then whitespace collapse and trim.
///
/// Digit and punctuation removal can splice a URL-like token back together (`w.w.wfoo`), so
/// the sequence repeats until the text is stable. Ordinary input settles after one pass.
pub fn clean(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let lowered = text.to_lowercase();
    let ascii = NON_ASCII.replace_all(&lowered, " ");
    let without_urls = URL_LIKE.replace_all(&ascii, "");
    let without_tags = MENTION_OR_HASHTAG.replace_all(&without_urls, "");
    let without_digits = DIGITS.replace_all(&without_tags, "");
    let without_punctuation: String = without_digits
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    WHITESPACE
        .replace_all(&without_punctuation, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: &[&str] = &[
        "",
        "   ",
        "I LOVE this product!!! Visit http://x.com #great @user 123",
        "Great value.\n\nWould buy again 10/10 :)",
        "Café crème — très bon… 5⭐",
        "see www.example.com/page?id=7 and https://a.b/c",
        "w.w.wsneaky link and h1ttp2stuff",
        "tabs\tand\r\nnewlines   everywhere",
        "#1 @2 #tag_with_underscore trailing",
        "emails like me@example.com lose their domain",
        "a\x1fb\x1c",
    ];

    #[test]
    fn end_to_end_example_strips_noise() {
        assert_eq!(
            clean("I LOVE this product!!! Visit http://x.com #great @user 123"),
            "i love this product visit"
        );
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(clean(""), "");
        assert_eq!(clean(" \t\n "), "");
    }

    #[test]
    fn non_ascii_runs_become_word_breaks() {
        assert_eq!(clean("good—value"), "good value");
        assert_eq!(clean("naïve"), "na ve");
    }

    #[test]
    fn urls_are_removed_whole() {
        assert_eq!(
            clean("see www.example.com/page?id=7 and https://a.b/c"),
            "see and"
        );
    }

    #[test]
    fn mentions_and_hashtags_are_removed_before_punctuation() {
        assert_eq!(clean("thanks @seller for the #fastshipping"), "thanks for the");
    }

    #[test]
    fn information_separators_count_as_whitespace() {
        assert_eq!(clean("a\x1fb"), "a b");
        assert_eq!(clean("\x1cgood\x1d\x1e value\x1f"), "good value");
    }

    #[test]
    fn digits_and_punctuation_are_dropped_in_place() {
        assert_eq!(clean("it's 100% worth-it"), "its worthit");
    }

    #[test]
    fn spliced_url_tokens_are_removed() {
        assert_eq!(clean("w.w.wsneaky link"), "link");
    }

    #[test]
    fn clean_is_idempotent_over_corpus() {
        for sample in CORPUS {
            let once = clean(sample);
            assert_eq!(clean(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn output_has_no_digits_punctuation_or_loose_whitespace() {
        for sample in CORPUS {
            let cleaned = clean(sample);
            assert!(!cleaned.chars().any(|c| c.is_ascii_digit()), "{cleaned:?}");
            assert!(
                !cleaned.chars().any(|c| c.is_ascii_punctuation()),
                "{cleaned:?}"
            );
            assert!(!cleaned.contains("  "), "{cleaned:?}");
            assert_eq!(cleaned.trim(), cleaned);
            assert!(cleaned.is_ascii());
        }
    }
}
