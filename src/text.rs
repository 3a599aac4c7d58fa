//! Text normalization and tokenization. Deterministic, no stemmer library.
//!
//! Reduces free text to lowercase ASCII words and drops Portuguese function
//! words, so that "Análise Forense de APIs" and "analise forense apis" score
//! the same.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Portuguese prepositions, articles, conjunctions and filler verbs.
const STOP_WORDS: &[&str] = &[
    "o", "a", "os", "as", "de", "da", "do", "das", "dos", "em", "para", "por", "com", "e", "ou",
    "um", "uma", "uns", "umas", "no", "na", "nos", "nas", "ao", "aos", "que", "se", "sua", "seu",
    "suas", "seus", "depois", "antes", "entre", "sobre", "como", "mais", "menos", "muito",
    "pouco", "ser", "estar", "ter",
];

/// Prefix length used as a crude stem.
pub const STEM_LEN: usize = 5;

/// Maximum number of character trigrams kept per string.
pub const MAX_TRIGRAMS: usize = 20;

/// Check whether a normalized word is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Strip diacritics without touching anything else (case, punctuation).
pub fn fold_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize free text.
///
/// Lowercase, strip diacritics, replace everything outside `[a-z0-9 ]`
/// with a space, collapse whitespace, trim.
pub fn normalize(s: &str) -> String {
    let folded: String = fold_diacritics(&s.to_lowercase())
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                ' '
            }
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split already-normalized text into significant words.
///
/// Drops single-character tokens and stop words. Order is preserved.
pub fn significant_words(normalized: &str) -> Vec<String> {
    normalized
        .split(' ')
        .filter(|w| w.len() > 1 && !is_stop_word(w))
        .map(String::from)
        .collect()
}

/// Normalize then tokenize raw text.
pub fn tokenize(s: &str) -> Vec<String> {
    significant_words(&normalize(s))
}

/// Crude stem: the first five characters of longer words.
pub fn stem(word: &str) -> &str {
    match word.char_indices().nth(STEM_LEN) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}

/// Character n-grams over the whitespace-stripped string, capped at
/// [`MAX_TRIGRAMS`].
///
/// A compact string shorter than `n` yields itself as the single gram.
pub fn char_ngrams(normalized: &str, n: usize) -> Vec<String> {
    let compact: Vec<char> = normalized.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Vec::new();
    }
    if compact.len() <= n {
        return vec![compact.iter().collect()];
    }

    compact
        .windows(n)
        .take(MAX_TRIGRAMS)
        .map(|w| w.iter().collect())
        .collect()
}
