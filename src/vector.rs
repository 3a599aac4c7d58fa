//! Sparse term-frequency vectors over word stems and character trigrams.

use std::collections::HashMap;

use crate::text;

/// Vector key. Stems and trigrams live in separate namespaces so a
/// three-letter word never collides with a trigram of the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Stem(String),
    Trigram(String),
}

/// Token → occurrence count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyVector {
    counts: HashMap<Token, u32>,
}

impl FrequencyVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, token: Token) {
        *self.counts.entry(token).or_insert(0) += 1;
    }

    pub fn get(&self, token: &Token) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.counts
            .values()
            .map(|&v| f64::from(v) * f64::from(v))
            .sum::<f64>()
            .sqrt()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Token, u32)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }
}

/// Build the vector for one side of the comparison.
///
/// `words` are the significant words; `normalized` is the full normalized
/// string the trigrams are cut from.
pub fn build_vector<S: AsRef<str>>(words: &[S], normalized: &str) -> FrequencyVector {
    let mut vector = FrequencyVector::new();
    for word in words {
        vector.add(Token::Stem(text::stem(word.as_ref()).to_string()));
    }
    for gram in text::char_ngrams(normalized, 3) {
        vector.add(Token::Trigram(gram));
    }
    vector
}

/// Cosine similarity. 0 when either side has zero norm.
pub fn cosine(a: &FrequencyVector, b: &FrequencyVector) -> f64 {
    let na = a.norm();
    let nb = b.norm();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }

    let (smaller, larger) = if a.len() < b.len() { (a, b) } else { (b, a) };
    let dot: f64 = smaller
        .iter()
        .map(|(k, v)| f64::from(v) * f64::from(larger.get(k)))
        .sum();

    dot / (na * nb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_vector_counts_stems_and_trigrams() {
        let v = build_vector(&["forense", "forensic"], "forense forensic");
        // both words stem to "foren"
        assert_eq!(v.get(&Token::Stem("foren".into())), 2);
        assert_eq!(v.get(&Token::Trigram("for".into())), 2);
        assert_eq!(v.get(&Token::Trigram("xyz".into())), 0);
    }

    #[test]
    fn test_stem_and_trigram_do_not_collide() {
        let v = build_vector(&["api"], "api");
        assert_eq!(v.get(&Token::Stem("api".into())), 1);
        assert_eq!(v.get(&Token::Trigram("api".into())), 1);
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_cosine_identical() {
        let v = build_vector(&["auditor", "forense"], "auditor forense");
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_disjoint() {
        let a = build_vector(&["xyz"], "xyz");
        let b = build_vector(&["qwe"], "qwe");
        assert_eq!(cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm() {
        let a = FrequencyVector::new();
        let b = build_vector(&["dados"], "dados");
        assert_eq!(cosine(&a, &b), 0.0);
        assert_eq!(cosine(&b, &a), 0.0);
    }

    #[test]
    fn test_cosine_symmetric_and_bounded() {
        let a = build_vector(&["analista", "dados"], "analista dados");
        let b = build_vector(&["ciencia", "dados", "nuvem"], "ciencia dados nuvem");
        let ab = cosine(&a, &b);
        assert!((ab - cosine(&b, &a)).abs() < 1e-12);
        assert!(ab > 0.0 && ab < 1.0);
    }
}
