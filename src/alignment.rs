//! Per-keyword alignment report.
//!
//! Produces the same JSON document as the remote `analyze-alignment`
//! endpoint, computed with the local scorer so both agree on score range
//! and pass bar.

use std::collections::HashMap;

use crate::config::PASS_THRESHOLD;
use crate::models::{AlignmentReport, KeywordAlignment, KeywordKind};
use crate::scorer::SdScorer;
use crate::text;

/// Keywords kept per report.
pub const TOP_KEYWORDS: usize = 8;

/// Alignment at or above this marks a keyword as a top contributor.
pub const CONTRIBUTOR_THRESHOLD: f64 = 0.50;

/// Alignment below this marks a keyword as a weak link.
pub const WEAK_LINK_THRESHOLD: f64 = 0.30;

/// Lower edge of the "attention" band just under the pass bar.
pub const ATTENTION_THRESHOLD: f64 = 0.50;

/// Names longer than this many words fail the minimalism check.
pub const MAX_NAME_WORDS: usize = 3;

const REPORT_STOP_WORDS: &[&str] = &[
    "pelo", "pela", "pelos", "pelas", "este", "esse", "aquele", "qual", "quais", "sem",
];

const TECHNICAL_TERMS: &[&str] = &[
    "api", "apis", "rest", "http", "json", "xml", "codigo", "software", "sistema", "aplicacao",
    "endpoint", "dados", "database", "llm", "ia", "ai", "vetor", "latente", "semantico",
];

const ACTION_TERMS: &[&str] = &[
    "analise", "varredura", "auditoria", "desenvolvimento", "criacao", "geracao", "traducao",
    "conversao", "exploracao", "investigacao", "desmontar", "validar", "testar", "mapear",
];

const QUALITY_TERMS: &[&str] = &[
    "gratuito", "gratuitas", "premium", "profissional", "especializado", "avancado", "simples",
    "rapido", "eficiente", "melhor", "novo",
];

/// Role names too generic to carry domain meaning.
const GENERIC_ROLES: &[&str] = &["analista", "assistente", "consultor", "gerente"];

pub fn classify_keyword(word: &str) -> KeywordKind {
    if TECHNICAL_TERMS.contains(&word) {
        KeywordKind::Technical
    } else if ACTION_TERMS.contains(&word) {
        KeywordKind::Action
    } else if QUALITY_TERMS.contains(&word) {
        KeywordKind::Quality
    } else {
        KeywordKind::Domain
    }
}

/// Extract signal keywords from a domain with frequency and relevance.
///
/// Ordered by frequency, ties in first-occurrence order. Quality terms are
/// dropped after counting, so they still dilute relevance.
pub fn extract_keywords(domain: &str, top_n: usize) -> Vec<(String, KeywordKind, usize, f64)> {
    let folded = text::fold_diacritics(&domain.to_lowercase());
    let cleaned: String = folded
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .filter(|t| !text::is_stop_word(t) && !REPORT_STOP_WORDS.contains(t))
        .collect();
    let total = tokens.len();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &token in &tokens {
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            order.push(token);
        }
        *count += 1;
    }
    // stable sort keeps first-occurrence order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));

    order
        .into_iter()
        .filter_map(|word| {
            let kind = classify_keyword(word);
            if kind == KeywordKind::Quality {
                return None;
            }
            let frequency = counts[word];
            let relevance = (frequency as f64 / total as f64).min(1.0);
            Some((word.to_string(), kind, frequency, relevance))
        })
        .take(top_n)
        .collect()
}

pub struct AlignmentAnalyzer {
    scorer: SdScorer,
}

impl AlignmentAnalyzer {
    pub fn new() -> Self {
        Self {
            scorer: SdScorer::new(),
        }
    }

    pub fn with_scorer(scorer: SdScorer) -> Self {
        Self { scorer }
    }

    pub fn analyze(&self, agent_name: &str, domain: &str) -> AlignmentReport {
        let semantic_density = self.scorer.calculate(agent_name, domain).score;
        let word_count = agent_name.split_whitespace().count().max(1);

        let mut keywords: Vec<KeywordAlignment> = extract_keywords(domain, TOP_KEYWORDS)
            .into_iter()
            .map(|(word, kind, frequency, relevance)| {
                let alignment = self.scorer.calculate(agent_name, &word).score;
                KeywordAlignment {
                    contribution: round3(alignment * relevance),
                    word,
                    kind,
                    frequency,
                    relevance,
                    alignment,
                }
            })
            .collect();
        keywords.sort_by(|a, b| {
            b.contribution
                .partial_cmp(&a.contribution)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top_contributors = keywords
            .iter()
            .filter(|k| k.alignment >= CONTRIBUTOR_THRESHOLD)
            .map(|k| k.word.clone())
            .collect();
        let weak_links = keywords
            .iter()
            .filter(|k| k.alignment < WEAK_LINK_THRESHOLD)
            .map(|k| k.word.clone())
            .collect();

        let recommendations = recommendations(agent_name, &keywords, semantic_density, word_count);

        AlignmentReport {
            agent_name: agent_name.to_string(),
            domain: domain.to_string(),
            semantic_density,
            word_count,
            keywords_analysis: keywords,
            top_contributors,
            weak_links,
            recommendations,
        }
    }
}

impl Default for AlignmentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Report with the default scorer.
pub fn analyze_alignment(agent_name: &str, domain: &str) -> AlignmentReport {
    AlignmentAnalyzer::new().analyze(agent_name, domain)
}

fn recommendations(
    agent_name: &str,
    keywords: &[KeywordAlignment],
    semantic_density: f64,
    word_count: usize,
) -> Vec<String> {
    let mut recs = Vec::new();

    if semantic_density >= PASS_THRESHOLD {
        recs.push(format!(
            "Density: PASS (SD {:.2} >= {:.2})",
            semantic_density, PASS_THRESHOLD
        ));
    } else if semantic_density >= ATTENTION_THRESHOLD {
        recs.push(format!(
            "Density: ATTENTION (SD {:.2}, target >= {:.2})",
            semantic_density, PASS_THRESHOLD
        ));
        if let Some(top) = keywords.first() {
            recs.push(format!(
                "Embed '{}' in the name (e.g. '{} de {}')",
                top.word, agent_name, top.word
            ));
        }
    } else {
        recs.push(format!("Density: FAIL (SD {:.2})", semantic_density));
        let normalized = text::normalize(agent_name);
        if GENERIC_ROLES.contains(&normalized.as_str()) {
            recs.push(format!(
                "Replace '{}' with a technical role (e.g. 'auditor', 'scanner', 'hacker')",
                agent_name
            ));
        }
    }

    if word_count <= MAX_NAME_WORDS {
        recs.push(format!(
            "Minimalism: PASS ({} words <= {})",
            word_count, MAX_NAME_WORDS
        ));
    } else {
        recs.push(format!(
            "Minimalism: FAIL ({} words > {})",
            word_count, MAX_NAME_WORDS
        ));
        recs.push(format!(
            "Shorten the name to at most {} words while keeping SD high",
            MAX_NAME_WORDS
        ));
    }

    recs
}

/// Round the exact decimal value of `x` to three places.
fn round3(x: f64) -> f64 {
    format!("{:.3}", x).parse().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3_uses_exact_decimal_value() {
        assert_eq!(round3(0.2345), 0.234);
        assert_eq!(round3(0.1235), 0.123);
        assert_eq!(round3(0.1236), 0.124);
        assert_eq!(round3(0.0), 0.0);
    }

    #[test]
    fn test_classify_keyword() {
        assert_eq!(classify_keyword("apis"), KeywordKind::Technical);
        assert_eq!(classify_keyword("auditoria"), KeywordKind::Action);
        assert_eq!(classify_keyword("premium"), KeywordKind::Quality);
        assert_eq!(classify_keyword("ofertas"), KeywordKind::Domain);
    }

    #[test]
    fn test_extract_keywords_frequency_order() {
        let kws = extract_keywords("ofertas de APIs, análise de APIs e ofertas premium", 8);
        let words: Vec<&str> = kws.iter().map(|k| k.0.as_str()).collect();
        assert_eq!(words, vec!["ofertas", "apis", "analise"]);
        // six counted tokens, premium included
        assert!((kws[0].3 - 2.0 / 6.0).abs() < 1e-12);
        assert_eq!(kws[1].1, KeywordKind::Technical);
        assert_eq!(kws[2].1, KeywordKind::Action);
    }

    #[test]
    fn test_extract_keywords_keeps_hyphens() {
        let kws = extract_keywords("red-team pentest", 8);
        assert_eq!(kws[0].0, "red-team");
    }

    #[test]
    fn test_extract_keywords_top_n() {
        let kws = extract_keywords("alpha beta gamma delta epsilon", 2);
        assert_eq!(kws.len(), 2);
        assert_eq!(kws[0].0, "alpha");
    }

    #[test]
    fn test_report_shape() {
        let report = analyze_alignment("Hacker Semântico", "análise forense de ofertas tech");
        assert_eq!(report.word_count, 2);
        assert!(report.semantic_density >= 0.0 && report.semantic_density <= 1.0);
        assert!(!report.keywords_analysis.is_empty());
        for pair in report.keywords_analysis.windows(2) {
            assert!(pair[0].contribution >= pair[1].contribution);
        }
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "agent_name",
            "semantic_density",
            "word_count",
            "keywords_analysis",
            "top_contributors",
            "weak_links",
            "recommendations",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json["keywords_analysis"][0].get("type").is_some());
    }

    #[test]
    fn test_contributors_and_weak_links_partition() {
        let report = analyze_alignment("Auditor forense", "analise forense de ofertas banana");
        assert!(report.top_contributors.contains(&"forense".to_string()));
        assert!(report.weak_links.contains(&"banana".to_string()));
        for w in &report.top_contributors {
            assert!(!report.weak_links.contains(w));
        }
    }

    #[test]
    fn test_recommendations_generic_role() {
        let report = analyze_alignment("Analista", "ofertas de produtos");
        assert!(report.recommendations[0].starts_with("Density: FAIL"));
        assert!(report.recommendations.iter().any(|r| r.contains("auditor")));
        assert!(report.recommendations.iter().any(|r| r.starts_with("Minimalism: PASS")));
    }

    #[test]
    fn test_recommendations_long_name() {
        let report = analyze_alignment(
            "Hacker Semantico Forense Estrategista Especializado",
            "analise tech",
        );
        assert_eq!(report.word_count, 5);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Minimalism: FAIL")));
    }
}
