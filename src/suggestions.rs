//! Name rewrite search: generate variants, rescore each, keep improvements.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::config::SuggestionConfig;
use crate::models::{Evaluation, Suggestion};
use crate::scorer::SdScorer;

/// Role word → more specific alternatives.
const ROLE_SYNONYMS: &[(&str, &[&str])] = &[
    ("analista", &["auditor", "investigador", "scanner", "explorador"]),
    ("desenvolvedor", &["arquiteto", "construtor", "engenheiro"]),
    ("pesquisador", &["curador", "explorador", "investigador"]),
    ("consultor", &["estrategista", "planejador", "orientador"]),
    ("especialista", &["expert", "mestre", "autoridade"]),
    ("assistente", &["facilitador", "auxiliador", "parceiro"]),
    ("hacker", &["explorador", "investigador", "auditor", "dissecador"]),
    ("tradutor", &["conversor", "adaptador", "intérprete"]),
    ("curador", &["selecionador", "filtrador", "organizador"]),
];

/// High-salience adjectives appended to a name.
const POWER_WORDS: &[&str] = &[
    "forense",
    "semântico",
    "cirúrgico",
    "estratégico",
    "adversarial",
    "contextual",
    "reverso",
    "adaptativo",
];

/// Domain words never used as insertion terms.
const DOMAIN_TERM_BLACKLIST: &[&str] = &["para", "com", "de", "da", "do"];

/// Minimum characters for a domain word to be inserted into a name.
const MIN_DOMAIN_TERM_CHARS: usize = 4;

pub struct SuggestionEngine {
    scorer: SdScorer,
    config: SuggestionConfig,
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self {
            scorer: SdScorer::new(),
            config: SuggestionConfig::default(),
        }
    }

    pub fn with_parts(scorer: SdScorer, config: SuggestionConfig) -> Self {
        Self { scorer, config }
    }

    pub fn scorer(&self) -> &SdScorer {
        &self.scorer
    }

    /// Rank rewrites of `current_name` that beat `current_sd`, best first,
    /// at most `max_suggestions`.
    pub fn generate(
        &self,
        current_name: &str,
        domain: &str,
        current_sd: f64,
        max_suggestions: usize,
    ) -> Vec<Suggestion> {
        if current_name.is_empty() || domain.is_empty() {
            return Vec::new();
        }

        let candidates = self.candidates(current_name, domain);
        let total = candidates.len();

        let mut scored: Vec<Suggestion> = candidates
            .into_iter()
            .filter_map(|name| {
                let result = self.scorer.calculate(&name, domain);
                (result.score > current_sd).then(|| Suggestion {
                    improvement: self.improvement(result.score, current_sd),
                    sd: result.score,
                    name,
                })
            })
            .collect();

        // stable: ties keep generation order
        scored.sort_by(|a, b| b.sd.partial_cmp(&a.sd).unwrap_or(Ordering::Equal));
        scored.truncate(max_suggestions);

        debug!(
            agent = current_name,
            domain,
            current_sd,
            candidates = total,
            kept = scored.len(),
            "suggestions generated"
        );

        scored
    }

    /// Score a name and, if it does not pass, attach suggestions.
    pub fn evaluate(&self, name: &str, domain: &str) -> Evaluation {
        let result = self.scorer.calculate(name, domain);
        let suggestions = if result.passes() {
            Vec::new()
        } else {
            self.generate(name, domain, result.score, self.config.max_suggestions)
        };
        Evaluation {
            result,
            suggestions,
        }
    }

    /// All distinct candidate names, in generation order.
    pub fn candidates(&self, name: &str, domain: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        power_word_variants(name)
            .into_iter()
            .chain(domain_term_variants(name, domain, self.config.domain_terms))
            .chain(synonym_variants(name, self.config.synonyms_per_role))
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }

    fn improvement(&self, score: f64, current_sd: f64) -> f64 {
        // relative change is undefined around zero; report absolute points
        let improvement = if current_sd < 0.01 {
            score * 100.0
        } else {
            (score - current_sd) / current_sd * 100.0
        };
        improvement.min(self.config.improvement_cap)
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Suggest with default scorer and limits.
pub fn generate_suggestions(
    current_name: &str,
    domain: &str,
    current_sd: f64,
    max_suggestions: usize,
) -> Vec<Suggestion> {
    SuggestionEngine::new().generate(current_name, domain, current_sd, max_suggestions)
}

/// `"{name} {power}"` for each power word not already in the name.
fn power_word_variants(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    POWER_WORDS
        .iter()
        .filter(|pw| !lower.contains(*pw))
        .map(|pw| format!("{} {}", name, pw))
        .collect()
}

/// `"{name} de {term}"` and `"{term} {name}"` for the first few domain words.
fn domain_term_variants(name: &str, domain: &str, limit: usize) -> Vec<String> {
    let lower = domain.to_lowercase();
    lower
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_DOMAIN_TERM_CHARS && !DOMAIN_TERM_BLACKLIST.contains(w))
        .take(limit)
        .flat_map(|term| [format!("{} de {}", name, term), format!("{} {}", term, name)])
        .collect()
}

/// Replace the first case-insensitive occurrence of a role word with each
/// of its first `per_role` synonyms.
fn synonym_variants(name: &str, per_role: usize) -> Vec<String> {
    // role words are ASCII, so ASCII lowercasing keeps byte offsets aligned
    let lower = name.to_ascii_lowercase();
    let mut variants = Vec::new();

    for (role, synonyms) in ROLE_SYNONYMS {
        if let Some(pos) = lower.find(role) {
            let end = pos + role.len();
            for synonym in synonyms.iter().take(per_role) {
                variants.push(format!("{}{}{}", &name[..pos], synonym, &name[end..]));
            }
        }
    }

    variants
}
