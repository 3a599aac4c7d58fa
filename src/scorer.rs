use tracing::{debug, trace};

use crate::config::ScorerConfig;
use crate::models::{SdResult, SdStatus, ValidationFailure};
use crate::ontology::{self, GroupSet};
use crate::text;
use crate::vector;

/// Name words that signal a catch-all agent.
const GENERIC_WORDS: &[&str] = &["geral", "completo", "total", "universal", "assistente"];

const MIN_NAME_CHARS: usize = 2;
const MIN_DOMAIN_CHARS: usize = 3;

/// Semantic density scorer: how conceptually aligned a name is with a domain.
/// Pure; holds only its configuration.
#[derive(Debug, Clone)]
pub struct SdScorer {
    config: ScorerConfig,
}

impl SdScorer {
    pub fn new() -> Self {
        Self {
            config: ScorerConfig::default(),
        }
    }

    pub fn with_config(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score a (name, domain) pair. Never fails; rejected input scores 0.
    pub fn calculate(&self, name: &str, domain: &str) -> SdResult {
        let name_trimmed = name.trim();
        let domain_trimmed = domain.trim();

        if name_trimmed.is_empty() || domain_trimmed.is_empty() {
            return reject(name, domain, ValidationFailure::EmptyInput);
        }

        if name_trimmed.chars().count() < MIN_NAME_CHARS
            || domain_trimmed.chars().count() < MIN_DOMAIN_CHARS
        {
            return reject(name, domain, ValidationFailure::InputTooShort);
        }

        let name_norm = text::normalize(name);
        let domain_norm = text::normalize(domain);
        let name_words = text::significant_words(&name_norm);
        let domain_words = text::significant_words(&domain_norm);

        if name_words.is_empty() || domain_words.is_empty() {
            return reject(name, domain, ValidationFailure::NoSignificantWords);
        }

        let groups_name = ontology::to_groups(&name_words);
        let groups_domain = ontology::to_groups(&domain_words);

        let cos_sim = vector::cosine(
            &vector::build_vector(&name_words, &name_norm),
            &vector::build_vector(&domain_words, &domain_norm),
        );
        let grp_sim = ontology::soft_group_similarity(&groups_name, &groups_domain);

        let w = &self.config.weights;
        let hybrid_sim = w.cosine * cos_sim + w.group * grp_sim;

        let adj = &self.config.adjustments;
        let special_count =
            self.count_specialized(&groups_name) + self.count_specialized(&groups_domain);
        let bonus_factor = adj.bonus_factor(special_count);

        let has_generic = name_words.iter().any(|w| GENERIC_WORDS.contains(&w.as_str()));
        let penalty_factor = if has_generic { adj.generic_penalty } else { 1.0 };

        let length_factor = adj.length_factor(name_words.len());

        let raw = hybrid_sim * bonus_factor * penalty_factor * length_factor;
        let final_score = self.finalize(raw);
        let status = self.classify(final_score);

        debug!(
            agent = name,
            domain,
            ?name_words,
            ?domain_words,
            ?groups_name,
            ?groups_domain,
            cos_sim,
            grp_sim,
            hybrid_sim,
            bonus_factor,
            penalty_factor,
            length_factor,
            final_score,
            "sd computed"
        );

        SdResult {
            score: final_score,
            status,
            message: status_message(status).to_string(),
            failure: None,
        }
    }

    /// Map a score to its bucket. Thresholds are inclusive lower bounds.
    pub fn classify(&self, score: f64) -> SdStatus {
        let t = &self.config.thresholds;
        if score >= t.excellent {
            SdStatus::Excellent
        } else if score >= t.good {
            SdStatus::Good
        } else {
            SdStatus::Poor
        }
    }

    fn count_specialized(&self, groups: &GroupSet) -> usize {
        groups
            .iter()
            .filter(|g| self.config.specialized_groups.contains(g))
            .count()
    }

    /// Post-conditions on the raw product, each as its own guard:
    /// clamp to [0, 1], non-finite → 0, positive residue → floor, round.
    fn finalize(&self, raw: f64) -> f64 {
        let mut score = raw.clamp(0.0, 1.0);

        // clamp passes NaN through
        if !score.is_finite() {
            score = 0.0;
        }

        let floor = self.config.adjustments.score_floor;
        if score > 0.0 && score < floor {
            score = floor;
        }

        round2(score)
    }
}

impl Default for SdScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score with the default configuration.
pub fn calculate_sd(name: &str, domain: &str) -> SdResult {
    SdScorer::new().calculate(name, domain)
}

fn reject(name: &str, domain: &str, failure: ValidationFailure) -> SdResult {
    trace!(agent = name, domain, ?failure, "sd input rejected");
    SdResult::rejected(failure)
}

fn status_message(status: SdStatus) -> &'static str {
    match status {
        SdStatus::Excellent => "Excellent semantic density",
        SdStatus::Good => "Good density, approved",
        SdStatus::Poor => "SD must be >= 0.60. Try a name more specific to the domain.",
    }
}

/// Round the exact decimal value of `x` to two places, ties away from zero.
///
/// `(x * 100.0).round()` would round twice: the product can already land on
/// `.5` for values just below a boundary.
pub(crate) fn round2(x: f64) -> f64 {
    // only odd multiples of 1/8 are exact ties in binary; formatting breaks
    // those to even
    let eighths = x * 8.0;
    if eighths.fract() == 0.0 && eighths.abs() % 2.0 == 1.0 {
        return (x * 100.0).round() / 100.0;
    }
    format!("{:.2}", x).parse().unwrap_or(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Adjustments;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        let r = calculate_sd("", "algo");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.status, SdStatus::Poor);
        assert_eq!(r.failure, Some(ValidationFailure::EmptyInput));

        let r = calculate_sd("Auditor", "   ");
        assert_eq!(r.failure, Some(ValidationFailure::EmptyInput));
    }

    #[test]
    fn test_too_short() {
        let r = calculate_sd("ab", "xy");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.failure, Some(ValidationFailure::InputTooShort));

        let r = calculate_sd("a", "analise forense");
        assert_eq!(r.failure, Some(ValidationFailure::InputTooShort));
    }

    #[test]
    fn test_only_function_words() {
        let r = calculate_sd("de da", "e ou");
        assert_eq!(r.score, 0.0);
        assert_eq!(r.status, SdStatus::Poor);
        assert_eq!(r.failure, Some(ValidationFailure::NoSignificantWords));
    }

    #[test]
    fn test_validation_order_empty_before_short() {
        // empty name wins over a too-short domain
        let r = calculate_sd(" ", "xy");
        assert_eq!(r.failure, Some(ValidationFailure::EmptyInput));
    }

    #[test]
    fn test_strong_overlap_is_excellent() {
        let r = calculate_sd("forense semantico", "analise forense semantica");
        assert!(r.score >= 0.70, "score {}", r.score);
        assert_eq!(r.status, SdStatus::Excellent);
        assert!(r.failure.is_none());
    }

    #[test]
    fn test_accents_do_not_matter() {
        let a = calculate_sd("Hacker Semântico", "análise forense de ofertas tech");
        let b = calculate_sd("hacker semantico", "analise forense de ofertas tech");
        assert_eq!(a, b);
    }

    #[test]
    fn test_unrelated_name_is_poor() {
        let r = calculate_sd("Banana Amarela", "analise forense de sistemas");
        assert_eq!(r.status, SdStatus::Poor);
        assert!(r.score < 0.60);
        assert!(r.failure.is_none());
    }

    #[test]
    fn test_generic_word_penalty() {
        let plain = calculate_sd("Auditor forense", "analise forense");
        let generic = calculate_sd("Assistente forense", "analise forense");
        assert!(generic.score < plain.score);
    }

    #[test]
    fn test_length_factor_prefers_two_words() {
        let one = calculate_sd("forense", "analise forense");
        let two = calculate_sd("auditor forense", "analise forense");
        assert!(two.score >= one.score);
    }

    #[test]
    fn test_finalize_guards() {
        let scorer = SdScorer::new();
        assert_eq!(scorer.finalize(f64::NAN), 0.0);
        assert_eq!(scorer.finalize(f64::INFINITY), 1.0);
        assert_eq!(scorer.finalize(-3.0), 0.0);
        assert_eq!(scorer.finalize(0.0), 0.0);
        assert_eq!(scorer.finalize(0.0001), 0.01);
        assert_eq!(scorer.finalize(0.004), 0.01);
        assert_eq!(scorer.finalize(1.7), 1.0);
        assert_eq!(scorer.finalize(0.6549), 0.65);
    }

    #[test]
    fn test_finalize_rounds_exact_decimal_value() {
        let scorer = SdScorer::new();
        assert_eq!(scorer.finalize(0.8049999999999999), 0.80);
        assert_eq!(scorer.finalize(0.59499999999999997), 0.59);
        assert_eq!(scorer.finalize(0.69499999999999995), 0.69);
        assert_eq!(scorer.finalize(0.805), 0.81);
        assert_eq!(scorer.finalize(0.125), 0.13);
        assert_eq!(scorer.finalize(0.375), 0.38);
        assert_eq!(scorer.classify(scorer.finalize(0.59499999999999997)), SdStatus::Poor);
        assert_eq!(scorer.classify(scorer.finalize(0.69499999999999995)), SdStatus::Good);
    }

    #[test]
    fn test_score_just_below_boundary_rounds_down() {
        let r = calculate_sd("sistema GraphQL!", "código api reverso");
        assert_eq!(r.score, 0.80);
    }

    #[test]
    fn test_classify_boundaries() {
        let scorer = SdScorer::new();
        assert_eq!(scorer.classify(0.70), SdStatus::Excellent);
        assert_eq!(scorer.classify(0.69), SdStatus::Good);
        assert_eq!(scorer.classify(0.60), SdStatus::Good);
        assert_eq!(scorer.classify(0.59), SdStatus::Poor);
        assert_eq!(scorer.classify(0.0), SdStatus::Poor);
    }

    #[test]
    fn test_custom_config_changes_weighting() {
        let mut cfg = ScorerConfig::default();
        cfg.weights.cosine = 1.0;
        cfg.weights.group = 0.0;
        cfg.adjustments = Adjustments {
            length_one_word: 1.0,
            ..Adjustments::default()
        };
        cfg.specialized_groups.clear();
        let scorer = SdScorer::with_config(cfg);
        // no lexical overlap at all
        let r = scorer.calculate("hacker", "nuvem aws");
        assert_eq!(r.score, 0.0);
    }

    proptest! {
        #[test]
        fn prop_score_bounded_and_finite(name in "\\PC{0,40}", domain in "\\PC{0,60}") {
            let r = calculate_sd(&name, &domain);
            prop_assert!(r.score.is_finite());
            prop_assert!((0.0..=1.0).contains(&r.score));
        }

        #[test]
        fn prop_deterministic(name in "[a-z ]{0,30}", domain in "[a-z ]{0,50}") {
            prop_assert_eq!(calculate_sd(&name, &domain), calculate_sd(&name, &domain));
        }

        #[test]
        fn prop_status_matches_score(
            name in "(forense|auditor|dados|api|hacker|nuvem|banana|geral) (semantico|tech|codigo|analise|ia)",
            domain in "(analise|seguranca|dados|cloud|guia|produto) (forense|llm|rest|sistema|manual)",
        ) {
            let r = calculate_sd(&name, &domain);
            let expected = if r.score >= 0.70 {
                SdStatus::Excellent
            } else if r.score >= 0.60 {
                SdStatus::Good
            } else {
                SdStatus::Poor
            };
            prop_assert_eq!(r.status, expected);
        }

        #[test]
        fn prop_positive_scores_never_below_floor(raw in 0.0f64..0.02) {
            let s = SdScorer::new().finalize(raw);
            prop_assert!(s == 0.0 || s >= 0.01);
            prop_assert!(raw == 0.0 || s >= 0.01);
        }
    }
}
