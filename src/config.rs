//! Tunable numbers for the scorer and the suggestion engine.
//!
//! Defaults reproduce the calibrated values; the excellent/good/poor buckets
//! depend on them, so overrides are meant for experiments, not production.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::ontology::ConceptGroup;

/// Externally quoted pass bar ("SD must be ≥ 0.60").
///
/// Numerically equal to the `good` threshold today but a separate concept:
/// callers gate on this, the scorer only buckets.
pub const PASS_THRESHOLD: f64 = 0.60;

/// Blend of lexical and ontology similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridWeights {
    pub cosine: f64,
    pub group: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            cosine: 0.3,
            group: 0.7,
        }
    }
}

/// Multiplicative adjustments applied to the hybrid similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Adjustments {
    pub specificity_step: f64,
    pub specificity_cap: f64,
    pub generic_penalty: f64,
    /// Name with a single significant word
    pub length_one_word: f64,
    /// Two or three words
    pub length_ideal: f64,
    /// Four or five words
    pub length_long: f64,
    /// More than five words
    pub length_very_long: f64,
    /// Smallest score reported for a nonzero similarity
    pub score_floor: f64,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            specificity_step: 0.03,
            specificity_cap: 0.15,
            generic_penalty: 0.9,
            length_one_word: 0.85,
            length_ideal: 1.0,
            length_long: 0.9,
            length_very_long: 0.8,
            score_floor: 0.01,
        }
    }
}

impl Adjustments {
    pub fn length_factor(&self, word_count: usize) -> f64 {
        match word_count {
            0 | 1 => self.length_one_word,
            2..=3 => self.length_ideal,
            4..=5 => self.length_long,
            _ => self.length_very_long,
        }
    }

    pub fn bonus_factor(&self, special_count: usize) -> f64 {
        1.0 + (special_count as f64 * self.specificity_step).min(self.specificity_cap)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub excellent: f64,
    pub good: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.70,
            good: 0.60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub weights: HybridWeights,
    pub adjustments: Adjustments,
    pub thresholds: StatusThresholds,
    /// Groups that earn the specificity bonus
    pub specialized_groups: Vec<ConceptGroup>,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            weights: HybridWeights::default(),
            adjustments: Adjustments::default(),
            thresholds: StatusThresholds::default(),
            specialized_groups: ConceptGroup::ALL.to_vec(),
        }
    }
}

impl ScorerConfig {
    /// Parse a (possibly partial) JSON override. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: ScorerConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        if !(w.cosine.is_finite() && w.group.is_finite()) || w.cosine < 0.0 || w.group < 0.0 {
            return Err(CoreError::Config(
                "hybrid weights must be finite and non-negative".to_string(),
            ));
        }
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.good) || !(0.0..=1.0).contains(&t.excellent) {
            return Err(CoreError::Config(
                "status thresholds must lie in [0, 1]".to_string(),
            ));
        }
        if t.good > t.excellent {
            return Err(CoreError::Config(format!(
                "good threshold {} exceeds excellent threshold {}",
                t.good, t.excellent
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    pub max_suggestions: usize,
    /// Display cap for the improvement percentage
    pub improvement_cap: f64,
    pub synonyms_per_role: usize,
    pub domain_terms: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            improvement_cap: 999.0,
            synonyms_per_role: 3,
            domain_terms: 3,
        }
    }
}
