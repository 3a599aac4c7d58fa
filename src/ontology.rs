//! Soft domain ontology: word → concept group, and a sparse group
//! similarity table used as a lightweight substitute for embeddings.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse topical tag. Closed set; no runtime creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptGroup {
    Tech,
    Security,
    Forensic,
    Semantic,
    Analysis,
    Data,
    Api,
    Cloud,
    Docs,
    Offer,
    Llm,
    Code,
}

impl ConceptGroup {
    pub const ALL: [ConceptGroup; 12] = [
        ConceptGroup::Tech,
        ConceptGroup::Security,
        ConceptGroup::Forensic,
        ConceptGroup::Semantic,
        ConceptGroup::Analysis,
        ConceptGroup::Data,
        ConceptGroup::Api,
        ConceptGroup::Cloud,
        ConceptGroup::Docs,
        ConceptGroup::Offer,
        ConceptGroup::Llm,
        ConceptGroup::Code,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptGroup::Tech => "tech",
            ConceptGroup::Security => "security",
            ConceptGroup::Forensic => "forensic",
            ConceptGroup::Semantic => "semantic",
            ConceptGroup::Analysis => "analysis",
            ConceptGroup::Data => "data",
            ConceptGroup::Api => "api",
            ConceptGroup::Cloud => "cloud",
            ConceptGroup::Docs => "docs",
            ConceptGroup::Offer => "offer",
            ConceptGroup::Llm => "llm",
            ConceptGroup::Code => "code",
        }
    }
}

impl fmt::Display for ConceptGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of concept groups. Ordered so iteration is deterministic.
pub type GroupSet = BTreeSet<ConceptGroup>;

/// Look up the concept group of a normalized word. Exact match only.
pub fn group_for(word: &str) -> Option<ConceptGroup> {
    let group = match word {
        "tech" | "tecnologia" | "tecnologico" | "tecnologica" | "software" | "dev"
        | "programacao" | "engenharia" => ConceptGroup::Tech,
        "hacker" | "seguranca" | "security" | "pentest" | "pentester" | "adversarial"
        | "reverso" => ConceptGroup::Security,
        "forense" | "forensic" | "pericial" => ConceptGroup::Forensic,
        "semantico" | "semantica" | "ontologia" | "contextual" => ConceptGroup::Semantic,
        "analise" | "analitico" | "analitica" | "auditoria" | "investigacao" => {
            ConceptGroup::Analysis
        }
        "dados" | "data" | "dataset" | "informacao" | "informacoes" => ConceptGroup::Data,
        "api" | "apis" | "endpoint" | "rest" | "graphql" => ConceptGroup::Api,
        "cloud" | "nuvem" | "aws" | "gcp" | "azure" | "serverless" => ConceptGroup::Cloud,
        "documentacao" | "docs" | "manual" | "guia" | "rfc" => ConceptGroup::Docs,
        "oferta" | "ofertas" | "produto" | "produtos" | "servico" | "servicos" | "ferramenta"
        | "plataforma" | "saas" => ConceptGroup::Offer,
        "llm" | "ia" | "ai" | "modelo" | "modelos" => ConceptGroup::Llm,
        "codigo" | "code" | "script" | "sistema" | "aplicacao" | "app" => ConceptGroup::Code,
        _ => return None,
    };
    Some(group)
}

/// Map significant words to the set of groups they belong to.
/// Words missing from the dictionary contribute nothing.
pub fn to_groups<S: AsRef<str>>(words: &[S]) -> GroupSet {
    words.iter().filter_map(|w| group_for(w.as_ref())).collect()
}

/// Hand-authored pairwise similarities. Each unordered pair appears once.
const GROUP_SIMILARITY: &[(ConceptGroup, ConceptGroup, f64)] = &[
    (ConceptGroup::Security, ConceptGroup::Forensic, 0.9),
    (ConceptGroup::Security, ConceptGroup::Tech, 0.7),
    (ConceptGroup::Security, ConceptGroup::Analysis, 0.5),
    (ConceptGroup::Forensic, ConceptGroup::Analysis, 0.8),
    (ConceptGroup::Semantic, ConceptGroup::Analysis, 0.7),
    (ConceptGroup::Semantic, ConceptGroup::Llm, 0.6),
    (ConceptGroup::Semantic, ConceptGroup::Data, 0.4),
    (ConceptGroup::Analysis, ConceptGroup::Data, 0.6),
    (ConceptGroup::Analysis, ConceptGroup::Docs, 0.6),
    (ConceptGroup::Tech, ConceptGroup::Data, 0.7),
    (ConceptGroup::Tech, ConceptGroup::Code, 0.7),
    (ConceptGroup::Tech, ConceptGroup::Cloud, 0.6),
    (ConceptGroup::Tech, ConceptGroup::Api, 0.6),
    (ConceptGroup::Tech, ConceptGroup::Llm, 0.6),
    (ConceptGroup::Llm, ConceptGroup::Data, 0.6),
    (ConceptGroup::Docs, ConceptGroup::Tech, 0.4),
    (ConceptGroup::Offer, ConceptGroup::Tech, 0.4),
    (ConceptGroup::Code, ConceptGroup::Data, 0.6),
    (ConceptGroup::Cloud, ConceptGroup::Api, 0.5),
];

/// Similarity between two groups. 1 on the diagonal, 0 for unlisted pairs.
pub fn group_sim(a: ConceptGroup, b: ConceptGroup) -> f64 {
    if a == b {
        return 1.0;
    }
    GROUP_SIMILARITY
        .iter()
        .find(|(x, y, _)| (*x == a && *y == b) || (*x == b && *y == a))
        .map(|(_, _, sim)| *sim)
        .unwrap_or(0.0)
}

/// Best-match similarity of `a` against `b`, averaged over `a`.
///
/// Driven by `a` (the name's groups): not symmetric in general.
pub fn soft_group_similarity(a: &GroupSet, b: &GroupSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let sum: f64 = a
        .iter()
        .map(|&ga| b.iter().map(|&gb| group_sim(ga, gb)).fold(0.0, f64::max))
        .sum();

    (sum / a.len() as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_for_known_words() {
        assert_eq!(group_for("forense"), Some(ConceptGroup::Forensic));
        assert_eq!(group_for("apis"), Some(ConceptGroup::Api));
        assert_eq!(group_for("saas"), Some(ConceptGroup::Offer));
        assert_eq!(group_for("sistema"), Some(ConceptGroup::Code));
    }

    #[test]
    fn test_group_for_miss() {
        assert_eq!(group_for("analista"), None);
        assert_eq!(group_for("sistemas"), None);
        assert_eq!(group_for(""), None);
    }

    #[test]
    fn test_to_groups_collapses_repeats() {
        let groups = to_groups(&["forense", "pericial", "dados", "banana"]);
        assert_eq!(groups.len(), 2);
        assert!(groups.contains(&ConceptGroup::Forensic));
        assert!(groups.contains(&ConceptGroup::Data));
    }

    #[test]
    fn test_group_sim_diagonal_and_default() {
        for g in ConceptGroup::ALL {
            assert!((group_sim(g, g) - 1.0).abs() < f64::EPSILON);
        }
        assert!((group_sim(ConceptGroup::Offer, ConceptGroup::Forensic)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_sim_symmetric() {
        for (a, b, sim) in GROUP_SIMILARITY {
            assert!((group_sim(*a, *b) - sim).abs() < f64::EPSILON);
            assert!((group_sim(*a, *b) - group_sim(*b, *a)).abs() < f64::EPSILON);
        }
        for a in ConceptGroup::ALL {
            for b in ConceptGroup::ALL {
                assert!((group_sim(a, b) - group_sim(b, a)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn test_table_has_no_duplicate_pairs() {
        for (i, (a, b, _)) in GROUP_SIMILARITY.iter().enumerate() {
            for (c, d, _) in &GROUP_SIMILARITY[i + 1..] {
                assert!(!((a == c && b == d) || (a == d && b == c)));
            }
        }
    }

    #[test]
    fn test_soft_similarity_empty() {
        let some: GroupSet = [ConceptGroup::Tech].into_iter().collect();
        assert_eq!(soft_group_similarity(&GroupSet::new(), &some), 0.0);
        assert_eq!(soft_group_similarity(&some, &GroupSet::new()), 0.0);
    }

    #[test]
    fn test_soft_similarity_best_match_average() {
        let name: GroupSet = [ConceptGroup::Security, ConceptGroup::Offer]
            .into_iter()
            .collect();
        let domain: GroupSet = [ConceptGroup::Forensic].into_iter().collect();
        // security→forensic 0.9, offer→forensic 0.0
        assert!((soft_group_similarity(&name, &domain) - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_soft_similarity_is_driven_by_first_set() {
        let a: GroupSet = [ConceptGroup::Forensic].into_iter().collect();
        let b: GroupSet = [ConceptGroup::Forensic, ConceptGroup::Offer]
            .into_iter()
            .collect();
        assert!((soft_group_similarity(&a, &b) - 1.0).abs() < f64::EPSILON);
        assert!((soft_group_similarity(&b, &a) - 0.5).abs() < f64::EPSILON);
    }
}
