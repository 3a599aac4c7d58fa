use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PASS_THRESHOLD;

/// Three-way quality bucket for a semantic density score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdStatus {
    Excellent,
    Good,
    Poor,
}

impl SdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdStatus::Excellent => "excellent",
            SdStatus::Good => "good",
            SdStatus::Poor => "poor",
        }
    }

    /// Badge color used by the form.
    pub fn color(&self) -> &'static str {
        match self {
            SdStatus::Excellent | SdStatus::Good => "success",
            SdStatus::Poor => "destructive",
        }
    }
}

/// Why an input was rejected before scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    EmptyInput,
    InputTooShort,
    NoSignificantWords,
}

impl ValidationFailure {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationFailure::EmptyInput => "Fill in name and domain",
            ValidationFailure::InputTooShort => "Text too short to analyze",
            ValidationFailure::NoSignificantWords => {
                "Use meaningful words (not only function words)"
            }
        }
    }
}

/// Outcome of scoring a (name, domain) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdResult {
    /// In [0, 1], two decimals
    pub score: f64,
    pub status: SdStatus,
    pub message: String,

    /// Set when the input never reached the scoring pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ValidationFailure>,
}

impl SdResult {
    pub fn rejected(failure: ValidationFailure) -> Self {
        Self {
            score: 0.0,
            status: SdStatus::Poor,
            message: failure.message().to_string(),
            failure: Some(failure),
        }
    }

    /// Whether the score clears the externally quoted pass bar.
    pub fn passes(&self) -> bool {
        self.score >= PASS_THRESHOLD
    }
}

/// A rewritten name that scores higher than the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub sd: f64,
    /// Relative improvement in percent, or absolute points when the current
    /// score is ~0. Capped for display.
    pub improvement: f64,
}

/// Score plus, when it does not pass, rewrite suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub result: SdResult,
    pub suggestions: Vec<Suggestion>,
}

// ── Alignment report ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordKind {
    Technical,
    Action,
    /// Marketing noise; filtered out of reports
    Quality,
    Domain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAlignment {
    pub word: String,
    #[serde(rename = "type")]
    pub kind: KeywordKind,
    pub frequency: usize,
    pub relevance: f64,
    pub alignment: f64,
    pub contribution: f64,
}

/// Same JSON shape as the remote `analyze-alignment` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub agent_name: String,
    pub domain: String,
    pub semantic_density: f64,
    pub word_count: usize,
    pub keywords_analysis: Vec<KeywordAlignment>,
    pub top_contributors: Vec<String>,
    pub weak_links: Vec<String>,
    pub recommendations: Vec<String>,
}

// ── Agent record ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptIdentity {
    pub name: String,
    pub domain: String,
    pub sd_score: f64,
    pub principle: String,
    pub anti_pattern: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    List,
    Json,
    #[default]
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionScope {
    pub input_type: String,
    pub output_type: String,
    pub context: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptMission {
    pub primary_mission: String,
    pub scope: MissionScope,
    /// Three-step methodology
    pub methodology: [String; 3],
    pub quality_criteria: Vec<String>,
    pub do_not_modify: String,
    pub always_preserve: String,
    pub output_format: OutputFormat,
    pub output_structure: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Website,
    Youtube,
    Social,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceItem {
    pub id: String,
    pub kind: SourceKind,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl SourceItem {
    pub fn new(kind: SourceKind, url: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            url: url.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptProtocol {
    pub sources: Vec<SourceItem>,
    pub emotion_filters: String,
    pub attention_phrases: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseshotKind {
    Positive,
    Negative,
    EdgeCase,
}

/// Worked input/output sample used to calibrate the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseshotExample {
    pub kind: BaseshotKind,
    pub example: String,
}

impl BaseshotExample {
    pub fn new(kind: BaseshotKind, example: &str) -> Self {
        Self {
            kind,
            example: example.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub token_count: usize,
    pub created_at: DateTime<Utc>,
    pub author: Option<String>,
}

/// An assembled agent prompt: identity, mission, protocol, examples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptAgent {
    pub id: String,
    pub identity: PromptIdentity,
    pub mission: PromptMission,
    pub protocol: PromptProtocol,
    pub baseshot: Vec<BaseshotExample>,
    pub metadata: AgentMetadata,
}

impl PromptAgent {
    pub fn new(name: &str, domain: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            identity: PromptIdentity {
                name: name.to_string(),
                domain: domain.to_string(),
                ..PromptIdentity::default()
            },
            mission: PromptMission::default(),
            protocol: PromptProtocol::default(),
            baseshot: Vec::new(),
            metadata: AgentMetadata {
                token_count: 0,
                created_at: Utc::now(),
                author: None,
            },
        }
    }

    pub fn with_principle(mut self, principle: &str, anti_pattern: &str) -> Self {
        self.identity.principle = principle.to_string();
        self.identity.anti_pattern = anti_pattern.to_string();
        self
    }

    pub fn with_mission(mut self, mission: PromptMission) -> Self {
        self.mission = mission;
        self
    }

    pub fn with_protocol(mut self, protocol: PromptProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_baseshot(mut self, examples: Vec<BaseshotExample>) -> Self {
        self.baseshot = examples;
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.metadata.author = Some(author.to_string());
        self
    }

    /// Every free-text field, in prompt order. Used for token estimates.
    pub fn text_fields(&self) -> Vec<&str> {
        let i = &self.identity;
        let m = &self.mission;
        let p = &self.protocol;

        let mut fields = vec![
            i.name.as_str(),
            i.domain.as_str(),
            i.principle.as_str(),
            i.anti_pattern.as_str(),
            m.primary_mission.as_str(),
            m.scope.input_type.as_str(),
            m.scope.output_type.as_str(),
            m.scope.context.as_str(),
        ];
        fields.extend(m.methodology.iter().map(|s| s.as_str()));
        fields.extend(m.quality_criteria.iter().map(|s| s.as_str()));
        fields.extend([
            m.do_not_modify.as_str(),
            m.always_preserve.as_str(),
            m.output_structure.as_str(),
            p.emotion_filters.as_str(),
            p.attention_phrases.as_str(),
        ]);
        fields.extend(self.baseshot.iter().map(|b| b.example.as_str()));
        fields
    }
}
