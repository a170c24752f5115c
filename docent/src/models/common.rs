use serde::{Deserialize, Serialize};

/// Category assigned to an incoming documentation query.
///
/// Unknown input clamps to `General` rather than failing, so a misbehaving
/// model can never produce an out-of-range category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QueryCategory {
    HowTo,
    WhatIs,
    Troubleshooting,
    Configuration,
    ApiReference,
    #[default]
    General,
}

impl std::fmt::Display for QueryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HowTo => write!(f, "how-to"),
            Self::WhatIs => write!(f, "what-is"),
            Self::Troubleshooting => write!(f, "troubleshooting"),
            Self::Configuration => write!(f, "configuration"),
            Self::ApiReference => write!(f, "api-reference"),
            Self::General => write!(f, "general"),
        }
    }
}

impl std::str::FromStr for QueryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "how-to" | "howto" | "how_to" => Ok(Self::HowTo),
            "what-is" | "whatis" | "what_is" => Ok(Self::WhatIs),
            "troubleshooting" => Ok(Self::Troubleshooting),
            "configuration" | "config" => Ok(Self::Configuration),
            "api-reference" | "api_reference" | "api" => Ok(Self::ApiReference),
            _ => Ok(Self::General),
        }
    }
}

/// Estimated user skill level, used to tune answer tone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Ok(Self::Beginner),
        }
    }
}

/// Self-reported confidence tag the model is instructed to append to answers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceTag {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl std::fmt::Display for ConfidenceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl std::str::FromStr for ConfidenceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Ok(Self::Unknown),
        }
    }
}

/// Which corpus a merged search result came from.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Documentation,
    Github,
    Blog,
    Changelog,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Documentation => write!(f, "documentation"),
            Self::Github => write!(f, "github"),
            Self::Blog => write!(f, "blog"),
            Self::Changelog => write!(f, "changelog"),
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "documentation" | "docs" => Ok(Self::Documentation),
            "github" => Ok(Self::Github),
            "blog" => Ok(Self::Blog),
            "changelog" => Ok(Self::Changelog),
            _ => Err(format!("Unknown source kind: {s}")),
        }
    }
}

/// Marks whether a derived value came from the model or a degraded fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisOrigin {
    /// The primary model call succeeded.
    Model,
    /// Regex or static heuristics produced the value.
    Heuristic,
    /// A fixed-format substitute was returned after a model failure.
    Fallback,
}

impl std::fmt::Display for AnalysisOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Heuristic => write!(f, "heuristic"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Token accounting reported by the provider. Zeros when the provider
/// omits usage data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<async_openai::types::CompletionUsage> for TokenUsage {
    fn from(usage: async_openai::types::CompletionUsage) -> Self {
        Self {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        }
    }
}
