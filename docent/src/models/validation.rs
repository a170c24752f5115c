use serde::{Deserialize, Serialize};

use super::ConfidenceTag;

/// Boolean detections and counts extracted from a generated answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub has_citation: bool,
    pub has_confidence: bool,
    pub is_not_found: bool,
    pub has_code_example: bool,
    pub has_step_structure: bool,
    pub has_speculative_language: bool,
    pub word_count: usize,
}

/// Heuristic quality assessment of a generated answer.
///
/// Computed per request from the answer text and the document count;
/// no independent lifecycle. `is_valid` holds exactly when `score >= 60`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub confidence: ConfidenceTag,
    /// Additive rubric score in [0, 100].
    pub score: u8,
    pub warnings: Vec<String>,
    pub quality_metrics: QualityMetrics,
}
