//! Multi-source search wire types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::aggregate::{AggregationMetrics, AggregationOverrides};
use crate::models::{AnalysisOrigin, Document, MultiSourceResult, TokenUsage, ValidationResult};

/// Request body for `POST /api/multi-source-search`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiSourceSearchRequest {
    #[validate(length(min = 1, max = 4000))]
    pub query: String,
    /// Documentation hits supplied by the caller; always ranked first.
    #[serde(default)]
    pub documents: Vec<Document>,
    pub system_context: Option<String>,
    /// Per-request source selection and result cap.
    pub config: Option<AggregationOverrides>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiSourceSearchResponse {
    pub answer: String,
    pub sources: Vec<MultiSourceResult>,
    pub aggregation_metrics: AggregationMetrics,
    pub validation: ValidationResult,
    pub usage: TokenUsage,
    /// Model answer or degraded source digest.
    pub origin: AnalysisOrigin,
}
