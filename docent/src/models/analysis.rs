use serde::{Deserialize, Serialize};

use super::{AnalysisOrigin, QueryCategory, SkillLevel};

/// Classification output attached to every generated answer.
///
/// Produced once per request and immutable afterward. The `origin` field
/// records whether the model call succeeded or the regex fallback ran.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryAnalysis {
    pub category: QueryCategory,
    /// Short free-text description of what the user is after.
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reformulated_query: Option<String>,
    pub keywords: Vec<String>,
    pub complexity: SkillLevel,
    pub origin: AnalysisOrigin,
}
