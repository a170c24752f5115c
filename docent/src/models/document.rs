use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SourceKind;

/// A document retrieved by the caller's search index.
///
/// Callers own retrieval; this service only arranges already-fetched
/// documents into a prompt, so documents are read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub url: String,
    pub content: String,
    /// Section path within the documentation tree, e.g. `["Guides", "Auth"]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A document generalized with its source corpus and a sort weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultiSourceResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub source: SourceKind,
    /// Per-source-type priority in [0, 1]. Sort order only, not a probability.
    pub weight: f64,
    /// True for issue-tracker items that are closed/resolved.
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MultiSourceResult {
    pub fn from_document(doc: Document, source: SourceKind, weight: f64) -> Self {
        Self {
            title: doc.title,
            url: doc.url,
            content: doc.content,
            source,
            weight,
            resolved: false,
            timestamp: None,
        }
    }

    /// Effective sort key: base weight plus the resolved bonus where it applies.
    pub fn sort_weight(&self, resolved_bonus: f64) -> f64 {
        if self.resolved {
            self.weight + resolved_bonus
        } else {
            self.weight
        }
    }
}
