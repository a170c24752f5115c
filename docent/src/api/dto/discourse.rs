//! Forum-responder wire types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Document, TokenUsage, ValidationResult};
use crate::services::ForumPost;

/// Request body for `POST /api/discourse-response`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscourseRequest {
    #[validate(length(min = 1, max = 400))]
    pub title: String,
    /// Raw body of the forum post.
    #[validate(length(min = 1, max = 20000))]
    pub post: String,
    pub category: Option<String>,
    /// Discourse trust level of the poster, 0 through 4.
    #[serde(default)]
    pub trust_level: u8,
    pub username: Option<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl From<DiscourseRequest> for ForumPost {
    fn from(request: DiscourseRequest) -> Self {
        ForumPost {
            title: request.title,
            post: request.post,
            category: request.category,
            trust_level: request.trust_level,
            username: request.username,
            documents: request.documents,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscourseResponse {
    pub reply: String,
    /// True when the reply was served from the response cache.
    pub cached: bool,
    pub validation: ValidationResult,
    pub usage: TokenUsage,
}
