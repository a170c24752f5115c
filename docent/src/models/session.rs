use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{QueryAnalysis, ValidationResult};

/// One completed query/answer exchange within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub query: String,
    pub answer: String,
    #[schema(value_type = String)]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<QueryAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

/// In-process conversation state.
///
/// Lives only in this process; a restart loses all sessions. The turn list
/// is FIFO-capped so a long conversation cannot grow without bound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSession {
    pub id: String,
    pub turns: Vec<ConversationTurn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub last_active_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(id: String, context: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            turns: Vec::new(),
            context,
            created_at: now,
            last_active_at: now,
        }
    }

    /// Append a turn, evicting the oldest turns beyond `max_turns`.
    pub fn push_turn(&mut self, turn: ConversationTurn, max_turns: usize) {
        self.turns.push(turn);
        while self.turns.len() > max_turns {
            self.turns.remove(0);
        }
        self.last_active_at = Utc::now();
    }

    pub fn touch(&mut self) {
        self.last_active_at = Utc::now();
    }

    pub fn last_turn(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }
}
