use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One answered chat message, recorded for analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_id: u64,
    pub session_id: Option<String>,
    pub input: String,
    pub intent: String,
    pub confidence: f32,
    pub response: String,
    pub needs_human_assistance: bool,
    /// True when the reply came from the LLM fallback rather than a template.
    pub llm_answered: bool,
    pub response_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}
