use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::intent::types::ClassificationResult;

pub const DEFAULT_ESCALATION_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct EscalationPolicy {
    threshold: f32,
}

impl EscalationPolicy {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Low confidence hands the conversation to a person. The threshold itself does not escalate.
    pub fn needs_human_assistance(&self, result: &ClassificationResult) -> bool {
        result.confidence < self.threshold
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ESCALATION_THRESHOLD)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationTicket {
    pub escalated: bool,
    pub ticket_id: Uuid,
    pub message: String,
    pub expected_response_time: String,
    pub created_at: DateTime<Utc>,
}

/// Open a hand-off ticket for a human agent.
pub fn escalate_to_human(text: &str, user_id: Option<u64>, support_contact: &str) -> EscalationTicket {
    let ticket = EscalationTicket {
        escalated: true,
        ticket_id: Uuid::new_v4(),
        message: format!(
            "I've escalated your query to our support team. Someone will assist you shortly. \
             You can also contact our support directly at {support_contact}."
        ),
        expected_response_time: "within 24 hours".to_string(),
        created_at: Utc::now(),
    };

    info!(
        ticket_id = %ticket.ticket_id,
        user_id = ?user_id,
        input = text,
        "chatbot escalation to human agent"
    );

    ticket
}
