use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

use super::turn::ConversationTurn;

const TOP_INTENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentCount {
    pub intent: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_conversations: u64,
    pub avg_response_time_ms: f64,
    /// Share of turns answered without a human hand-off.
    pub resolution_rate: f64,
    pub human_handoff_rate: f64,
    pub llm_answer_rate: f64,
    /// Most frequent intents, highest count first, ties by name.
    pub top_intents: Vec<IntentCount>,
}

pub fn compute_snapshot(turns: &VecDeque<ConversationTurn>) -> AnalyticsSnapshot {
    let total = turns.len() as u64;
    if total == 0 {
        return AnalyticsSnapshot::default();
    }

    let mut handoffs = 0u64;
    let mut llm_answers = 0u64;
    let mut total_ms = 0u64;
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();

    for turn in turns {
        if turn.needs_human_assistance {
            handoffs += 1;
        }
        if turn.llm_answered {
            llm_answers += 1;
        }
        total_ms += turn.response_time_ms;
        *counts.entry(turn.intent.as_str()).or_insert(0) += 1;
    }

    // BTreeMap iteration is name-ordered, and the sort is stable.
    let mut top_intents: Vec<IntentCount> = counts
        .into_iter()
        .map(|(intent, count)| IntentCount {
            intent: intent.to_string(),
            count,
        })
        .collect();
    top_intents.sort_by(|a, b| b.count.cmp(&a.count));
    top_intents.truncate(TOP_INTENTS);

    let handoff_rate = handoffs as f64 / total as f64;

    AnalyticsSnapshot {
        total_conversations: total,
        avg_response_time_ms: total_ms as f64 / total as f64,
        resolution_rate: 1.0 - handoff_rate,
        human_handoff_rate: handoff_rate,
        llm_answer_rate: llm_answers as f64 / total as f64,
        top_intents,
    }
}
