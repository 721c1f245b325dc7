use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::info;

use super::metrics::{compute_snapshot, AnalyticsSnapshot};
use super::turn::ConversationTurn;
use crate::error::TranscriptError;

const MAX_TURNS: usize = 10_000;

/// Sink for answered conversation turns.
pub trait TurnLog: Send + Sync {
    fn record(&self, turn: &ConversationTurn) -> Result<(), TranscriptError>;

    /// Most recent turns for a user, newest first. Log-only sinks keep nothing.
    fn history(&self, _user_id: u64, _limit: usize) -> Vec<ConversationTurn> {
        Vec::new()
    }

    fn snapshot(&self) -> AnalyticsSnapshot {
        AnalyticsSnapshot::default()
    }
}

fn log_turn(turn: &ConversationTurn) {
    info!(
        user_id = turn.user_id,
        session_id = ?turn.session_id,
        user_input = %turn.input,
        intent = %turn.intent,
        confidence = turn.confidence,
        bot_response = %turn.response,
        timestamp = %turn.timestamp,
        "chatbot conversation"
    );
}

/// Writes turns to the application log only.
pub struct TracingTurnLog;

impl TurnLog for TracingTurnLog {
    fn record(&self, turn: &ConversationTurn) -> Result<(), TranscriptError> {
        log_turn(turn);
        Ok(())
    }
}

/// Logs turns and keeps the most recent ones in a bounded buffer.
#[derive(Debug)]
pub struct TurnRecorder {
    buffer: Mutex<VecDeque<ConversationTurn>>,
    capacity: usize,
}

impl TurnRecorder {
    pub fn new() -> Self {
        Self::with_capacity(MAX_TURNS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(capacity.min(MAX_TURNS))),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TurnRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnLog for TurnRecorder {
    fn record(&self, turn: &ConversationTurn) -> Result<(), TranscriptError> {
        log_turn(turn);
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| TranscriptError("turn buffer poisoned".to_string()))?;
        if buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(turn.clone());
        Ok(())
    }

    fn history(&self, user_id: u64, limit: usize) -> Vec<ConversationTurn> {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    fn snapshot(&self) -> AnalyticsSnapshot {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        compute_snapshot(&buffer)
    }
}
