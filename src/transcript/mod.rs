//! Conversation transcript and analytics.
//!
//! Recording is best effort: a sink that fails never changes the reply a
//! user receives.

pub mod turn;
pub mod metrics;
pub mod recorder;

pub use turn::ConversationTurn;
pub use metrics::{AnalyticsSnapshot, IntentCount};
pub use recorder::{TracingTurnLog, TurnLog, TurnRecorder};
