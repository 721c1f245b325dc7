use thiserror::Error;

/// Errors surfaced by configuration, intent-table handling and training.
///
/// Request handling itself never returns these: classification, fallback and
/// cache failures all degrade to a canned reply.
#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid intent table: {0}")]
    InvalidTable(String),

    #[error("invalid training example: {0}")]
    InvalidTraining(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure reported by a cache backend. Always treated as a miss by callers.
#[derive(Debug, Error)]
#[error("cache backend unavailable: {0}")]
pub struct CacheError(pub String);

/// Failure writing a conversation turn. Logged and otherwise ignored.
#[derive(Debug, Error)]
#[error("transcript write failed: {0}")]
pub struct TranscriptError(pub String);
