//! Optional LLM fallback for queries the keyword classifier is unsure about.

pub mod client;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;

pub use client::OpenAiResponder;

/// Answers free text the local classifier could not handle.
///
/// Implementations never fail: any provider problem is reported as `None`
/// and the caller falls back to a canned reply.
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    async fn answer(&self, user_input: &str) -> Option<String>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Used when no provider is configured. Performs no I/O.
pub struct NoFallback;

#[async_trait]
impl FallbackResponder for NoFallback {
    async fn answer(&self, _user_input: &str) -> Option<String> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Picks the responder once, from whether an API key is present.
pub fn from_config(config: &LlmConfig) -> Arc<dyn FallbackResponder> {
    if config.api_key().is_some() {
        Arc::new(OpenAiResponder::new(config.clone()))
    } else {
        Arc::new(NoFallback)
    }
}
