use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ChatbotError;
use crate::intent::catalog;
use crate::intent::types::{IntentTable, IntentTableDef};
use crate::response::escalation::DEFAULT_ESCALATION_THRESHOLD;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
/// Replies older than a day are never worth serving.
pub const MAX_CACHE_TTL_SECS: u64 = 86_400;
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 5;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful customer service assistant for an online marketplace. \
Answer questions politely and professionally, focusing on marketplace topics like products, orders, \
accounts, payments, and general support. Keep responses concise and helpful.";

/// External chat-completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Absent or blank disables the fallback entirely.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 150,
            temperature: 0.7,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Confidence below this sets `needs_human_assistance`.
    pub escalation_threshold: f32,
    /// Confidence below this consults the LLM fallback before the canned reply.
    pub complex_query_threshold: f32,
    pub cache_ttl_secs: u64,
    /// JSON intent table; the built-in marketplace table is used when unset.
    pub intents_path: Option<PathBuf>,
    pub support_contact: String,
    /// Keep recent turns in memory for history and analytics. When off,
    /// turns are only written to the log.
    pub keep_history: bool,
    pub llm: LlmConfig,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            escalation_threshold: DEFAULT_ESCALATION_THRESHOLD,
            complex_query_threshold: DEFAULT_ESCALATION_THRESHOLD,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            intents_path: None,
            support_contact: "support@example.com".to_string(),
            keep_history: true,
            llm: LlmConfig::default(),
        }
    }
}

impl ChatbotConfig {
    /// Defaults overridden by environment variables.
    pub fn from_env() -> Result<Self, ChatbotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChatbotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = lookup("OPENAI_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            config.llm.model = model;
        }
        if let Some(v) = lookup("CHATBOT_LLM_TIMEOUT_SECS") {
            config.llm.timeout_secs = parse_var("CHATBOT_LLM_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("CHATBOT_CACHE_TTL_SECS") {
            config.cache_ttl_secs = parse_var("CHATBOT_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("CHATBOT_ESCALATION_THRESHOLD") {
            config.escalation_threshold = parse_var("CHATBOT_ESCALATION_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("CHATBOT_COMPLEX_QUERY_THRESHOLD") {
            config.complex_query_threshold = parse_var("CHATBOT_COMPLEX_QUERY_THRESHOLD", &v)?;
        }
        if let Some(path) = lookup("CHATBOT_INTENTS_PATH") {
            config.intents_path = Some(PathBuf::from(path));
        }
        if let Some(contact) = lookup("CHATBOT_SUPPORT_CONTACT") {
            config.support_contact = contact;
        }

        if let Some(v) = lookup("CHATBOT_KEEP_HISTORY") {
            config.keep_history = parse_var("CHATBOT_KEEP_HISTORY", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChatbotError> {
        for (name, value) in [
            ("escalation_threshold", self.escalation_threshold),
            ("complex_query_threshold", self.complex_query_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ChatbotError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.cache_ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(ChatbotError::Config(format!(
                "cache ttl must be at most {MAX_CACHE_TTL_SECS}s, got {}",
                self.cache_ttl_secs
            )));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ChatbotError::Config("llm timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Loads the configured intent table, or the built-in one.
    pub fn load_intent_table(&self) -> Result<IntentTable, ChatbotError> {
        match &self.intents_path {
            Some(path) => load_intent_table(path),
            None => catalog::builtin_table(),
        }
    }
}

pub fn load_intent_table(path: &Path) -> Result<IntentTable, ChatbotError> {
    let content = std::fs::read_to_string(path)?;
    let def: IntentTableDef = serde_json::from_str(&content)?;
    IntentTable::from_def(def)
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, ChatbotError> {
    raw.trim()
        .parse()
        .map_err(|_| ChatbotError::Config(format!("invalid value for {name}: '{raw}'")))
}
