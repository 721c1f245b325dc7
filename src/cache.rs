//! Short-lived memo of chat replies, keyed by normalized input.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::chatbot::ChatReply;
use crate::error::CacheError;

const KEY_PREFIX: &str = "chatbot_response:";
/// Expired entries are swept once the map grows past this many keys.
const PURGE_THRESHOLD: usize = 1024;

/// Key-value store with per-entry TTL.
///
/// Entries expire by time only; nothing invalidates them early.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ChatReply>, CacheError>;
    async fn put(&self, key: &str, value: ChatReply, ttl: Duration) -> Result<(), CacheError>;
}

/// Cache key for a normalized input within a user/session scope.
pub fn cache_key(normalized: &str, user_id: Option<u64>, session_id: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update([0x1f_u8]);
    if let Some(uid) = user_id {
        hasher.update(uid.to_string().as_bytes());
    }
    hasher.update([0x1f_u8]);
    if let Some(sid) = session_id {
        hasher.update(sid.as_bytes());
    }
    format!("{}{:x}", KEY_PREFIX, hasher.finalize())
}

struct Entry {
    reply: ChatReply,
    expires_at: Instant,
}

/// Process-local cache. Expired entries are dropped on access, and swept in
/// bulk when the map grows past a threshold.
pub struct InMemoryResponseCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of entries still live.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &str) -> Result<Option<ChatReply>, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.reply.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: ChatReply, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| CacheError(format!("ttl {ttl:?} overflows the clock")))?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= PURGE_THRESHOLD {
            entries.retain(|_, e| e.expires_at > now);
        }
        entries.insert(key.to_string(), Entry { reply: value, expires_at });
        Ok(())
    }
}
