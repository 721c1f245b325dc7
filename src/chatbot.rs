use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::cache::{cache_key, InMemoryResponseCache, ResponseCache};
use crate::config::ChatbotConfig;
use crate::error::ChatbotError;
use crate::intent::catalog::{self, FaqEntry};
use crate::intent::classifier::{normalize, IntentClassifier};
use crate::intent::types::{ClassificationResult, IntentDefinition, IntentTable, DEFAULT_INTENT};
use crate::response::escalation::{escalate_to_human, EscalationPolicy, EscalationTicket};
use crate::response::generator::ResponseGenerator;
use crate::services::llm::{self, FallbackResponder};
use crate::transcript::{AnalyticsSnapshot, ConversationTurn, TracingTurnLog, TurnLog, TurnRecorder};

/// What a user gets back for one message. Cached verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub intent: String,
    pub response: String,
    pub confidence: f32,
    pub follow_up_suggestions: Vec<String>,
    pub needs_human_assistance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: String,
    pub output: String,
    pub intent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub examples: usize,
    pub new_intents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotStatus {
    pub online: bool,
    pub version: String,
    pub capabilities: Vec<String>,
    pub llm_fallback: bool,
}

/// Chat assistant: classify, answer, escalate, memoize.
///
/// Shared across requests behind an `Arc`. The intent table can be replaced
/// by [`train`](Self::train); in-flight requests keep the snapshot they started with.
pub struct Chatbot {
    table: RwLock<Arc<IntentTable>>,
    generator: ResponseGenerator,
    escalation: EscalationPolicy,
    fallback: Arc<dyn FallbackResponder>,
    cache: Arc<dyn ResponseCache>,
    transcript: Arc<dyn TurnLog>,
    faq: Vec<FaqEntry>,
    cache_ttl: Duration,
    complex_query_threshold: f32,
    support_contact: String,
}

impl Chatbot {
    /// Wires the default collaborators from configuration.
    pub fn from_config(config: &ChatbotConfig) -> Result<Self, ChatbotError> {
        config.validate()?;
        let table = config.load_intent_table()?;
        let transcript: Arc<dyn TurnLog> = if config.keep_history {
            Arc::new(TurnRecorder::new())
        } else {
            Arc::new(TracingTurnLog)
        };
        Ok(ChatbotBuilder::new(table)
            .transcript(transcript)
            .escalation(EscalationPolicy::new(config.escalation_threshold))
            .complex_query_threshold(config.complex_query_threshold)
            .cache_ttl(config.cache_ttl())
            .fallback(llm::from_config(&config.llm))
            .support_contact(&config.support_contact)
            .build())
    }

    pub fn builder(table: IntentTable) -> ChatbotBuilder {
        ChatbotBuilder::new(table)
    }

    fn table_snapshot(&self) -> Arc<IntentTable> {
        self.table.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        IntentClassifier::new(self.table_snapshot()).classify(text)
    }

    pub fn respond(&self, result: &ClassificationResult) -> String {
        self.generator.respond(&self.table_snapshot(), result)
    }

    pub fn needs_human_assistance(&self, result: &ClassificationResult) -> bool {
        self.escalation.needs_human_assistance(result)
    }

    pub fn follow_up_suggestions(&self, intent: &str) -> Vec<String> {
        self.table_snapshot().follow_ups_for(intent)
    }

    /// Ask the LLM fallback directly. `None` when unconfigured or on any failure.
    pub async fn handle_complex_query(&self, text: &str) -> Option<String> {
        self.fallback.answer(text).await
    }

    /// Answer one user message.
    ///
    /// A cached reply for the same normalized text, user and session is
    /// returned untouched and is not recorded again.
    pub async fn process_input(
        &self,
        text: &str,
        user_id: Option<u64>,
        session_id: Option<&str>,
    ) -> ChatReply {
        let started = Instant::now();
        let normalized = normalize(text);
        let key = cache_key(&normalized, user_id, session_id);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(intent = %cached.intent, "chatbot cache hit");
                return cached;
            }
            Ok(None) => {}
            Err(e) => warn!("chatbot cache read failed, computing reply: {}", e),
        }

        let table = self.table_snapshot();
        let classification = IntentClassifier::new(table.clone()).classify_normalized(&normalized);

        let mut llm_answered = false;
        let response = if classification.confidence < self.complex_query_threshold {
            match self.fallback.answer(text).await {
                Some(answer) => {
                    llm_answered = true;
                    answer
                }
                None => self.generator.respond(&table, &classification),
            }
        } else {
            self.generator.respond(&table, &classification)
        };

        let reply = ChatReply {
            intent: classification.intent.clone(),
            response,
            confidence: classification.confidence,
            follow_up_suggestions: table.follow_ups_for(&classification.intent),
            needs_human_assistance: self.escalation.needs_human_assistance(&classification),
        };

        if let Err(e) = self.cache.put(&key, reply.clone(), self.cache_ttl).await {
            warn!("chatbot cache write failed: {}", e);
        }

        if let Some(user_id) = user_id {
            let turn = ConversationTurn {
                user_id,
                session_id: session_id.map(str::to_string),
                input: text.to_string(),
                intent: reply.intent.clone(),
                confidence: reply.confidence,
                response: reply.response.clone(),
                needs_human_assistance: reply.needs_human_assistance,
                llm_answered,
                response_time_ms: started.elapsed().as_millis() as u64,
                timestamp: Utc::now(),
            };
            if let Err(e) = self.transcript.record(&turn) {
                warn!("chatbot transcript write failed: {}", e);
            }
        }

        reply
    }

    pub fn escalate_to_human(&self, text: &str, user_id: Option<u64>) -> EscalationTicket {
        escalate_to_human(text, user_id, &self.support_contact)
    }

    pub fn conversation_history(&self, user_id: u64, limit: usize) -> Vec<ConversationTurn> {
        self.transcript.history(user_id, limit)
    }

    pub fn common_questions(&self) -> &[FaqEntry] {
        &self.faq
    }

    pub fn analytics(&self) -> AnalyticsSnapshot {
        self.transcript.snapshot()
    }

    /// Extend the intent table with example phrasings and answers.
    ///
    /// Each input becomes a pattern and each output a response of the named
    /// intent; unknown intents are appended after the existing ones. The new
    /// table replaces the old one at once. Cached replies are left alone and
    /// expire on their own schedule.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<TrainingSummary, ChatbotError> {
        for (i, ex) in examples.iter().enumerate() {
            if ex.input.trim().is_empty() || ex.output.trim().is_empty() || ex.intent.trim().is_empty() {
                return Err(ChatbotError::InvalidTraining(format!(
                    "example {i} has an empty input, output or intent"
                )));
            }
            // A pattern with no word characters could never match anything.
            if normalize(&ex.input).is_empty() {
                return Err(ChatbotError::InvalidTraining(format!(
                    "example {i} input '{}' has no words to match on",
                    ex.input
                )));
            }
        }

        let mut guard = self.table.write().unwrap_or_else(|e| e.into_inner());
        let mut def = guard.to_def();
        let mut new_intents = Vec::new();

        for ex in examples {
            let name = ex.intent.trim();
            if name == DEFAULT_INTENT {
                // The catch-all has no patterns; only its replies can grow.
                if !def.fallback_responses.contains(&ex.output) {
                    def.fallback_responses.push(ex.output.clone());
                }
                continue;
            }
            let idx = match def.intents.iter().position(|i| i.name == name) {
                Some(idx) => idx,
                None => {
                    def.intents.push(IntentDefinition {
                        name: name.to_string(),
                        patterns: Vec::new(),
                        responses: Vec::new(),
                        follow_ups: Vec::new(),
                    });
                    new_intents.push(name.to_string());
                    def.intents.len() - 1
                }
            };
            let intent = &mut def.intents[idx];
            intent.patterns.push(ex.input.clone());
            if !intent.responses.contains(&ex.output) {
                intent.responses.push(ex.output.clone());
            }
        }

        let table = IntentTable::from_def(def)?;
        *guard = Arc::new(table);

        info!(
            examples = examples.len(),
            new_intents = ?new_intents,
            "training chatbot with new data"
        );

        Ok(TrainingSummary {
            examples: examples.len(),
            new_intents,
        })
    }

    pub fn status(&self) -> BotStatus {
        let table = self.table_snapshot();
        BotStatus {
            online: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            capabilities: table.intents().iter().map(|i| i.name.clone()).collect(),
            llm_fallback: self.fallback.is_enabled(),
        }
    }
}

pub struct ChatbotBuilder {
    table: IntentTable,
    generator: Option<ResponseGenerator>,
    escalation: EscalationPolicy,
    fallback: Arc<dyn FallbackResponder>,
    cache: Option<Arc<dyn ResponseCache>>,
    transcript: Option<Arc<dyn TurnLog>>,
    cache_ttl: Duration,
    complex_query_threshold: f32,
    support_contact: String,
}

impl ChatbotBuilder {
    pub fn new(table: IntentTable) -> Self {
        let defaults = ChatbotConfig::default();
        Self {
            table,
            generator: None,
            escalation: EscalationPolicy::default(),
            fallback: Arc::new(llm::NoFallback),
            cache: None,
            transcript: None,
            cache_ttl: defaults.cache_ttl(),
            complex_query_threshold: defaults.complex_query_threshold,
            support_contact: defaults.support_contact,
        }
    }

    pub fn generator(mut self, generator: ResponseGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn escalation(mut self, policy: EscalationPolicy) -> Self {
        self.escalation = policy;
        self
    }

    pub fn fallback(mut self, fallback: Arc<dyn FallbackResponder>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn transcript(mut self, transcript: Arc<dyn TurnLog>) -> Self {
        self.transcript = Some(transcript);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn complex_query_threshold(mut self, threshold: f32) -> Self {
        self.complex_query_threshold = threshold;
        self
    }

    pub fn support_contact(mut self, contact: &str) -> Self {
        self.support_contact = contact.to_string();
        self
    }

    pub fn build(self) -> Chatbot {
        Chatbot {
            table: RwLock::new(Arc::new(self.table)),
            generator: self.generator.unwrap_or_default(),
            escalation: self.escalation,
            fallback: self.fallback,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(InMemoryResponseCache::new()) as Arc<dyn ResponseCache>),
            transcript: self
                .transcript
                .unwrap_or_else(|| Arc::new(TurnRecorder::new()) as Arc<dyn TurnLog>),
            faq: catalog::common_questions(),
            cache_ttl: self.cache_ttl,
            complex_query_threshold: self.complex_query_threshold,
            support_contact: self.support_contact,
        }
    }
}
