use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ChatbotError;
use crate::intent::catalog;
use crate::intent::classifier::normalize;

/// Name of the catch-all intent returned when nothing matches.
pub const DEFAULT_INTENT: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDefinition {
    pub name: String,
    /// Trigger phrases, matched case-insensitively on word boundaries.
    #[serde(default)]
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
    /// Suggestions shown after a reply. Empty means "use the table's generic list".
    #[serde(default)]
    pub follow_ups: Vec<String>,
}

impl IntentDefinition {
    pub fn new(name: &str, patterns: &[&str], responses: &[&str], follow_ups: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
            follow_ups: follow_ups.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Raw, unvalidated table shape as it appears in a JSON intents file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentTableDef {
    pub intents: Vec<IntentDefinition>,
    pub fallback_responses: Vec<String>,
    #[serde(default)]
    pub generic_follow_ups: Vec<String>,
}

/// Ordered, validated intent configuration.
///
/// Declaration order is significant: it breaks score ties during
/// classification. A table is never mutated after construction; training
/// builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentTable {
    intents: Vec<IntentDefinition>,
    fallback_responses: Vec<String>,
    generic_follow_ups: Vec<String>,
}

impl IntentTable {
    pub fn new(
        intents: Vec<IntentDefinition>,
        fallback_responses: Vec<String>,
        generic_follow_ups: Vec<String>,
    ) -> Result<Self, ChatbotError> {
        let fallback_responses: Vec<String> = fallback_responses
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .collect();
        if fallback_responses.is_empty() {
            return Err(ChatbotError::InvalidTable(
                "at least one fallback response is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut prepared = Vec::with_capacity(intents.len());
        for intent in intents {
            let name = intent.name.trim().to_string();
            if name.is_empty() {
                return Err(ChatbotError::InvalidTable("intent with empty name".to_string()));
            }
            if name == DEFAULT_INTENT {
                return Err(ChatbotError::InvalidTable(format!(
                    "'{DEFAULT_INTENT}' is reserved for the fallback intent"
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(ChatbotError::InvalidTable(format!("duplicate intent '{name}'")));
            }

            let responses: Vec<String> = intent
                .responses
                .into_iter()
                .filter(|r| !r.trim().is_empty())
                .collect();
            if responses.is_empty() {
                return Err(ChatbotError::InvalidTable(format!(
                    "intent '{name}' has no responses"
                )));
            }

            // Patterns go through the same normalization as user input, so
            // "doesn't work" is stored as "doesn t work".
            let mut patterns: Vec<String> = Vec::with_capacity(intent.patterns.len());
            for pattern in &intent.patterns {
                let normalized = normalize(pattern);
                if !normalized.is_empty() && !patterns.contains(&normalized) {
                    patterns.push(normalized);
                }
            }

            prepared.push(IntentDefinition {
                name,
                patterns,
                responses,
                follow_ups: intent.follow_ups,
            });
        }

        let generic_follow_ups = if generic_follow_ups.is_empty() {
            catalog::generic_follow_ups()
        } else {
            generic_follow_ups
        };

        Ok(Self {
            intents: prepared,
            fallback_responses,
            generic_follow_ups,
        })
    }

    pub fn from_def(def: IntentTableDef) -> Result<Self, ChatbotError> {
        Self::new(def.intents, def.fallback_responses, def.generic_follow_ups)
    }

    pub fn to_def(&self) -> IntentTableDef {
        IntentTableDef {
            intents: self.intents.clone(),
            fallback_responses: self.fallback_responses.clone(),
            generic_follow_ups: self.generic_follow_ups.clone(),
        }
    }

    pub fn intents(&self) -> &[IntentDefinition] {
        &self.intents
    }

    pub fn get(&self, name: &str) -> Option<&IntentDefinition> {
        self.intents.iter().find(|i| i.name == name)
    }

    pub fn fallback_responses(&self) -> &[String] {
        &self.fallback_responses
    }

    /// Responses for an intent name; the fallback set for `default` or unknown names.
    pub fn responses_for(&self, name: &str) -> &[String] {
        self.get(name)
            .map(|i| i.responses.as_slice())
            .unwrap_or(&self.fallback_responses)
    }

    pub fn follow_ups_for(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(intent) if !intent.follow_ups.is_empty() => intent.follow_ups.clone(),
            _ => self.generic_follow_ups.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub intent: String,
    pub score: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationDetails {
    /// Patterns of the winning intent that occurred in the input.
    pub matched_patterns: Vec<String>,
    /// Score of every declared intent, in declaration order.
    pub scores: Vec<IntentScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub intent: String,
    pub confidence: f32, // 0.0 - 1.0
    pub details: ClassificationDetails,
}

impl ClassificationResult {
    pub fn fallback() -> Self {
        Self {
            intent: DEFAULT_INTENT.to_string(),
            confidence: 0.0,
            details: ClassificationDetails::default(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.intent == DEFAULT_INTENT
    }
}
