use std::sync::Arc;

use super::types::*;

/// Lowercases, replaces punctuation with spaces and trims.
///
/// Word characters (alphanumerics and `_`) and whitespace survive; anything
/// else becomes a space, so "what's up?" normalizes to "what s up".
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned.trim().to_string()
}

/// Keyword classifier over a fixed intent table.
pub struct IntentClassifier {
    table: Arc<IntentTable>,
}

impl IntentClassifier {
    pub fn new(table: Arc<IntentTable>) -> Self {
        Self { table }
    }

    /// Classify free text.
    ///
    /// Each intent scores one point per distinct pattern found in the input.
    /// The best score wins, earlier-declared intents win ties, and confidence
    /// is the score divided by the number of input words (capped at 1.0).
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let normalized = normalize(text);
        self.classify_normalized(&normalized)
    }

    /// Same as [`classify`](Self::classify) for input already passed through [`normalize`].
    pub fn classify_normalized(&self, normalized: &str) -> ClassificationResult {
        let words: Vec<&str> = normalized.split_whitespace().collect();
        if words.is_empty() {
            return ClassificationResult::fallback();
        }

        let mut scores = Vec::with_capacity(self.table.intents().len());
        let mut best: Option<(usize, Vec<String>)> = None;
        let mut best_score = 0;

        for (idx, intent) in self.table.intents().iter().enumerate() {
            let matched: Vec<String> = intent
                .patterns
                .iter()
                .filter(|p| contains_phrase(&words, p))
                .cloned()
                .collect();
            let score = matched.len();

            scores.push(IntentScore {
                intent: intent.name.clone(),
                score,
            });

            // Strict comparison keeps the earlier intent on ties.
            if score > best_score {
                best_score = score;
                best = Some((idx, matched));
            }
        }

        let Some((idx, matched_patterns)) = best else {
            return ClassificationResult {
                details: ClassificationDetails {
                    matched_patterns: Vec::new(),
                    scores,
                },
                ..ClassificationResult::fallback()
            };
        };

        let confidence = (best_score as f32 / words.len() as f32).clamp(0.0, 1.0);

        ClassificationResult {
            intent: self.table.intents()[idx].name.clone(),
            confidence,
            details: ClassificationDetails {
                matched_patterns,
                scores,
            },
        }
    }
}

/// True when the words of `phrase` appear as a contiguous run in `words`.
fn contains_phrase(words: &[&str], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words.windows(needle.len()).any(|w| w == needle.as_slice())
}
