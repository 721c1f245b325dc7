use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::intent::types::{ClassificationResult, IntentTable};

/// Used only if a table somehow yields no usable template.
pub const APOLOGY_RESPONSE: &str =
    "Sorry, I didn't quite get that. Could you try asking in a different way?";

/// Chooses which of `len` candidate templates to use.
pub trait ResponsePicker: Send + Sync {
    /// Returns an index in `0..len`. Only called with `len > 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice backed by a seedable `StdRng`.
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }
}

impl ResponsePicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..len)
    }
}

/// Always the first template.
pub struct FirstPicker;

impl ResponsePicker for FirstPicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

pub struct ResponseGenerator {
    picker: Box<dyn ResponsePicker>,
}

impl ResponseGenerator {
    pub fn new(picker: Box<dyn ResponsePicker>) -> Self {
        Self { picker }
    }

    /// Pick a canned reply for the classified intent. Never returns an empty string.
    pub fn respond(&self, table: &IntentTable, result: &ClassificationResult) -> String {
        let candidates = table.responses_for(&result.intent);
        if candidates.is_empty() {
            return APOLOGY_RESPONSE.to_string();
        }

        let idx = self.picker.pick(candidates.len()).min(candidates.len() - 1);
        let chosen = candidates[idx].trim();
        if chosen.is_empty() {
            APOLOGY_RESPONSE.to_string()
        } else {
            chosen.to_string()
        }
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new(Box::new(SeededPicker::from_os_rng()))
    }
}
