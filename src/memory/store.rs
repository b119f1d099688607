use std::collections::VecDeque;

use crate::{
    affect::AffectVector,
    memory::{
        error::MemoryError,
        persistence::{MemoryPersistence, PersistedMemory},
        types::{MemoryItem, now_epoch_seconds},
    },
};

pub const SUMMARY_INTENT: &str = "memory_summary";
const SUMMARY_PLACEHOLDER: &str = "(summary)";

/// Two-tier interaction memory: a bounded FIFO short-term window used for
/// context assembly, and an importance-gated long-term archive that is
/// consolidated destructively once it outgrows its cap.
#[derive(Debug)]
pub struct MemoryStore {
    short_term: VecDeque<MemoryItem>,
    long_term: Vec<MemoryItem>,
    short_term_limit: usize,
    importance_threshold: f64,
    persistence: MemoryPersistence,
}

impl MemoryStore {
    /// Loads prior state when a valid file exists. A missing file starts
    /// empty; a malformed file is logged and also starts empty rather than
    /// failing startup.
    pub fn open(
        persistence: MemoryPersistence,
        short_term_limit: usize,
        importance_threshold: f64,
    ) -> Self {
        let (short_term, long_term) = match persistence.load() {
            Ok(Some(state)) => (VecDeque::from(state.short_term), state.long_term),
            Ok(None) => (VecDeque::new(), Vec::new()),
            Err(err) => {
                tracing::warn!(
                    target: "memory",
                    path = %persistence.path().display(),
                    error = %err,
                    "memory_load_failed_starting_empty"
                );
                (VecDeque::new(), Vec::new())
            }
        };

        Self {
            short_term,
            long_term,
            short_term_limit,
            importance_threshold,
            persistence,
        }
    }

    /// Record one completed turn. Evicts the single oldest short-term item
    /// past the capacity, admits the item to long-term when its importance
    /// clears the threshold, and persists the whole store before returning.
    /// A failed save is logged; the in-memory state stays authoritative.
    pub fn add_interaction(
        &mut self,
        user_input: &str,
        assistant_response: &str,
        intent: &str,
        emotion: AffectVector,
        importance: f64,
    ) {
        let item = MemoryItem {
            timestamp: now_epoch_seconds(),
            user_input: user_input.to_string(),
            assistant_response: assistant_response.to_string(),
            intent: intent.to_string(),
            emotion,
            importance,
            summary: None,
        };

        self.short_term.push_back(item.clone());
        while self.short_term.len() > self.short_term_limit {
            self.short_term.pop_front();
        }

        if importance >= self.importance_threshold {
            self.long_term.push(item);
        }

        self.save_or_warn();
    }

    /// Short-term transcript in insertion order, for generative context.
    pub fn recent_context(&self) -> String {
        let mut lines = Vec::with_capacity(self.short_term.len() * 2);
        for item in &self.short_term {
            lines.push(format!("User: {}", item.user_input));
            lines.push(format!("Assistant: {}", item.assistant_response));
        }
        lines.join("\n")
    }

    /// Per-axis mean of the short-term emotion snapshots. `None` when the
    /// window is empty: absence is distinguishable from a zero vector.
    pub fn emotional_trend(&self) -> Option<AffectVector> {
        if self.short_term.is_empty() {
            return None;
        }

        let count = self.short_term.len() as f64;
        let mut trend = AffectVector {
            happiness: 0.0,
            sadness: 0.0,
            curiosity: 0.0,
            affinity: 0.0,
        };
        for item in &self.short_term {
            trend.happiness += item.emotion.happiness;
            trend.sadness += item.emotion.sadness;
            trend.curiosity += item.emotion.curiosity;
            trend.affinity += item.emotion.affinity;
        }
        trend.happiness /= count;
        trend.sadness /= count;
        trend.curiosity /= count;
        trend.affinity /= count;

        Some(trend)
    }

    /// Lossy consolidation. At or below `max_items` this is a no-op; above
    /// it, the whole long-term archive is replaced by a single synthetic
    /// summary item built from the most recent `max_items` entries. History
    /// beyond that window is discarded, not archived elsewhere.
    pub fn summarize_long_term(&mut self, max_items: usize) {
        if self.long_term.len() <= max_items {
            return;
        }

        let window_start = self.long_term.len() - max_items;
        let summary_text = self.long_term[window_start..]
            .iter()
            .map(|item| format!("{} ({:.2})", item.intent, item.importance))
            .collect::<Vec<_>>()
            .join(" | ");

        let discarded = self.long_term.len();
        let summary_item = MemoryItem {
            timestamp: now_epoch_seconds(),
            user_input: SUMMARY_PLACEHOLDER.to_string(),
            assistant_response: SUMMARY_PLACEHOLDER.to_string(),
            intent: SUMMARY_INTENT.to_string(),
            emotion: self.emotional_trend().unwrap_or_default(),
            importance: 1.0,
            summary: Some(summary_text),
        };

        self.long_term = vec![summary_item];
        tracing::info!(
            target: "memory",
            consolidated = discarded,
            window = max_items,
            "long_term_consolidated"
        );
        self.save_or_warn();
    }

    pub fn flush(&self) -> Result<(), MemoryError> {
        self.persistence.save(&self.snapshot())
    }

    pub fn short_term(&self) -> &VecDeque<MemoryItem> {
        &self.short_term
    }

    pub fn long_term(&self) -> &[MemoryItem] {
        &self.long_term
    }

    fn snapshot(&self) -> PersistedMemory {
        PersistedMemory {
            short_term: self.short_term.iter().cloned().collect(),
            long_term: self.long_term.clone(),
        }
    }

    fn save_or_warn(&self) {
        if let Err(err) = self.flush() {
            tracing::warn!(
                target: "memory",
                path = %self.persistence.path().display(),
                error = %err,
                "memory_save_failed"
            );
        }
    }
}
