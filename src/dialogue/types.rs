use std::collections::BTreeMap;

use crate::affect::SentimentScores;

/// A named entity surfaced by the analyzer, e.g. `("Tokyo", "GPE")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisMetadata {
    pub sentiment: Option<SentimentScores>,
    pub entities: Vec<Entity>,
    pub confidence: f64,
    pub semantic_similarity: BTreeMap<String, f64>,
}

/// Result of the external analysis stage. The analyzer contract is total:
/// unrecognized or empty input yields intent `"unknown"` with empty
/// metadata, never an error.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub intent: String,
    pub metadata: AnalysisMetadata,
}

impl Analysis {
    pub fn unknown() -> Self {
        Self {
            intent: "unknown".to_string(),
            metadata: AnalysisMetadata::default(),
        }
    }
}

/// What one completed turn hands back to the run loop.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub end_session: bool,
}
