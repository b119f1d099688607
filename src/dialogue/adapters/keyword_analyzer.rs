use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{
    affect::SentimentScores,
    dialogue::{
        commands::contains_phrase,
        ports::AnalyzerPort,
        types::{Analysis, AnalysisMetadata},
    },
};

const INTENT_EXAMPLES: [(&str, &[&str]); 5] = [
    ("gratitude", &["thank you", "thanks", "i appreciate you", "good job"]),
    ("goodbye", &["bye", "see you", "goodbye", "exit", "shut down"]),
    ("emotion_check", &["how are you", "how do you feel", "are you okay"]),
    ("conversation", &["just chatting", "talk to me", "let's talk", "can we talk"]),
    ("greeting", &["hello", "hi", "hi there", "hey", "hiya", "yo"]),
];

const POSITIVE_WORDS: [&str; 8] = [
    "good", "great", "love", "wonderful", "amazing", "happy", "thanks", "thank",
];
const NEGATIVE_WORDS: [&str; 8] = [
    "bad", "sad", "terrible", "awful", "hate", "angry", "upset", "stressed",
];

/// Deterministic phrase-table analyzer: the default stand-in for a real
/// language-understanding backend. Total by construction: anything it cannot
/// place comes back as `"unknown"` with empty metadata.
#[derive(Debug, Clone, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalyzerPort for KeywordAnalyzer {
    async fn analyze(&self, text: &str) -> Analysis {
        let cleaned = text.trim().to_lowercase();
        if cleaned.is_empty() {
            return Analysis::unknown();
        }

        let matched_intent = INTENT_EXAMPLES.iter().find_map(|(intent, phrases)| {
            phrases
                .iter()
                .any(|phrase| contains_phrase(&cleaned, phrase))
                .then_some(*intent)
        });

        let positive = POSITIVE_WORDS
            .iter()
            .filter(|word| contains_phrase(&cleaned, word))
            .count() as u32;
        let negative = NEGATIVE_WORDS
            .iter()
            .filter(|word| contains_phrase(&cleaned, word))
            .count() as u32;
        let hits = positive + negative;
        let sentiment = (hits > 0).then(|| SentimentScores {
            positive,
            negative,
            compound: (f64::from(positive) - f64::from(negative)) / f64::from(hits.max(1)),
        });

        let mut semantic_similarity = BTreeMap::new();
        if let Some(intent) = matched_intent {
            semantic_similarity.insert(intent.to_string(), 1.0);
        }

        Analysis {
            intent: matched_intent.unwrap_or("unknown").to_string(),
            metadata: AnalysisMetadata {
                sentiment,
                entities: Vec::new(),
                confidence: if matched_intent.is_some() { 0.9 } else { 0.2 },
                semantic_similarity,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KeywordAnalyzer;
    use crate::dialogue::ports::AnalyzerPort;

    #[tokio::test]
    async fn classifies_known_phrases() {
        let analyzer = KeywordAnalyzer::new();
        assert_eq!(analyzer.analyze("thank you so much").await.intent, "gratitude");
        assert_eq!(analyzer.analyze("how are you").await.intent, "emotion_check");
        assert_eq!(analyzer.analyze("shut down").await.intent, "goodbye");
    }

    #[tokio::test]
    async fn empty_input_is_unknown_with_empty_metadata() {
        let analyzer = KeywordAnalyzer::new();
        let analysis = analyzer.analyze("   ").await;
        assert_eq!(analysis.intent, "unknown");
        assert!(analysis.metadata.sentiment.is_none());
        assert!(analysis.metadata.entities.is_empty());
    }

    #[tokio::test]
    async fn sentiment_compound_reflects_word_balance() {
        let analyzer = KeywordAnalyzer::new();
        let analysis = analyzer.analyze("this was a great and wonderful day").await;
        let sentiment = analysis.metadata.sentiment.expect("sentiment expected");
        assert_eq!(sentiment.positive, 2);
        assert_eq!(sentiment.compound, 1.0);

        let mixed = analyzer.analyze("good but also bad").await;
        let sentiment = mixed.metadata.sentiment.expect("sentiment expected");
        assert_eq!(sentiment.compound, 0.0);
    }
}
