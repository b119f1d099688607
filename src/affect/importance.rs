use crate::affect::feedback::SentimentScores;
use crate::affect::state::AffectVector;

/// Intents that earn a flat retention bonus regardless of affect magnitude.
pub const PRIVILEGED_INTENTS: [&str; 3] = ["gratitude", "emotion_check", "conversation"];

/// Score how much a turn is worth remembering, in `[0, 1]`.
///
/// The affect term measures displacement: distance of happiness from its
/// resting point plus the raw sadness and curiosity magnitudes. Sentiment,
/// when the analyzer provided it, contributes a dampened share of its
/// compound value.
pub fn estimate_importance(
    intent: &str,
    sentiment: Option<&SentimentScores>,
    affect: &AffectVector,
) -> f64 {
    let mut score =
        (affect.happiness - 0.5).abs() + affect.sadness.abs() + affect.curiosity.abs();

    if PRIVILEGED_INTENTS.contains(&intent) {
        score += 0.2;
    }

    if let Some(sentiment) = sentiment {
        score += sentiment.compound.abs() * 0.3;
    }

    score.clamp(0.0, 1.0)
}
