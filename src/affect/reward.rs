use crate::affect::state::{AffectVector, clamp_unit};

/// Running reward score. The score itself is unbounded; only the soft
/// coupling into the affect vector is clamped.
#[derive(Debug, Clone, Default)]
pub struct RewardEngine {
    score: f64,
}

impl RewardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Accumulate `points` and nudge the affect vector: positive points lift
    /// happiness by a fixed step, negative points deepen sadness by the same
    /// step. Independent from `AffectVector::adjust`.
    pub fn apply(&mut self, affect: &mut AffectVector, points: f64, reason: &str) {
        self.score += points;

        if points > 0.0 {
            affect.happiness = clamp_unit(affect.happiness + 0.05);
        } else if points < 0.0 {
            affect.sadness = clamp_unit(affect.sadness + 0.05);
        }

        tracing::info!(
            target: "affect",
            points = points,
            score = self.score,
            reason = reason,
            "reward_applied"
        );
    }
}
