#![allow(dead_code)]

pub mod feedback;
pub mod importance;
pub mod reward;
pub mod state;

pub use feedback::{FeedbackEvaluator, ResponseAdjuster, RewardSystemConfig, SentimentScores};
pub use importance::{PRIVILEGED_INTENTS, estimate_importance};
pub use reward::RewardEngine;
pub use state::{AffectAxis, AffectVector};
