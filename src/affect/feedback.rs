use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::affect::reward::RewardEngine;
use crate::affect::state::{AffectVector, clamp_unit};

const DISTRESS_KEYWORDS: [&str; 3] = ["sad", "stressed", "upset"];
const AFFINITY_BONUS_STEP: f64 = 0.05;

/// Keyword-driven feedback tuning, part of the personality configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardSystemConfig {
    #[serde(default = "default_positive_keywords")]
    pub positive_keywords: Vec<String>,
    #[serde(default = "default_negative_keywords")]
    pub negative_keywords: Vec<String>,
    #[serde(default = "default_intensity_weights")]
    pub intensity_weights: BTreeMap<String, f64>,
    #[serde(default = "default_affinity_bonus_triggers")]
    pub affinity_bonus_triggers: Vec<String>,
}

impl Default for RewardSystemConfig {
    fn default() -> Self {
        Self {
            positive_keywords: default_positive_keywords(),
            negative_keywords: default_negative_keywords(),
            intensity_weights: default_intensity_weights(),
            affinity_bonus_triggers: default_affinity_bonus_triggers(),
        }
    }
}

fn default_positive_keywords() -> Vec<String> {
    [
        "thank you",
        "good",
        "great",
        "amazing",
        "you helped",
        "appreciate you",
        "well done",
        "that's perfect",
        "fantastic job",
        "you made my day",
        "that was kind",
    ]
    .map(str::to_string)
    .to_vec()
}

fn default_negative_keywords() -> Vec<String> {
    [
        "bad",
        "sorry",
        "disappoint",
        "not helpful",
        "you failed",
        "annoying",
        "that sucks",
        "you're wrong",
        "waste of time",
        "i'm upset",
    ]
    .map(str::to_string)
    .to_vec()
}

fn default_intensity_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("thank you".to_string(), 0.5),
        ("you helped".to_string(), 1.0),
        ("you failed".to_string(), -1.0),
        ("annoying".to_string(), -0.8),
    ])
}

fn default_affinity_bonus_triggers() -> Vec<String> {
    ["thank you", "you made my day", "fantastic job"]
        .map(str::to_string)
        .to_vec()
}

/// Lexical sentiment summary of one user utterance. `compound` is normalized
/// into `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: u32,
    pub negative: u32,
    pub compound: f64,
}

/// Evaluates user feedback against the configured keyword tables, moving the
/// affect vector and the reward score as a side effect.
#[derive(Debug, Clone)]
pub struct FeedbackEvaluator {
    config: RewardSystemConfig,
}

impl FeedbackEvaluator {
    pub fn new(config: RewardSystemConfig) -> Self {
        Self { config }
    }

    /// `sentiment_override` is the analyzer's compound sentiment for the
    /// utterance, `0.0` when absent. Strong overrides (beyond +-0.3) apply a
    /// full-unit affect swing and a unit reward or penalty on top of the
    /// keyword-derived adjustments.
    pub fn evaluate(
        &self,
        user_text: &str,
        sentiment_override: f64,
        affect: &mut AffectVector,
        rewards: &mut RewardEngine,
    ) -> SentimentScores {
        let lowered = user_text.to_lowercase();

        let positive = self
            .config
            .positive_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .count() as u32;
        let negative = self
            .config
            .negative_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .count() as u32;

        for (phrase, weight) in &self.config.intensity_weights {
            if !lowered.contains(phrase.as_str()) {
                continue;
            }
            affect.adjust(*weight);
            let unit = weight.abs().floor().max(1.0);
            if *weight > 0.0 {
                rewards.apply(affect, unit, &format!("intensity:{phrase}"));
            } else {
                rewards.apply(affect, -unit, &format!("intensity:{phrase}"));
            }
        }

        let mut compound = 0.0;
        if sentiment_override != 0.0 {
            compound += sentiment_override;
            if sentiment_override > 0.3 {
                affect.adjust(1.0);
                rewards.apply(affect, 1.0, "positive_sentiment_override");
            } else if sentiment_override < -0.3 {
                affect.adjust(-1.0);
                rewards.apply(affect, -1.0, "negative_sentiment_override");
            }
        }

        if positive > 0 {
            affect.adjust(f64::from(positive) * 0.5);
        }
        if negative > 0 {
            affect.adjust(-f64::from(negative) * 0.5);
        }

        let net = i64::from(positive) - i64::from(negative);
        if net > 0 {
            rewards.apply(affect, net.max(1) as f64, "keyword_positive");
        } else if net < 0 {
            rewards.apply(affect, -(net.unsigned_abs().max(1) as f64), "keyword_negative");
        }

        if self
            .config
            .affinity_bonus_triggers
            .iter()
            .any(|trigger| lowered.contains(trigger.as_str()))
        {
            affect.affinity = clamp_unit(affect.affinity + AFFINITY_BONUS_STEP);
        }

        compound += f64::from(positive) - f64::from(negative);
        if compound != 0.0 {
            compound /= compound.abs().max(1.0);
        }

        SentimentScores {
            positive,
            negative,
            compound,
        }
    }
}

/// Post-generation response shaping driven by configured personality traits.
#[derive(Debug, Clone)]
pub struct ResponseAdjuster {
    core_traits: Vec<String>,
}

impl ResponseAdjuster {
    pub fn new(core_traits: Vec<String>) -> Self {
        Self { core_traits }
    }

    pub fn adjust(&self, user_text: &str, response: &str) -> String {
        let lowered = user_text.to_lowercase();
        let empathetic = self.core_traits.iter().any(|t| t == "empathetic");

        if empathetic && DISTRESS_KEYWORDS.iter().any(|kw| lowered.contains(kw)) {
            let mut adjusted = response.to_string();
            adjusted.push_str(" I'm here with you.");
            return adjusted;
        }

        response.to_string()
    }
}
