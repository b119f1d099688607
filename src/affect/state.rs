use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectAxis {
    Happiness,
    Sadness,
    Curiosity,
    Affinity,
}

impl AffectAxis {
    pub const ALL: [AffectAxis; 4] = [
        AffectAxis::Happiness,
        AffectAxis::Sadness,
        AffectAxis::Curiosity,
        AffectAxis::Affinity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AffectAxis::Happiness => "happiness",
            AffectAxis::Sadness => "sadness",
            AffectAxis::Curiosity => "curiosity",
            AffectAxis::Affinity => "affinity",
        }
    }
}

/// Four-axis affect state. Every axis is held in `[0.0, 1.0]`; all mutators
/// clamp, so no caller can push an axis out of range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectVector {
    pub happiness: f64,
    pub sadness: f64,
    pub curiosity: f64,
    pub affinity: f64,
}

impl Default for AffectVector {
    fn default() -> Self {
        Self::baseline()
    }
}

impl AffectVector {
    pub fn baseline() -> Self {
        Self {
            happiness: 0.5,
            sadness: 0.2,
            curiosity: 0.3,
            affinity: 0.0,
        }
    }

    /// Apply a coarse scalar delta across all axes. The scaling is
    /// deliberately asymmetric: happiness reacts the most, affinity the
    /// least, and sadness moves against the sign of the delta.
    pub fn adjust(&mut self, delta: f64) {
        self.happiness = clamp_unit(self.happiness + delta * 0.1);
        self.sadness = clamp_unit(self.sadness - delta * 0.05);
        self.curiosity = clamp_unit(self.curiosity + delta * 0.02);
        self.affinity = clamp_unit(self.affinity + delta * 0.01);
    }

    pub fn axis(&self, axis: AffectAxis) -> f64 {
        match axis {
            AffectAxis::Happiness => self.happiness,
            AffectAxis::Sadness => self.sadness,
            AffectAxis::Curiosity => self.curiosity,
            AffectAxis::Affinity => self.affinity,
        }
    }

    /// Explicit per-axis override, clamped into range.
    pub fn set_axis(&mut self, axis: AffectAxis, value: f64) {
        let value = clamp_unit(value);
        match axis {
            AffectAxis::Happiness => self.happiness = value,
            AffectAxis::Sadness => self.sadness = value,
            AffectAxis::Curiosity => self.curiosity = value,
            AffectAxis::Affinity => self.affinity = value,
        }
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
