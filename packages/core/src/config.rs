use serde::{Deserialize, Serialize};

use crate::coaching::SpeechConfig;
use crate::error::CoreError;
use crate::types::DEFAULT_MIN_VISIBILITY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Landmarks reporting a lower visibility are treated as absent
    pub min_visibility: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
        }
    }
}

/// Energy rewards per accepted rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub correct_form_base: f64,
    pub consistency_bonus: f64,
    pub consistency_window_ms: i64,
    pub major_milestone_every: u32,
    pub major_milestone_bonus: f64,
    pub minor_milestone_every: u32,
    pub minor_milestone_bonus: f64,
    pub incorrect_form_reward: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            correct_form_base: 5.0,
            consistency_bonus: 2.0,
            consistency_window_ms: 5_000,
            major_milestone_every: 10,
            major_milestone_bonus: 10.0,
            minor_milestone_every: 5,
            minor_milestone_bonus: 5.0,
            incorrect_form_reward: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GooseConfig {
    /// Energy granted on workout start (set, not added)
    pub start_energy: f64,
    pub decay_amount: f64,
    pub decay_interval_ms: i64,
    pub celebrating_threshold: f64,
    pub excited_threshold: f64,
}

impl Default for GooseConfig {
    fn default() -> Self {
        Self {
            start_energy: 10.0,
            decay_amount: 1.0,
            decay_interval_ms: 10_000,
            celebrating_threshold: 90.0,
            excited_threshold: 70.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub classifier: ClassifierConfig,
    pub scoring: ScoringConfig,
    pub goose: GooseConfig,
    pub speech: SpeechConfig,
}

impl CoreConfig {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let config: CoreConfig =
            serde_json::from_str(raw).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.classifier.min_visibility) {
            return Err(CoreError::Config(format!(
                "min_visibility must be within [0, 1], got {}",
                self.classifier.min_visibility
            )));
        }
        if self.goose.decay_interval_ms <= 0 {
            return Err(CoreError::Config(
                "decay_interval_ms must be positive".to_string(),
            ));
        }
        if self.scoring.major_milestone_every == 0 || self.scoring.minor_milestone_every == 0 {
            return Err(CoreError::Config(
                "milestone intervals must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
