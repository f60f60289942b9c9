use crate::error::RlError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of a REINFORCE training run. Missing JSON fields take their
/// defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    /// Episode budget
    pub num_episodes: usize,
    pub max_steps_per_episode: usize,
    /// Discount factor in `[0, 1]`
    pub gamma: f32,
    /// Episodes between progress lines; 0 disables them
    pub progress_report_interval: usize,
    pub learning_rate: f32,
    pub hidden_size: usize,
    /// Rolling average at which the task counts as solved
    pub solved_threshold: f32,
    pub score_window_size: usize,
    /// Seed for parameter initialisation and action sampling
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            max_steps_per_episode: 1000,
            gamma: 1.0,
            progress_report_interval: 100,
            learning_rate: 1e-2,
            hidden_size: 16,
            solved_threshold: 195.0,
            score_window_size: 100,
            seed: 0,
        }
    }
}

impl TrainConfig {
    /// # Errors
    ///
    /// [`RlError::ConfigParse`] on malformed JSON or unknown fields, and
    /// [`RlError::Config`] when the values fail [`TrainConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, RlError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// As for [`TrainConfig::from_json`], plus [`RlError::Config`] when the
    /// file cannot be read.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RlError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RlError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// # Errors
    ///
    /// [`RlError::Config`] naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), RlError> {
        let fail = |msg: String| Err(RlError::Config(msg));
        if self.num_episodes == 0 {
            return fail("num_episodes must be at least 1".into());
        }
        if self.max_steps_per_episode == 0 {
            return fail("max_steps_per_episode must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return fail(format!("gamma {} outside [0, 1]", self.gamma));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return fail(format!("learning_rate {} must be positive", self.learning_rate));
        }
        if self.hidden_size == 0 {
            return fail("hidden_size must be at least 1".into());
        }
        if !self.solved_threshold.is_finite() {
            return fail("solved_threshold must be finite".into());
        }
        if self.score_window_size == 0 {
            return fail("score_window_size must be at least 1".into());
        }
        Ok(())
    }
}
