#![allow(dead_code)]

use rl::{Env, EnvError};

/// Pays `reward` every step and terminates after `episode_len` steps, or
/// never when `episode_len` is `None`.
pub struct FixedEnv {
    pub obs_size: usize,
    pub reward: f32,
    pub episode_len: Option<usize>,
    pub steps: usize,
    pub resets: usize,
}

impl FixedEnv {
    pub fn new(reward: f32, episode_len: Option<usize>) -> Self {
        Self {
            obs_size: 4,
            reward,
            episode_len,
            steps: 0,
            resets: 0,
        }
    }

    fn obs(&self) -> Vec<f32> {
        let t = self.steps as f32 * 0.1;
        (0..self.obs_size).map(|i| t - i as f32 * 0.05).collect()
    }
}

impl Env for FixedEnv {
    fn step(&mut self, action: usize) -> Result<(Vec<f32>, f32, bool), EnvError> {
        if action >= 2 {
            return Err(EnvError::InvalidAction { action, count: 2 });
        }
        self.steps += 1;
        let done = self.episode_len.is_some_and(|len| self.steps >= len);
        Ok((self.obs(), self.reward, done))
    }

    fn reset(&mut self) -> Vec<f32> {
        self.steps = 0;
        self.resets += 1;
        self.obs()
    }

    fn obs_size(&self) -> usize {
        self.obs_size
    }

    fn action_size(&self) -> usize {
        2
    }
}

/// Action 1 keeps the episode going, action 0 ends it. Every step pays 1,
/// episodes last at most `limit` steps.
pub struct KeepGoingEnv {
    pub limit: usize,
    steps: usize,
}

impl KeepGoingEnv {
    pub fn new(limit: usize) -> Self {
        Self { limit, steps: 0 }
    }
}

impl Env for KeepGoingEnv {
    fn step(&mut self, action: usize) -> Result<(Vec<f32>, f32, bool), EnvError> {
        self.steps += 1;
        let done = action == 0 || self.steps >= self.limit;
        Ok((vec![1.0, self.steps as f32 / self.limit as f32], 1.0, done))
    }

    fn reset(&mut self) -> Vec<f32> {
        self.steps = 0;
        vec![1.0, 0.0]
    }

    fn obs_size(&self) -> usize {
        2
    }

    fn action_size(&self) -> usize {
        2
    }
}

/// Fails on the `fail_at`-th step of an episode.
pub struct FailingEnv {
    pub fail_at: usize,
    steps: usize,
}

impl FailingEnv {
    pub fn new(fail_at: usize) -> Self {
        Self { fail_at, steps: 0 }
    }
}

impl Env for FailingEnv {
    fn step(&mut self, _action: usize) -> Result<(Vec<f32>, f32, bool), EnvError> {
        self.steps += 1;
        if self.steps >= self.fail_at {
            return Err(EnvError::EpisodeOver);
        }
        Ok((vec![0.0; 4], 1.0, false))
    }

    fn reset(&mut self) -> Vec<f32> {
        self.steps = 0;
        vec![0.0; 4]
    }

    fn obs_size(&self) -> usize {
        4
    }

    fn action_size(&self) -> usize {
        2
    }
}

/// Every episode is a single step that returns `obs` and pays `reward`.
pub struct OneStepEnv {
    pub obs: Vec<f32>,
    pub reward: f32,
}

impl OneStepEnv {
    pub fn new(obs: Vec<f32>, reward: f32) -> Self {
        Self { obs, reward }
    }
}

impl Env for OneStepEnv {
    fn step(&mut self, _action: usize) -> Result<(Vec<f32>, f32, bool), EnvError> {
        Ok((self.obs.clone(), self.reward, true))
    }

    fn reset(&mut self) -> Vec<f32> {
        self.obs.clone()
    }

    fn obs_size(&self) -> usize {
        self.obs.len()
    }

    fn action_size(&self) -> usize {
        2
    }
}

/// Fails on the first step it is ever asked for, then pays 1 per step in
/// one-step episodes.
pub struct FlakyEnv {
    failed: bool,
}

impl FlakyEnv {
    pub fn new() -> Self {
        Self { failed: false }
    }
}

impl Env for FlakyEnv {
    fn step(&mut self, _action: usize) -> Result<(Vec<f32>, f32, bool), EnvError> {
        if !self.failed {
            self.failed = true;
            return Err(EnvError::EpisodeOver);
        }
        Ok((vec![0.0; 4], 1.0, true))
    }

    fn reset(&mut self) -> Vec<f32> {
        vec![0.0; 4]
    }

    fn obs_size(&self) -> usize {
        4
    }

    fn action_size(&self) -> usize {
        2
    }
}
