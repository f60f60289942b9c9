use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("action {action} outside of 0..{count}")]
    InvalidAction { action: usize, count: usize },
    #[error("step called on a finished episode; reset first")]
    EpisodeOver,
}

/// Reinforcement learning environment with a discrete action set.
///
/// Modelled on the classic gym interface, this trait defines the core
/// interface an environment must provide. Each call to [`step`] advances the
/// simulation by one action and returns the new observation vector, a reward
/// signal, and whether the episode has terminated.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// Returns `(obs, reward, done)` where `obs` is the new observation vector,
    /// `reward` is the scalar reward, and `done` indicates episode termination.
    ///
    /// # Errors
    ///
    /// Environments reject actions outside `0..action_size()` and may refuse
    /// to step a terminated episode.
    fn step(&mut self, action: usize) -> Result<(Vec<f32>, f32, bool), EnvError>;

    /// Reset the environment to its starting state and return the initial
    /// observation vector.
    fn reset(&mut self) -> Vec<f32>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;
}
