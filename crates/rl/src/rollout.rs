use crate::env::Env;
use crate::error::RlError;
use crate::policy::Policy;
use ml::{Graph, Recorder, Tensor, TensorStore};

/// Parallel log-probabilities and rewards of one episode.
pub struct Trajectory {
    pub log_probs: Vec<Tensor>,
    pub rewards: Vec<f32>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Undiscounted reward sum, the episode's score.
    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }

    /// `-Σₜ log_probₜ · ret`: every step weighted by the same return.
    /// `None` for an empty trajectory.
    pub fn policy_loss(
        &self,
        ret: f32,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Option<Tensor> {
        let (first, rest) = self.log_probs.split_first()?;
        let sum = rest
            .iter()
            .fold(first.clone(), |acc, lp| acc.add(lp, recorder, tensors));
        Some(sum.mul_scalar(-ret, recorder, tensors))
    }
}

/// Runs `policy` on an already reset `env`, starting from `obs`, for at most
/// `max_steps` steps or until the environment reports termination.
///
/// # Errors
///
/// [`RlError::Config`] for a zero step budget, plus any policy or
/// environment error.
pub fn collect<E: Env + ?Sized>(
    env: &mut E,
    policy: &Policy,
    mut obs: Vec<f32>,
    max_steps: usize,
    rng: &mut fastrand::Rng,
    recorder: &mut impl Recorder,
    tensors: &mut TensorStore,
) -> Result<Trajectory, RlError> {
    if max_steps == 0 {
        return Err(RlError::Config("an episode needs at least one step".into()));
    }
    let mut trajectory = Trajectory {
        log_probs: Vec::new(),
        rewards: Vec::new(),
    };
    for _ in 0..max_steps {
        let (action, log_prob) = policy.act(&obs, rng, recorder, tensors)?;
        let (next_obs, reward, done) = env.step(action)?;
        trajectory.log_probs.push(log_prob);
        trajectory.rewards.push(reward);
        if done {
            break;
        }
        obs = next_obs;
    }
    Ok(trajectory)
}

/// Plays `episodes` sampled episodes without learning and returns each
/// episode's total reward.
///
/// # Errors
///
/// As for [`collect`].
pub fn evaluate<E: Env + ?Sized>(
    policy: &Policy,
    env: &mut E,
    episodes: usize,
    max_steps: usize,
    rng: &mut fastrand::Rng,
) -> Result<Vec<f32>, RlError> {
    let mut scores = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let obs = env.reset();
        let trajectory = collect(
            env,
            policy,
            obs,
            max_steps,
            rng,
            &mut Graph::new(),
            &mut TensorStore::new(),
        )?;
        scores.push(trajectory.total_reward());
    }
    Ok(scores)
}
