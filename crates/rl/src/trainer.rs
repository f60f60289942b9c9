//! REINFORCE training loop.
//!
//! Each call to [`Trainer::run_episode`] is one transition of a small state
//! machine: the trainer stays [`TrainerState::Running`] until the rolling score
//! average over a full window reaches the solved threshold
//! ([`TrainerState::Solved`]) or the episode budget is spent
//! ([`TrainerState::Exhausted`]). An episode that fails moves it to
//! [`TrainerState::Aborted`]. All three are terminal.

use crate::config::TrainConfig;
use crate::env::Env;
use crate::error::RlError;
use crate::policy::Policy;
use crate::returns::discounted_return;
use crate::rollout::collect;
use crate::scores::ScoreHistory;
use ml::{Adam, Tape, TensorStore};
use tracing::{debug, error, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrainerState {
    Running,
    /// The rolling average reached the threshold at `episode` (1-based).
    Solved { episode: usize },
    Exhausted,
    /// `episode` failed with an error and was not recorded.
    Aborted { episode: usize },
}

impl TrainerState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TrainerState::Running)
    }
}

/// What one training episode produced.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeStats {
    pub episode: usize,
    pub steps: usize,
    /// Undiscounted reward sum
    pub score: f32,
    pub discounted_return: f32,
    pub loss: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainReport {
    pub outcome: TrainerState,
    /// Score of every episode played, in order
    pub scores: Vec<f32>,
}

impl TrainReport {
    pub fn solved(&self) -> bool {
        matches!(self.outcome, TrainerState::Solved { .. })
    }

    pub fn episodes(&self) -> usize {
        self.scores.len()
    }
}

/// Owns the environment, the policy and its optimizer for one training run.
pub struct Trainer<E: Env> {
    env: E,
    policy: Policy,
    optimizer: Adam,
    config: TrainConfig,
    rng: fastrand::Rng,
    scores: ScoreHistory,
    episode: usize,
    state: TrainerState,
}

impl<E: Env> Trainer<E> {
    /// Trainer with a fresh policy sized from `env` and `config.hidden_size`.
    ///
    /// # Errors
    ///
    /// [`RlError::Config`] for an invalid `config` or an environment without
    /// observations or actions.
    pub fn new(env: E, config: TrainConfig) -> Result<Self, RlError> {
        config.validate()?;
        if env.obs_size() == 0 || env.action_size() == 0 {
            return Err(RlError::Config(
                "environment must expose observations and actions".into(),
            ));
        }
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let policy = Policy::new(
            env.obs_size(),
            config.hidden_size,
            env.action_size(),
            &mut rng,
        );
        Self::assemble(env, policy, config, rng)
    }

    /// Trainer around an existing policy. `config.hidden_size` is ignored.
    ///
    /// # Errors
    ///
    /// [`RlError::Config`] for an invalid `config`, and
    /// [`RlError::ObservationSize`] or [`RlError::ActionCount`] when the policy
    /// does not fit the environment.
    pub fn with_policy(env: E, policy: Policy, config: TrainConfig) -> Result<Self, RlError> {
        config.validate()?;
        let rng = fastrand::Rng::with_seed(config.seed);
        Self::assemble(env, policy, config, rng)
    }

    fn assemble(
        env: E,
        policy: Policy,
        config: TrainConfig,
        rng: fastrand::Rng,
    ) -> Result<Self, RlError> {
        if env.obs_size() != policy.obs_size() {
            return Err(RlError::ObservationSize {
                expected: policy.obs_size(),
                actual: env.obs_size(),
            });
        }
        if env.action_size() != policy.action_size() {
            return Err(RlError::ActionCount {
                policy: policy.action_size(),
                env: env.action_size(),
            });
        }
        let optimizer = Adam::new(&policy.params(), config.learning_rate);
        let scores = ScoreHistory::new(config.score_window_size);
        Ok(Self {
            env,
            policy,
            optimizer,
            config,
            rng,
            scores,
            episode: 0,
            state: TrainerState::Running,
        })
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    /// Episodes completed so far.
    pub fn episode(&self) -> usize {
        self.episode
    }

    pub fn scores(&self) -> &ScoreHistory {
        &self.scores
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_policy(self) -> Policy {
        self.policy
    }

    /// Plays one episode, takes one gradient step and advances the state.
    ///
    /// Parameters are only updated once the loss and every gradient are
    /// finite.
    ///
    /// # Errors
    ///
    /// [`RlError::Finished`] on a terminal trainer, [`RlError::NonFinite`]
    /// when the loss or a gradient diverges, and any environment or policy
    /// error. Every error is fatal to the run: the trainer moves to
    /// [`TrainerState::Aborted`] and refuses further episodes.
    pub fn run_episode(&mut self) -> Result<EpisodeStats, RlError> {
        if self.state.is_terminal() {
            return Err(RlError::Finished);
        }
        let episode = self.episode + 1;
        match self.play_episode(episode) {
            Ok(stats) => {
                self.scores.push(stats.score);
                self.episode = episode;
                self.advance();
                Ok(stats)
            }
            Err(err) => {
                error!(episode, "training aborted: {err}");
                self.state = TrainerState::Aborted { episode };
                Err(err)
            }
        }
    }

    fn play_episode(&mut self, episode: usize) -> Result<EpisodeStats, RlError> {
        let mut tape = Tape::new();
        let mut tensors = TensorStore::new();
        let obs = self.env.reset();
        let trajectory = collect(
            &mut self.env,
            &self.policy,
            obs,
            self.config.max_steps_per_episode,
            &mut self.rng,
            &mut tape,
            &mut tensors,
        )?;

        let ret = discounted_return(&trajectory.rewards, self.config.gamma);
        let loss = trajectory
            .policy_loss(ret, &mut tape, &mut tensors)
            .ok_or_else(|| RlError::Config("episode ended without a step".into()))?;
        if !loss.item().is_finite() {
            return Err(RlError::NonFinite {
                what: "loss",
                episode,
            });
        }

        tape.backward(&loss, &mut tensors)?;
        if !self.policy.load_grads(&tensors)? {
            return Err(RlError::NonFinite {
                what: "gradient",
                episode,
            });
        }
        self.optimizer.step(&mut self.policy.params_mut())?;

        let stats = EpisodeStats {
            episode,
            steps: trajectory.len(),
            score: trajectory.total_reward(),
            discounted_return: ret,
            loss: loss.item(),
        };
        debug!(
            episode,
            steps = stats.steps,
            score = stats.score,
            loss = stats.loss,
            "episode finished"
        );
        Ok(stats)
    }

    fn advance(&mut self) {
        let episode = self.episode;
        let average = self.scores.rolling_mean();
        let interval = self.config.progress_report_interval;
        if interval > 0 && episode % interval == 0 {
            info!("Episode {episode}\tAverage Score: {average:.2}");
        }

        if self.scores.window().is_full() && average >= self.config.solved_threshold {
            info!("Environment solved in {episode} episodes!\tAverage Score: {average:.2}");
            self.state = TrainerState::Solved { episode };
        } else if episode >= self.config.num_episodes {
            warn!(
                "Episode budget of {} spent without reaching {:.2} (last average {average:.2})",
                self.config.num_episodes, self.config.solved_threshold
            );
            self.state = TrainerState::Exhausted;
        }
    }

    /// Runs episodes until the trainer reaches a terminal state.
    ///
    /// # Errors
    ///
    /// The first error of [`Trainer::run_episode`]; training stops there.
    /// [`RlError::Finished`] when called again on an aborted trainer.
    pub fn train(&mut self) -> Result<TrainReport, RlError> {
        if let TrainerState::Aborted { .. } = self.state {
            return Err(RlError::Finished);
        }
        while !self.state.is_terminal() {
            self.run_episode()?;
        }
        Ok(self.report())
    }

    pub fn report(&self) -> TrainReport {
        TrainReport {
            outcome: self.state,
            scores: self.scores.all().to_vec(),
        }
    }
}
