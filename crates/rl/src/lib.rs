#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_precision_loss,
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

//! REINFORCE (Monte-Carlo policy gradient) for small discrete-action tasks.
//!
//! A [`Trainer`] owns one [`Env`] and one [`Policy`]. Each episode it
//! collects a trajectory, weights the summed action log-probabilities by the
//! episode's discounted return and takes one Adam step. Training stops once
//! the rolling score average reaches the solved threshold or the episode
//! budget runs out.

pub mod cartpole;
pub mod config;
pub mod distribution;
pub mod env;
pub mod error;
pub mod policy;
pub mod returns;
pub mod rollout;
pub mod scores;
pub mod trainer;

pub use cartpole::CartPole;
pub use config::TrainConfig;
pub use distribution::Categorical;
pub use env::{Env, EnvError};
pub use error::RlError;
pub use policy::Policy;
pub use returns::discounted_return;
pub use rollout::{collect, evaluate, Trajectory};
pub use scores::{ScoreHistory, ScoreWindow};
pub use trainer::{EpisodeStats, TrainReport, Trainer, TrainerState};
