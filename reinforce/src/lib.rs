//! # reinforce
//!
//! Command-line front end for the REINFORCE trainer in the [`rl`] crate.
//!
//! ## Overview
//!
//! The binary trains a two-layer stochastic policy on the classic cart-pole
//! task with Monte-Carlo policy gradients. Each episode is played to the end,
//! the summed log-probabilities of the chosen actions are weighted by the
//! episode's discounted return, and Adam takes one step on the result.
//! Training stops once the average score of the last 100 episodes reaches
//! 195, or when the episode budget is spent.
//!
//! ## Crates
//!
//! -   **`reinforce`:** this crate. Parses the command line, merges it with an
//!     optional JSON configuration, installs the log subscriber and drives a
//!     training run.
//! -   **[`rl`]:** environment trait, cart-pole, categorical policy, trajectory
//!     collection, returns, score tracking and the trainer state machine.
//! -   **`ml`:** tensors, op recording and reverse-mode differentiation, dense
//!     layers and the Adam optimizer.
//!
//! ## Output
//!
//! Progress is logged as `Episode {n}\tAverage Score: {avg}` every
//! `--print-every` episodes. `--scores-out` writes every episode score as a
//! JSON array for plotting, and `--eval-episodes` plays the trained policy a
//! few more times without learning.

pub mod app;
pub mod cli;
