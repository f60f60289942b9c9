//! Training run orchestration for the `reinforce` binary.

use crate::cli::Cli;
use anyhow::{Context, Result};
use rl::cartpole::CartPoleConfig;
use rl::{evaluate, CartPole, TrainReport, Trainer, TrainerState};
use std::path::Path;

/// Trains on cart-pole as configured by `cli`, then writes the score history
/// and plays evaluation episodes when asked to.
///
/// Running out of episodes is reported through the returned
/// [`TrainReport`], not as an error.
///
/// # Errors
///
/// Returns configuration errors, any error that aborted training, and I/O
/// errors from writing the score file.
pub fn run(cli: &Cli) -> Result<TrainReport> {
    let config = cli.train_config()?;
    let env_config = CartPoleConfig {
        max_episode_steps: (cli.cart_pole_limit > 0).then_some(cli.cart_pole_limit),
        ..CartPoleConfig::default()
    };

    tracing::info!(
        "Training on cart-pole for up to {} episodes (seed {}, lr {}, gamma {})",
        config.num_episodes,
        config.seed,
        config.learning_rate,
        config.gamma
    );
    let env = CartPole::with_config(env_config.clone(), config.seed);
    let mut trainer = Trainer::new(env, config.clone())?;
    let report = trainer.train().context("training aborted")?;

    if let TrainerState::Solved { episode } = report.outcome {
        tracing::info!("Solved after {episode} episodes");
    } else {
        tracing::info!(
            "Stopped after {} episodes, average score {:.2}",
            report.episodes(),
            trainer.scores().rolling_mean()
        );
    }

    if let Some(path) = &cli.scores_out {
        write_scores(path, &report.scores)?;
        tracing::info!("Wrote {} scores to {}", report.scores.len(), path.display());
    }

    if cli.eval_episodes > 0 {
        let policy = trainer.into_policy();
        let eval_seed = config.seed.wrapping_add(1);
        let mut env = CartPole::with_config(env_config, eval_seed);
        let mut rng = fastrand::Rng::with_seed(eval_seed);
        let scores = evaluate(
            &policy,
            &mut env,
            cli.eval_episodes,
            config.max_steps_per_episode,
            &mut rng,
        )?;
        for (i, score) in scores.iter().enumerate() {
            tracing::info!("Evaluation episode {}: score {score}", i + 1);
        }
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        tracing::info!("Evaluation average over {} episodes: {mean:.2}", scores.len());
    }

    Ok(report)
}

/// Writes `scores` to `path` as a JSON array.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_scores(path: &Path, scores: &[f32]) -> Result<()> {
    let json = serde_json::to_string(scores)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
