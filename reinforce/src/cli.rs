use anyhow::{Context, Result};
use clap::Parser;
use rl::TrainConfig;
use std::path::PathBuf;
use tracing::Level;

/// Train a REINFORCE policy on cart-pole.
#[derive(Parser, Debug, Clone)]
#[command(name = "reinforce", version, about)]
pub struct Cli {
    /// JSON file with training parameters; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Episode budget
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Step budget per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Discount factor in [0, 1]
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Adam learning rate
    #[arg(long)]
    pub lr: Option<f32>,

    /// Width of the hidden layer
    #[arg(long)]
    pub hidden: Option<usize>,

    /// Rolling average that counts as solved
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Number of episodes in the rolling average
    #[arg(long)]
    pub window: Option<usize>,

    /// Episodes between progress lines, 0 for none
    #[arg(long)]
    pub print_every: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Cart-pole time limit in steps, 0 for none
    #[arg(long, default_value_t = 200)]
    pub cart_pole_limit: usize,

    /// Write the score of every episode to this file as a JSON array
    #[arg(long)]
    pub scores_out: Option<PathBuf>,

    /// Episodes to play with the trained policy after training
    #[arg(long, default_value_t = 0)]
    pub eval_episodes: usize,

    /// Log every episode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Configuration file (or defaults) with the command-line overrides
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the merged
    /// configuration is invalid.
    pub fn train_config(&self) -> Result<TrainConfig> {
        let mut config = match &self.config {
            Some(path) => TrainConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TrainConfig::default(),
        };

        if let Some(v) = self.episodes {
            config.num_episodes = v;
        }
        if let Some(v) = self.max_steps {
            config.max_steps_per_episode = v;
        }
        if let Some(v) = self.gamma {
            config.gamma = v;
        }
        if let Some(v) = self.lr {
            config.learning_rate = v;
        }
        if let Some(v) = self.hidden {
            config.hidden_size = v;
        }
        if let Some(v) = self.threshold {
            config.solved_threshold = v;
        }
        if let Some(v) = self.window {
            config.score_window_size = v;
        }
        if let Some(v) = self.print_every {
            config.progress_report_interval = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }

        config.validate().context("invalid training configuration")?;
        Ok(config)
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}
