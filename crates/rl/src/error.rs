use crate::env::EnvError;
use ml::MlError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RlError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("observation has {actual} values, policy expects {expected}")]
    ObservationSize { expected: usize, actual: usize },
    #[error("policy produces {policy} actions, environment accepts {env}")]
    ActionCount { policy: usize, env: usize },
    #[error("invalid action distribution: {0}")]
    InvalidDistribution(String),
    #[error("non-finite {what} in episode {episode}")]
    NonFinite { what: &'static str, episode: usize },
    #[error("training already finished")]
    Finished,
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error(transparent)]
    Ml(#[from] MlError),
}
