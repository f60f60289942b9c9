mod common;

use common::{FailingEnv, FixedEnv, KeepGoingEnv};
use ml::{Graph, Tape, TensorStore};
use rl::{collect, evaluate, Env, EnvError, Policy, RlError, Trajectory};

fn policy(obs_size: usize) -> Policy {
    Policy::new(obs_size, 8, 2, &mut fastrand::Rng::with_seed(1))
}

fn run(
    env: &mut impl Env,
    policy: &Policy,
    max_steps: usize,
    seed: u64,
) -> Result<Trajectory, RlError> {
    let obs = env.reset();
    collect(
        env,
        policy,
        obs,
        max_steps,
        &mut fastrand::Rng::with_seed(seed),
        &mut Graph::new(),
        &mut TensorStore::new(),
    )
}

#[test]
fn stops_at_the_step_budget() {
    let policy = policy(4);
    let mut env = FixedEnv::new(1.0, None);
    let trajectory = run(&mut env, &policy, 25, 0).unwrap();
    assert_eq!(trajectory.len(), 25);
    assert_eq!(trajectory.log_probs.len(), trajectory.rewards.len());
    assert!((trajectory.total_reward() - 25.0).abs() < 1e-6);
}

#[test]
fn stops_when_the_episode_terminates() {
    let policy = policy(4);
    let mut env = FixedEnv::new(0.5, Some(7));
    let trajectory = run(&mut env, &policy, 100, 0).unwrap();
    assert_eq!(trajectory.len(), 7);
    assert!((trajectory.total_reward() - 3.5).abs() < 1e-6);
}

#[test]
fn length_stays_within_bounds() {
    let policy = policy(2);
    let mut env = KeepGoingEnv::new(1_000);
    for seed in 0..200 {
        for max_steps in [1, 3, 12] {
            let len = run(&mut env, &policy, max_steps, seed).unwrap().len();
            assert!((1..=max_steps).contains(&len), "len {len} for budget {max_steps}");
        }
    }
}

#[test]
fn zero_budget_is_a_configuration_error() {
    let policy = policy(4);
    let mut env = FixedEnv::new(1.0, None);
    assert!(matches!(run(&mut env, &policy, 0, 0), Err(RlError::Config(_))));
}

#[test]
fn environment_errors_surface() {
    let policy = policy(4);
    let mut env = FailingEnv::new(3);
    assert!(matches!(
        run(&mut env, &policy, 10, 0),
        Err(RlError::Env(EnvError::EpisodeOver))
    ));
}

#[test]
fn log_probs_carry_gradients_back_to_the_policy() {
    let mut policy = policy(4);
    let mut env = FixedEnv::new(1.0, Some(5));
    let mut tape = Tape::new();
    let mut tensors = TensorStore::new();
    let obs = env.reset();
    let trajectory = collect(
        &mut env,
        &policy,
        obs,
        10,
        &mut fastrand::Rng::with_seed(3),
        &mut tape,
        &mut tensors,
    )
    .unwrap();

    let loss = trajectory
        .policy_loss(5.0, &mut tape, &mut tensors)
        .unwrap();
    let expected: f32 = -5.0 * trajectory.log_probs.iter().map(|lp| lp.item()).sum::<f32>();
    assert!((loss.item() - expected).abs() < 1e-4);

    tape.backward(&loss, &mut tensors).unwrap();
    assert!(policy.load_grads(&tensors).unwrap());
    let moved = policy
        .params()
        .iter()
        .any(|p| p.grad.as_ref().unwrap().iter().any(|g| *g != 0.0));
    assert!(moved);
}

#[test]
fn evaluation_reports_one_score_per_episode() {
    let policy = policy(4);
    let mut env = FixedEnv::new(2.0, Some(4));
    let scores = evaluate(&policy, &mut env, 6, 100, &mut fastrand::Rng::with_seed(0)).unwrap();
    assert_eq!(scores, vec![8.0; 6]);
    assert_eq!(env.resets, 6);
}
