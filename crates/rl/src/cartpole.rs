//! Classic cart-pole balancing task.
//!
//! A pole is hinged on a cart moving along a frictionless track. Each step
//! pushes the cart left (action 0) or right (action 1) with a fixed force and
//! pays a reward of 1. The episode terminates once the pole leans past
//! `failure_angle` or the cart leaves `±position_limit`, and is truncated
//! after `max_episode_steps` when a limit is set.

use crate::env::{Env, EnvError};

/// Configuration for the cart-pole dynamics.
#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleConfig {
    /// Gravitational acceleration in m/s²
    pub gravity: f32,
    /// Cart mass in kg
    pub cart_mass: f32,
    /// Pole mass in kg
    pub pole_mass: f32,
    /// Half the pole length in meters
    pub half_pole_length: f32,
    /// Force magnitude applied to the cart
    pub force_magnitude: f32,
    /// Integration step in seconds
    pub tau: f32,
    /// Angle threshold for failure detection (radians)
    pub failure_angle: f32,
    /// Position threshold for failure detection (meters)
    pub position_limit: f32,
    /// Time limit; `None` lets an episode run until the pole falls
    pub max_episode_steps: Option<usize>,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            cart_mass: 1.0,
            pole_mass: 0.1,
            half_pole_length: 0.5,
            force_magnitude: 10.0,
            tau: 0.02,
            failure_angle: 12.0_f32.to_radians(),
            position_limit: 2.4,
            max_episode_steps: Some(200),
        }
    }
}

/// Cart-pole environment. Observations are
/// `[position, velocity, angle, angular velocity]`.
pub struct CartPole {
    config: CartPoleConfig,
    state: [f32; 4],
    steps: usize,
    done: bool,
    rng: fastrand::Rng,
}

impl CartPole {
    /// Default dynamics with reset noise drawn from a generator seeded with
    /// `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_config(CartPoleConfig::default(), seed)
    }

    pub fn with_config(config: CartPoleConfig, seed: u64) -> Self {
        Self {
            config,
            state: [0.0; 4],
            steps: 0,
            done: true,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &CartPoleConfig {
        &self.config
    }

    pub fn state(&self) -> [f32; 4] {
        self.state
    }

    /// Places the system in `state` and starts a new episode from it.
    pub fn reset_to(&mut self, state: [f32; 4]) -> Vec<f32> {
        self.state = state;
        self.steps = 0;
        self.done = false;
        self.state.to_vec()
    }
}

impl Env for CartPole {
    fn step(&mut self, action: usize) -> Result<(Vec<f32>, f32, bool), EnvError> {
        if action >= 2 {
            return Err(EnvError::InvalidAction { action, count: 2 });
        }
        if self.done {
            return Err(EnvError::EpisodeOver);
        }

        let c = &self.config;
        let [x, x_dot, theta, theta_dot] = self.state;
        let force = if action == 1 {
            c.force_magnitude
        } else {
            -c.force_magnitude
        };
        let (sin_theta, cos_theta) = theta.sin_cos();

        let total_mass = c.cart_mass + c.pole_mass;
        let pole_mass_length = c.pole_mass * c.half_pole_length;
        let temp = (force + pole_mass_length * theta_dot * theta_dot * sin_theta) / total_mass;
        let theta_acc = (c.gravity * sin_theta - cos_theta * temp)
            / (c.half_pole_length
                * (4.0 / 3.0 - c.pole_mass * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        // explicit Euler
        self.state = [
            x + c.tau * x_dot,
            x_dot + c.tau * x_acc,
            theta + c.tau * theta_dot,
            theta_dot + c.tau * theta_acc,
        ];
        self.steps += 1;

        let terminated =
            self.state[0].abs() > c.position_limit || self.state[2].abs() > c.failure_angle;
        let truncated = c.max_episode_steps.is_some_and(|limit| self.steps >= limit);
        self.done = terminated || truncated;

        Ok((self.state.to_vec(), 1.0, self.done))
    }

    fn reset(&mut self) -> Vec<f32> {
        let state = std::array::from_fn(|_| self.rng.f32() * 0.1 - 0.05);
        self.reset_to(state)
    }

    fn obs_size(&self) -> usize {
        4
    }

    fn action_size(&self) -> usize {
        2
    }
}
