use crate::error::RlError;

const SUM_TOLERANCE: f32 = 1e-4;

/// Categorical distribution over `0..len()`.
///
/// An immutable value: probabilities go in, a sampled index and its
/// log-probability come out.
#[derive(Clone, Debug, PartialEq)]
pub struct Categorical {
    probs: Vec<f32>,
}

impl Categorical {
    /// # Errors
    ///
    /// [`RlError::InvalidDistribution`] when `probs` is empty, holds a
    /// negative or non-finite entry, or does not sum to one.
    pub fn new(probs: Vec<f32>) -> Result<Self, RlError> {
        if probs.is_empty() {
            return Err(RlError::InvalidDistribution("no outcomes".into()));
        }
        if let Some(p) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
            return Err(RlError::InvalidDistribution(format!(
                "probability {p} is not a finite non-negative number"
            )));
        }
        let total: f32 = probs.iter().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(RlError::InvalidDistribution(format!(
                "probabilities sum to {total}"
            )));
        }
        Ok(Self { probs })
    }

    /// Builds the distribution from normalised log-probabilities, e.g. the
    /// output of a log-softmax.
    ///
    /// # Errors
    ///
    /// See [`Categorical::new`].
    pub fn from_log_probs(log_probs: &[f32]) -> Result<Self, RlError> {
        Self::new(log_probs.iter().map(|lp| lp.exp()).collect())
    }

    pub fn probs(&self) -> &[f32] {
        &self.probs
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Log-probability of `action`; negative infinity for an action outside
    /// the distribution.
    pub fn log_prob(&self, action: usize) -> f32 {
        self.probs.get(action).map_or(f32::NEG_INFINITY, |p| p.ln())
    }

    /// Inverse-CDF draw. Never returns an outcome of probability zero.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> usize {
        let u = rng.f32();
        let mut cumulative = 0.0;
        for (i, p) in self.probs.iter().enumerate() {
            cumulative += p;
            if *p > 0.0 && u < cumulative {
                return i;
            }
        }
        // rounding left u above the last partial sum
        self.probs.iter().rposition(|p| *p > 0.0).unwrap_or(0)
    }

    /// Index of the most likely outcome.
    pub fn mode(&self) -> usize {
        self.probs
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, p)| {
                if *p > best.1 {
                    (i, *p)
                } else {
                    best
                }
            })
            .0
    }
}
