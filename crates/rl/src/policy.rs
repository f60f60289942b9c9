use crate::distribution::Categorical;
use crate::error::RlError;
use ml::{Dense, Graph, MlError, Recorder, Tensor, TensorStore};

/// Stochastic two-layer policy: `softmax(W2 · relu(W1 · obs + b1) + b2)`.
#[derive(Debug)]
pub struct Policy {
    hidden: Dense,
    output: Dense,
}

fn fresh_layer(layer: &Dense) -> Dense {
    Dense::new(
        layer.w.data().to_vec(),
        layer.b.data().to_vec(),
        layer.in_dim,
        layer.out_dim,
    )
}

/// Copies carry the same weights under new tensor ids and without
/// gradients, so a copy never shares gradient slots with its source.
impl Clone for Policy {
    fn clone(&self) -> Self {
        Self {
            hidden: fresh_layer(&self.hidden),
            output: fresh_layer(&self.output),
        }
    }
}

impl Policy {
    /// Glorot-initialised policy with parameters drawn from `rng`.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is zero.
    pub fn new(obs_size: usize, hidden_size: usize, action_size: usize, rng: &mut fastrand::Rng) -> Self {
        assert!(
            obs_size > 0 && hidden_size > 0 && action_size > 0,
            "policy dimensions must be non-zero"
        );
        Self {
            hidden: Dense::random(obs_size, hidden_size, rng),
            output: Dense::random(hidden_size, action_size, rng),
        }
    }

    /// Builds a policy from explicit layers.
    ///
    /// # Errors
    ///
    /// [`RlError::Config`] when the layers do not chain.
    pub fn from_layers(hidden: Dense, output: Dense) -> Result<Self, RlError> {
        if hidden.out_dim != output.in_dim {
            return Err(RlError::Config(format!(
                "hidden layer emits {} values, output layer expects {}",
                hidden.out_dim, output.in_dim
            )));
        }
        Ok(Self { hidden, output })
    }

    pub fn obs_size(&self) -> usize {
        self.hidden.in_dim
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden.out_dim
    }

    pub fn action_size(&self) -> usize {
        self.output.out_dim
    }

    /// Log-probabilities of every action, recorded on `recorder`.
    fn log_probs(
        &self,
        obs: &[f32],
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Result<Tensor, RlError> {
        if obs.len() != self.obs_size() {
            return Err(RlError::ObservationSize {
                expected: self.obs_size(),
                actual: obs.len(),
            });
        }
        let x = Tensor::from_vec(vec![1, obs.len()], obs.to_vec());
        let h = self.hidden.forward(&x, recorder, tensors).relu(recorder, tensors);
        let logits = self.output.forward(&h, recorder, tensors);
        Ok(logits.log_softmax(recorder, tensors))
    }

    /// Samples an action for `obs` and returns it with its log-probability.
    ///
    /// The log-probability is a scalar tensor recorded on `recorder`, so a
    /// [`ml::Tape`] can later carry gradients from it back to the parameters.
    ///
    /// # Errors
    ///
    /// [`RlError::ObservationSize`] when `obs` has the wrong length and
    /// [`RlError::InvalidDistribution`] if the network output is not finite.
    pub fn act(
        &self,
        obs: &[f32],
        rng: &mut fastrand::Rng,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Result<(usize, Tensor), RlError> {
        let log_probs = self.log_probs(obs, recorder, tensors)?;
        let action = Categorical::from_log_probs(log_probs.data())?.sample(rng);
        let log_prob = log_probs.select(action, recorder, tensors);
        Ok((action, log_prob))
    }

    /// Action distribution for `obs`, evaluated without recording gradients.
    ///
    /// # Errors
    ///
    /// As for [`Policy::act`].
    pub fn distribution(&self, obs: &[f32]) -> Result<Categorical, RlError> {
        let log_probs = self.log_probs(obs, &mut Graph::new(), &mut TensorStore::new())?;
        Categorical::from_log_probs(log_probs.data())
    }

    /// # Errors
    ///
    /// As for [`Policy::act`].
    pub fn probabilities(&self, obs: &[f32]) -> Result<Vec<f32>, RlError> {
        Ok(self.distribution(obs)?.probs().to_vec())
    }

    pub fn params(&self) -> Vec<&Tensor> {
        let mut out = Vec::with_capacity(4);
        out.extend(self.hidden.params());
        out.extend(self.output.params());
        out
    }

    pub fn params_mut(&mut self) -> Vec<&mut Tensor> {
        let mut out = Vec::with_capacity(4);
        out.extend(self.hidden.params_mut());
        out.extend(self.output.params_mut());
        out
    }

    /// Copies the gradients a [`ml::Tape`] left in `tensors` onto the
    /// parameters. Returns `false`, leaving gradients unset, if any of them is
    /// not finite.
    ///
    /// # Errors
    ///
    /// [`MlError::MissingGrad`] when a parameter took no part in the pass.
    pub fn load_grads(&mut self, tensors: &TensorStore) -> Result<bool, RlError> {
        let mut grads = Vec::with_capacity(4);
        for p in self.params() {
            let grad = tensors
                .get(&p.id)
                .and_then(|t| t.grad.clone())
                .ok_or(MlError::MissingGrad(p.id))?;
            if grad.iter().any(|g| !g.is_finite()) {
                return Ok(false);
            }
            grads.push(grad);
        }
        for (p, grad) in self.params_mut().into_iter().zip(grads) {
            p.grad = Some(grad);
        }
        Ok(true)
    }
}
