use crate::{MlError, Tensor};

pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
    t: u32,
    m: Vec<Vec<f32>>,
    v: Vec<Vec<f32>>,
}

impl Adam {
    pub fn new(params: &[&Tensor], lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
            t: 0,
            m: params.iter().map(|p| vec![0.0; p.data.len()]).collect(),
            v: params.iter().map(|p| vec![0.0; p.data.len()]).collect(),
        }
    }

    pub fn lr(&self) -> f32 {
        self.lr
    }

    /// Applies one bias-corrected Adam update from each parameter's `grad`,
    /// then clears the gradients.
    ///
    /// # Errors
    ///
    /// Fails without touching any parameter when the parameter count differs
    /// from construction or a parameter carries no gradient.
    pub fn step(&mut self, params: &mut [&mut Tensor]) -> Result<(), MlError> {
        if params.len() != self.m.len() {
            return Err(MlError::ParamCount {
                expected: self.m.len(),
                actual: params.len(),
            });
        }
        if let Some(p) = params.iter().find(|p| p.grad.is_none()) {
            return Err(MlError::MissingGrad(p.id));
        }

        self.t += 1;
        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        for (i, p) in params.iter_mut().enumerate() {
            let Some(grad) = p.grad.take() else { continue };
            for j in 0..p.data.len() {
                self.m[i][j] = self.beta1 * self.m[i][j] + (1.0 - self.beta1) * grad[j];
                self.v[i][j] = self.beta2 * self.v[i][j] + (1.0 - self.beta2) * grad[j].powi(2);
                let m_hat = self.m[i][j] / bias1;
                let v_hat = self.v[i][j] / bias2;
                p.data[j] -= self.lr * m_hat / (v_hat.sqrt() + self.eps);
            }
        }
        Ok(())
    }
}
