use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use crate::tensor::{Tensor, TensorStore};
use crate::MlError;
use std::collections::HashMap;

/// A tape that records operations for automatic differentiation.
#[derive(Default)]
pub struct Tape {
    nodes: Vec<Node>,
}

impl Recorder for Tape {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

fn lookup(tensors: &TensorStore, id: usize) -> Result<&Tensor, MlError> {
    tensors.get(&id).ok_or(MlError::MissingTensor(id))
}

fn slot(grads: &mut HashMap<usize, Vec<f32>>, id: usize, len: usize) -> &mut Vec<f32> {
    grads.entry(id).or_insert_with(|| vec![0.0; len])
}

impl Tape {
    /// Creates a new, empty tape.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Computes the gradients of `loss` with respect to every recorded tensor.
    ///
    /// Nodes are walked in reverse order. Gradients are written back to the
    /// store only for tensors flagged with `requires_grad`; nodes that do not
    /// feed `loss` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::MissingTensor`] if a recorded input is absent from
    /// `tensors`.
    pub fn backward(&self, loss: &Tensor, tensors: &mut TensorStore) -> Result<(), MlError> {
        let mut grads: HashMap<usize, Vec<f32>> = HashMap::new();
        grads.insert(loss.id, vec![1.0; loss.len()]);

        for node in self.nodes.iter().rev() {
            let Some(out_grad) = grads.get(&node.out).cloned() else {
                continue;
            };
            let a = lookup(tensors, node.a)?;

            match node.op {
                EOp::Add => {
                    let b = lookup(tensors, node.b)?;
                    for (g, og) in slot(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    for (g, og) in slot(&mut grads, node.b, b.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                }
                EOp::AddBroadcast => {
                    let b = lookup(tensors, node.b)?;
                    let dim = b.len();
                    for (g, og) in slot(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += og;
                    }
                    let b_grad = slot(&mut grads, node.b, dim);
                    for (i, og) in out_grad.iter().enumerate() {
                        b_grad[i % dim] += og;
                    }
                }
                EOp::MatMul => {
                    let b = lookup(tensors, node.b)?;
                    let out_dim = a.shape[0];
                    let in_dim = a.shape[1];
                    let batch = b.len() / in_dim;

                    {
                        let w_grad = slot(&mut grads, node.a, a.len());
                        for i in 0..out_dim {
                            for j in 0..in_dim {
                                for k in 0..batch {
                                    w_grad[i * in_dim + j] +=
                                        out_grad[k * out_dim + i] * b.data[k * in_dim + j];
                                }
                            }
                        }
                    }

                    {
                        let x_grad = slot(&mut grads, node.b, b.len());
                        for k in 0..batch {
                            for j in 0..in_dim {
                                for i in 0..out_dim {
                                    x_grad[k * in_dim + j] +=
                                        out_grad[k * out_dim + i] * a.data[i * in_dim + j];
                                }
                            }
                        }
                    }
                }
                EOp::MulScalar(scalar) => {
                    for (g, og) in slot(&mut grads, node.a, a.len()).iter_mut().zip(&out_grad) {
                        *g += scalar * og;
                    }
                }
                EOp::Relu => {
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for (g, (d, og)) in a_grad.iter_mut().zip(a.data.iter().zip(&out_grad)) {
                        if *d > 0.0 {
                            *g += og;
                        }
                    }
                }
                EOp::LogSoftmax => {
                    // d/dx_j = g_j - softmax_j * sum_i g_i, row by row
                    let out = lookup(tensors, node.out)?;
                    let dim = *a.shape.last().unwrap_or(&a.len());
                    let a_grad = slot(&mut grads, node.a, a.len());
                    for ((g_row, y_row), og_row) in a_grad
                        .chunks_mut(dim.max(1))
                        .zip(out.data.chunks(dim.max(1)))
                        .zip(out_grad.chunks(dim.max(1)))
                    {
                        let total: f32 = og_row.iter().sum();
                        for (g, (y, og)) in g_row.iter_mut().zip(y_row.iter().zip(og_row)) {
                            *g += og - y.exp() * total;
                        }
                    }
                }
                EOp::Select(index) => {
                    slot(&mut grads, node.a, a.len())[index] += out_grad[0];
                }
                EOp::ReduceSum => {
                    for g in slot(&mut grads, node.a, a.len()).iter_mut() {
                        *g += out_grad[0];
                    }
                }
            }
        }

        for (id, grad) in grads {
            if let Some(tensor) = tensors.get_mut(&id) {
                if tensor.requires_grad {
                    tensor.grad = Some(grad);
                }
            }
        }

        Ok(())
    }
}
