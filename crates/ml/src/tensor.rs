use crate::graph::{EOp, Node};
use crate::recorder::Recorder;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tensors touched by a forward pass, keyed by [`Tensor::id`].
pub type TensorStore = HashMap<usize, Tensor>;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Dense row-major `f32` tensor.
#[derive(Clone, Debug)]
pub struct Tensor {
    pub id: usize,
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
    pub requires_grad: bool,
    pub grad: Option<Vec<f32>>,
}

impl Tensor {
    pub fn from_vec(shape: Vec<usize>, data: Vec<f32>) -> Self {
        assert_eq!(shape.iter().product::<usize>(), data.len());
        Self {
            id: next_id(),
            data,
            shape,
            requires_grad: false,
            grad: None,
        }
    }

    pub fn scalar(value: f32) -> Self {
        Self::from_vec(vec![1], vec![value])
    }

    #[must_use]
    pub fn with_grad(mut self) -> Self {
        self.requires_grad = true;
        self
    }

    pub fn set_requires_grad(&mut self) {
        self.requires_grad = true;
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First element; the value of a scalar tensor.
    pub fn item(&self) -> f32 {
        self.data[0]
    }

    fn emit(
        &self,
        other: &Tensor,
        op: EOp,
        out: Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        tensors.entry(self.id).or_insert_with(|| self.clone());
        tensors.entry(other.id).or_insert_with(|| other.clone());
        recorder.record(Node {
            op,
            a: self.id,
            b: other.id,
            out: out.id,
        });
        tensors.insert(out.id, out.clone());
        out
    }

    /// Element-wise sum of two tensors with the same number of elements.
    pub fn add(
        &self,
        other: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        assert_eq!(self.len(), other.len(), "add: length mismatch");
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(other, EOp::Add, out, recorder, tensors)
    }

    /// Adds the vector `bias` to every row of `self`.
    pub fn add_broadcast(
        &self,
        bias: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        let dim = bias.len();
        assert!(dim > 0 && self.len() % dim == 0, "add_broadcast: width mismatch");
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, v)| v + bias.data[i % dim])
            .collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(bias, EOp::AddBroadcast, out, recorder, tensors)
    }

    /// `self` is a `[out, in]` weight matrix, `x` holds `batch` rows of width
    /// `in`. Returns `[batch, out]`.
    pub fn matmul(
        &self,
        x: &Tensor,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        assert_eq!(self.shape.len(), 2, "matmul: weight must be 2-d");
        let (out_dim, in_dim) = (self.shape[0], self.shape[1]);
        assert!(x.len() % in_dim == 0, "matmul: input width mismatch");
        let batch = x.len() / in_dim;
        let mut y = vec![0.0f32; batch * out_dim];
        for k in 0..batch {
            let row = &x.data[k * in_dim..(k + 1) * in_dim];
            for o in 0..out_dim {
                let w = &self.data[o * in_dim..(o + 1) * in_dim];
                y[k * out_dim + o] = w.iter().zip(row).map(|(w, x)| w * x).sum();
            }
        }
        let out = Tensor::from_vec(vec![batch, out_dim], y);
        self.emit(x, EOp::MatMul, out, recorder, tensors)
    }

    pub fn mul_scalar(
        &self,
        scalar: f32,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        let data = self.data.iter().map(|v| v * scalar).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(self, EOp::MulScalar(scalar), out, recorder, tensors)
    }

    pub fn relu(&self, recorder: &mut impl Recorder, tensors: &mut TensorStore) -> Tensor {
        let data = self.data.iter().map(|v| v.max(0.0)).collect();
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(self, EOp::Relu, out, recorder, tensors)
    }

    /// Log-softmax over the last dimension. Rows are shifted by their maximum
    /// so the result stays finite for any finite input.
    pub fn log_softmax(&self, recorder: &mut impl Recorder, tensors: &mut TensorStore) -> Tensor {
        let dim = *self.shape.last().unwrap_or(&self.len());
        let mut data = Vec::with_capacity(self.len());
        for row in self.data.chunks(dim.max(1)) {
            let m = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let lse = m + row.iter().map(|v| (v - m).exp()).sum::<f32>().ln();
            data.extend(row.iter().map(|v| v - lse));
        }
        let out = Tensor::from_vec(self.shape.clone(), data);
        self.emit(self, EOp::LogSoftmax, out, recorder, tensors)
    }

    /// Picks the element at flat `index` as a scalar tensor.
    pub fn select(
        &self,
        index: usize,
        recorder: &mut impl Recorder,
        tensors: &mut TensorStore,
    ) -> Tensor {
        assert!(index < self.len(), "select: index {index} out of range");
        let out = Tensor::scalar(self.data[index]);
        self.emit(self, EOp::Select(index), out, recorder, tensors)
    }

    pub fn reduce_sum(&self, recorder: &mut impl Recorder, tensors: &mut TensorStore) -> Tensor {
        let out = Tensor::scalar(self.data.iter().sum());
        self.emit(self, EOp::ReduceSum, out, recorder, tensors)
    }
}
