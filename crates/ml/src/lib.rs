//! Minimal reverse-mode differentiation for small policy networks.
//!
//! Tensors are plain `f32` buffers identified by a process-unique id. Every
//! op takes a [`Recorder`] and a tensor store: the op's inputs and output are
//! written to the store and a [`graph::Node`] is handed to the recorder. A
//! [`Graph`] is used for inference, a [`Tape`] when gradients are needed.

use thiserror::Error;

pub mod graph;
pub mod nn;
pub mod optim;
pub mod recorder;
pub mod tape;
pub mod tensor;

pub use graph::Graph;
pub use nn::Dense;
pub use optim::Adam;
pub use recorder::Recorder;
pub use tape::Tape;
pub use tensor::{Tensor, TensorStore};

#[derive(Error, Debug)]
pub enum MlError {
    #[error("tensor {0} is not in the tensor store")]
    MissingTensor(usize),
    #[error("parameter {0} has no gradient")]
    MissingGrad(usize),
    #[error("optimizer tracks {expected} parameters, got {actual}")]
    ParamCount { expected: usize, actual: usize },
}
