use crate::recorder::Recorder;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EOp {
    Add,
    AddBroadcast,
    MatMul,
    MulScalar(f32),
    Relu,
    LogSoftmax,
    Select(usize),
    ReduceSum,
}

/// One recorded op. Unary ops store their input in both `a` and `b`.
#[derive(Clone, Debug)]
pub struct Node {
    pub op: EOp,
    pub a: usize,
    pub b: usize,
    pub out: usize,
}

/// Recorder for forward passes that never need gradients.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Recorder for Graph {
    fn record(&mut self, node: Node) {
        self.nodes.push(node);
    }

    fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }
}
