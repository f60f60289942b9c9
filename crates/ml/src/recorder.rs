use crate::graph::Node;

/// Sink for the ops executed by [`crate::Tensor`] methods.
pub trait Recorder {
    fn record(&mut self, node: Node);
    fn nodes(&self) -> &[Node];
}
