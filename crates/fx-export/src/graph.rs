use std::fmt;

use crate::error::Result;
use crate::literal::KwArgs;

/// Handle to a value in the target-format graph under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueHandle(pub u32);

impl fmt::Display for ValueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Target-format graph builder supplied by the graph-translation layer.
///
/// Exporter functions lower one operator invocation by appending nodes
/// through this interface.
pub trait GraphBuilder {
    /// Append a node and return handles to its outputs.
    ///
    /// `domain` is the operator set domain (`""` for the default ONNX
    /// domain), `op_type` the operator or function name.
    fn add_node(
        &mut self,
        domain: &str,
        op_type: &str,
        inputs: &[ValueHandle],
        attributes: &KwArgs,
    ) -> Result<Vec<ValueHandle>>;
}
