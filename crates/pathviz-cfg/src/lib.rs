//! Control-flow graph synthesis for the pathviz analyzer.
//!
//! Compiles a compacted, annotated statement tree into a graph:
//! - `numbering` - assigns ids, shapes and fills to every statement
//! - `edges` - wires sequential, branch, join and loop back-edges
//! - `graph` - the resulting `ControlFlowGraph` and its DOT rendering

pub mod graph;
pub use graph::{
    CfgEdge, CfgNode, CfgNodeId, ControlFlowGraph, EdgeTarget, NodeShape, RenderOptions,
    TerminalNode,
};

pub mod numbering;
pub use numbering::{CfgBuilder, NodeClass, NumberedNode};

pub mod edges;
pub use edges::{ExitPoint, Wiring, wire_sequence};

use pathviz_tree::StatementNode;
use tracing::debug;

/// Build the control-flow graph of a function (or script root) body.
pub fn build_cfg(function: &StatementNode) -> ControlFlowGraph {
    let mut builder = CfgBuilder::new();
    let numbered = builder.number(&function.children);
    let wiring = wire_sequence(&numbered);
    let graph = builder.finish(wiring.edges);
    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "built control-flow graph"
    );
    graph
}

#[cfg(test)]
#[path = "../tests/build_tests.rs"]
mod tests;
