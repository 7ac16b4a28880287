//! Node numbering.
//!
//! Statements are numbered in pre-order, left to right. Each gets an id
//! `n<k>` and a 1-based step. The numbered result is a mirror of the
//! statement tree that edge synthesis walks; the statement tree itself is
//! never modified.

use crate::graph::{CfgEdge, CfgNode, CfgNodeId, ControlFlowGraph, NodeShape, TerminalNode};
use pathviz_tree::{BranchRole, StatementKind, StatementNode};

/// What a numbered node contributes to the wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeClass {
    Block,
    Conditional,
    Loop,
    /// A return sink, wired to the terminal.
    Return,
}

impl NodeClass {
    fn of(kind: StatementKind) -> NodeClass {
        match kind {
            StatementKind::Conditional => NodeClass::Conditional,
            StatementKind::Loop => NodeClass::Loop,
            StatementKind::Return => NodeClass::Return,
            StatementKind::FunctionDeclaration
            | StatementKind::VariableDeclaration
            | StatementKind::Other => NodeClass::Block,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberedNode {
    pub id: CfgNodeId,
    pub class: NodeClass,
    pub role: Option<BranchRole>,
    /// Empty unless `class` is `Conditional` or `Loop`.
    pub children: Vec<NumberedNode>,
}

/// Accumulates nodes for one graph.
#[derive(Debug, Default)]
pub struct CfgBuilder {
    nodes: Vec<CfgNode>,
    terminal: Option<TerminalNode>,
    next_id: u32,
}

impl CfgBuilder {
    pub fn new() -> CfgBuilder {
        CfgBuilder::default()
    }

    pub fn number(&mut self, children: &[StatementNode]) -> Vec<NumberedNode> {
        children
            .iter()
            .map(|child| self.number_node(child))
            .collect()
    }

    fn number_node(&mut self, node: &StatementNode) -> NumberedNode {
        let id = CfgNodeId(self.next_id);
        self.next_id += 1;
        let step = self.next_id;
        let class = NodeClass::of(node.kind);

        let children = match class {
            NodeClass::Return => {
                self.nodes.push(CfgNode {
                    id,
                    step: None,
                    label: String::new(),
                    shape: NodeShape::Circle,
                    in_path: node.in_path,
                });
                self.register_return(step, node);
                Vec::new()
            }
            NodeClass::Block => {
                self.push_node(id, step, node, NodeShape::Box);
                Vec::new()
            }
            NodeClass::Conditional | NodeClass::Loop => {
                self.push_node(id, step, node, NodeShape::Diamond);
                self.number(&node.children)
            }
        };

        NumberedNode {
            id,
            class,
            role: node.role,
            children,
        }
    }

    fn push_node(&mut self, id: CfgNodeId, step: u32, node: &StatementNode, shape: NodeShape) {
        self.nodes.push(CfgNode {
            id,
            step: Some(step),
            label: node.text.clone(),
            shape,
            in_path: node.in_path,
        });
    }

    /// The first return labels the terminal; any in-path return colors it.
    fn register_return(&mut self, step: u32, node: &StatementNode) {
        match &mut self.terminal {
            Some(terminal) => terminal.in_path |= node.in_path,
            None => {
                self.terminal = Some(TerminalNode {
                    step,
                    label: node.text.clone(),
                    in_path: node.in_path,
                });
            }
        }
    }

    pub fn finish(self, edges: Vec<CfgEdge>) -> ControlFlowGraph {
        ControlFlowGraph {
            nodes: self.nodes,
            terminal: self.terminal,
            edges,
        }
    }
}

#[cfg(test)]
#[path = "../tests/numbering_tests.rs"]
mod tests;
