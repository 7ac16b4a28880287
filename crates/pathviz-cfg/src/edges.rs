//! Edge synthesis.
//!
//! `wire_sequence` is pure: it returns the edges a child list produces and
//! the exit points through which control leaves it, and the caller decides
//! where those exits lead.

use crate::graph::{CfgEdge, CfgNodeId, EdgeTarget};
use crate::numbering::{NodeClass, NumberedNode};
use pathviz_tree::BranchRole;
use smallvec::{SmallVec, smallvec};

/// A place where control leaves a subgraph, with the label the outgoing
/// edge carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitPoint {
    pub node: CfgNodeId,
    pub label: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wiring {
    pub exits: SmallVec<[ExitPoint; 2]>,
    pub edges: Vec<CfgEdge>,
}

/// Wire a child list: each child's exits flow into the next child, and the
/// last child's exits are returned.
pub fn wire_sequence(children: &[NumberedNode]) -> Wiring {
    let children: Vec<&NumberedNode> = children.iter().collect();
    wire_refs(&children)
}

fn wire_refs(children: &[&NumberedNode]) -> Wiring {
    let mut wiring = Wiring::default();
    for (i, child) in children.iter().enumerate() {
        let Wiring { exits, edges } = wire_node(child);
        wiring.edges.extend(edges);
        match children.get(i + 1) {
            Some(next) => wiring.edges.extend(
                exits
                    .into_iter()
                    .map(|exit| CfgEdge::labeled(exit.node, next.id, exit.label)),
            ),
            None => wiring.exits = exits,
        }
    }
    wiring
}

fn wire_node(node: &NumberedNode) -> Wiring {
    match node.class {
        NodeClass::Block => Wiring {
            exits: smallvec![ExitPoint { node: node.id, label: "" }],
            edges: Vec::new(),
        },
        NodeClass::Return => Wiring {
            exits: smallvec![ExitPoint { node: node.id, label: "" }],
            edges: vec![CfgEdge::to_terminal(node.id)],
        },
        NodeClass::Conditional => wire_conditional(node),
        NodeClass::Loop => wire_loop(node),
    }
}

fn wire_conditional(node: &NumberedNode) -> Wiring {
    let (consequent, alternate): (Vec<&NumberedNode>, Vec<&NumberedNode>) = node
        .children
        .iter()
        .partition(|child| child.role != Some(BranchRole::Alternate));

    let mut wiring = Wiring::default();
    for (branch, label) in [(&consequent, "T"), (&alternate, "F")] {
        if let Some(first) = branch.first() {
            wiring.edges.push(CfgEdge::labeled(node.id, first.id, label));
        }
    }
    for (branch, label) in [(&consequent, "T"), (&alternate, "F")] {
        if branch.is_empty() {
            wiring.exits.push(ExitPoint { node: node.id, label });
            continue;
        }
        let inner = wire_refs(branch);
        wiring.edges.extend(inner.edges);
        wiring.exits.extend(inner.exits);
    }
    wiring
}

fn wire_loop(node: &NumberedNode) -> Wiring {
    let mut edges = Vec::new();
    let body_exits = match node.children.first() {
        Some(first) => {
            edges.push(CfgEdge::labeled(node.id, first.id, "T"));
            let inner = wire_sequence(&node.children);
            edges.extend(inner.edges);
            inner.exits
        }
        None => smallvec![ExitPoint { node: node.id, label: "T" }],
    };
    edges.extend(body_exits.into_iter().map(|exit| CfgEdge {
        from: exit.node,
        to: EdgeTarget::Node(node.id),
        label: Some(format!("{}\nwhile", exit.label)),
    }));
    Wiring {
        exits: smallvec![ExitPoint { node: node.id, label: "F" }],
        edges,
    }
}

#[cfg(test)]
#[path = "../tests/edges_tests.rs"]
mod tests;
