//! The control-flow graph and its DOT rendering.

use pathviz_common::{IN_PATH_FILL, OFF_PATH_FILL};
use std::fmt::{self, Display, Write as _};

/// Node id, rendered as `n<index>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CfgNodeId(pub u32);

impl Display for CfgNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    Box,
    Diamond,
    Circle,
}

impl NodeShape {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Diamond => "diamond",
            NodeShape::Circle => "circle",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfgNode {
    pub id: CfgNodeId,
    /// 1-based position in numbering order; `None` for return sinks, which
    /// render without a label.
    pub step: Option<u32>,
    pub label: String,
    pub shape: NodeShape,
    pub in_path: bool,
}

/// The single `return` box every return sink flows into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalNode {
    pub step: u32,
    pub label: String,
    pub in_path: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeTarget {
    Node(CfgNodeId),
    Terminal,
}

impl Display for EdgeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeTarget::Node(id) => write!(f, "{id}"),
            EdgeTarget::Terminal => f.write_str("return"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfgEdge {
    pub from: CfgNodeId,
    pub to: EdgeTarget,
    /// `None` renders as an empty attribute list, `Some("")` as an empty
    /// label.
    pub label: Option<String>,
}

impl CfgEdge {
    pub fn labeled(from: CfgNodeId, to: CfgNodeId, label: impl Into<String>) -> CfgEdge {
        CfgEdge {
            from,
            to: EdgeTarget::Node(to),
            label: Some(label.into()),
        }
    }

    pub fn to_terminal(from: CfgNodeId) -> CfgEdge {
        CfgEdge {
            from,
            to: EdgeTarget::Terminal,
            label: None,
        }
    }
}

impl Display for CfgEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}->{}[label=\"{}\"]", self.from, self.to, DotEscaped(label)),
            None => write!(f, "{}->{} []", self.from, self.to),
        }
    }
}

/// How nodes are drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix labels with `~<step>~`.
    pub step_numbers: bool,
    pub in_path_fill: String,
    pub off_path_fill: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            step_numbers: true,
            in_path_fill: IN_PATH_FILL.to_string(),
            off_path_fill: OFF_PATH_FILL.to_string(),
        }
    }
}

impl RenderOptions {
    fn fill(&self, in_path: bool) -> &str {
        if in_path {
            &self.in_path_fill
        } else {
            &self.off_path_fill
        }
    }

    fn label(&self, step: Option<u32>, text: &str) -> String {
        match step {
            Some(step) if self.step_numbers => format!("~{step}~\n{text}"),
            _ => text.to_string(),
        }
    }
}

/// Escapes a label for a double-quoted DOT string. Newlines become `\n`.
struct DotEscaped<'a>(&'a str);

impl Display for DotEscaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => {}
                _ => f.write_char(ch)?,
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlFlowGraph {
    pub nodes: Vec<CfgNode>,
    pub terminal: Option<TerminalNode>,
    pub edges: Vec<CfgEdge>,
}

impl ControlFlowGraph {
    pub fn node(&self, id: CfgNodeId) -> Option<&CfgNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, from: CfgNodeId, to: EdgeTarget) -> Option<&CfgEdge> {
        self.edges
            .iter()
            .find(|edge| edge.from == from && edge.to == to)
    }

    pub fn incoming(&self, to: EdgeTarget) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |edge| edge.to == to)
    }

    pub fn outgoing(&self, from: CfgNodeId) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter().filter(move |edge| edge.from == from)
    }

    /// One DOT node statement per line, the terminal last.
    pub fn node_text(&self, options: &RenderOptions) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let label = match node.shape {
                NodeShape::Circle => String::new(),
                _ => options.label(node.step, &node.label),
            };
            let _ = writeln!(
                out,
                "{}[label=\"{}\", shape=\"{}\" style=filled fillcolor=\"{}\"]",
                node.id,
                DotEscaped(&label),
                node.shape.as_str(),
                options.fill(node.in_path)
            );
        }
        if let Some(terminal) = &self.terminal {
            let label = options.label(Some(terminal.step), &terminal.label);
            let _ = writeln!(
                out,
                "return[label=\"{}\", shape=\"box\" style=filled fillcolor=\"{}\"]",
                DotEscaped(&label),
                options.fill(terminal.in_path)
            );
        }
        out
    }

    /// One DOT edge statement per line.
    pub fn edge_text(&self) -> String {
        let mut out = String::new();
        for edge in &self.edges {
            let _ = writeln!(out, "{edge}");
        }
        out
    }

    /// Node statements, a blank line, then edge statements.
    pub fn to_dot_body(&self, options: &RenderOptions) -> String {
        format!("{}\n{}", self.node_text(options), self.edge_text())
    }

    /// A complete `digraph`.
    pub fn to_dot(&self, options: &RenderOptions) -> String {
        let mut out = String::from("digraph {\n");
        for line in self.to_dot_body(options).lines().filter(|line| !line.is_empty()) {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod tests;
