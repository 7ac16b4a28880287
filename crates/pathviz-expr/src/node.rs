//! Arena storage for parsed expressions.

use crate::scanner::SyntaxKind;

/// Index of a node inside an `ExprArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprIndex(pub u32);

/// Byte range of a node in the parsed text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextRange {
    pub pos: u32,
    pub end: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprNode {
    Number(f64),
    Str(String),
    Bool(bool),
    Identifier(String),
    /// `[a, b, c]`
    Array(Vec<ExprIndex>),
    /// `object[index]`
    Element {
        object: ExprIndex,
        index: ExprIndex,
    },
    /// `object.name`
    Property {
        object: ExprIndex,
        name: String,
    },
    Unary {
        operator: SyntaxKind,
        operand: ExprIndex,
    },
    Binary {
        operator: SyntaxKind,
        left: ExprIndex,
        right: ExprIndex,
    },
    /// `condition ? when_true : when_false`
    Conditional {
        condition: ExprIndex,
        when_true: ExprIndex,
        when_false: ExprIndex,
    },
    /// `target op= value`; only produced at the root of `parse_assignment`.
    Assignment {
        operator: SyntaxKind,
        target: ExprIndex,
        value: ExprIndex,
    },
}

/// Arena-based storage for expression nodes.
/// Nodes are stored contiguously and referenced by index.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    nodes: Vec<ExprNode>,
    ranges: Vec<TextRange>,
    /// Height of the subtree rooted at each node (leaves are 1).
    heights: Vec<u32>,
}

impl ExprArena {
    pub fn new() -> ExprArena {
        ExprArena::default()
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: ExprNode, range: TextRange) -> ExprIndex {
        let height = 1 + self.child_height(&node);
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        self.ranges.push(range);
        self.heights.push(height);
        ExprIndex(index)
    }

    fn child_height(&self, node: &ExprNode) -> u32 {
        let height_of = |index: &ExprIndex| self.height(*index);
        match node {
            ExprNode::Number(_) | ExprNode::Str(_) | ExprNode::Bool(_) | ExprNode::Identifier(_) => 0,
            ExprNode::Array(elements) => elements.iter().map(height_of).max().unwrap_or(0),
            ExprNode::Element { object, index } => height_of(object).max(height_of(index)),
            ExprNode::Property { object, .. } => height_of(object),
            ExprNode::Unary { operand, .. } => height_of(operand),
            ExprNode::Binary { left, right, .. } => height_of(left).max(height_of(right)),
            ExprNode::Conditional {
                condition,
                when_true,
                when_false,
            } => height_of(condition)
                .max(height_of(when_true))
                .max(height_of(when_false)),
            ExprNode::Assignment { target, value, .. } => height_of(target).max(height_of(value)),
        }
    }

    /// Get a node by index
    pub fn get(&self, index: ExprIndex) -> Option<&ExprNode> {
        self.nodes.get(index.0 as usize)
    }

    pub fn range(&self, index: ExprIndex) -> TextRange {
        self.ranges.get(index.0 as usize).copied().unwrap_or_default()
    }

    pub fn height(&self, index: ExprIndex) -> u32 {
        self.heights.get(index.0 as usize).copied().unwrap_or(0)
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
