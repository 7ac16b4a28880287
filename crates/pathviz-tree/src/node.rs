//! Statement tree nodes.

use serde::Serialize;

/// What a statement node does when executed.
///
/// Decided once at ingestion; everything downstream matches on this enum
/// instead of re-reading the builder's `type`/`subType` strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StatementKind {
    FunctionDeclaration,
    /// `let`/`const`/`var` declarations and plain or compound assignments.
    VariableDeclaration,
    Conditional,
    Loop,
    Return,
    Other,
}

impl StatementKind {
    /// Conditionals and loops split control flow.
    pub const fn is_branching(self) -> bool {
        matches!(self, StatementKind::Conditional | StatementKind::Loop)
    }

    /// Whether consecutive nodes of this kind can share one display block.
    pub const fn is_mergeable(self) -> bool {
        !self.is_branching() && !matches!(self, StatementKind::Return)
    }
}

/// Structural role of a child under a conditional or loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchRole {
    Consequent,
    Alternate,
    Body,
}

impl BranchRole {
    pub fn from_key(key: &str) -> Option<BranchRole> {
        match key {
            "consequent" => Some(BranchRole::Consequent),
            "alternate" => Some(BranchRole::Alternate),
            "body" => Some(BranchRole::Body),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BranchRole::Consequent => "consequent",
            BranchRole::Alternate => "alternate",
            BranchRole::Body => "body",
        }
    }

    /// The group a branching node runs first: a conditional's consequent or
    /// a loop's body.
    pub const fn is_primary(self) -> bool {
        matches!(self, BranchRole::Consequent | BranchRole::Body)
    }
}

/// A node of the statement tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementNode {
    pub kind: StatementKind,
    /// Source fragment: the condition of a branch, the declaration of a
    /// function, or the statement itself.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<BranchRole>,
    /// Set when the annotator visits the node.
    pub in_path: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StatementNode>,
}

impl StatementNode {
    pub fn new(kind: StatementKind, text: impl Into<String>) -> StatementNode {
        StatementNode {
            kind,
            text: text.into(),
            role: None,
            in_path: false,
            children: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: BranchRole) -> StatementNode {
        self.role = Some(role);
        self
    }

    pub fn with_children(mut self, children: Vec<StatementNode>) -> StatementNode {
        self.children = children;
        self
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// The root of a parsed script.
    pub fn program(body: Vec<StatementNode>) -> StatementNode {
        StatementNode::new(StatementKind::Other, "").with_children(body)
    }

    /// `function name(params)` with the given body.
    pub fn function(declaration: impl Into<String>, body: Vec<StatementNode>) -> StatementNode {
        StatementNode::new(StatementKind::FunctionDeclaration, declaration).with_children(body)
    }

    pub fn assignment(text: impl Into<String>) -> StatementNode {
        StatementNode::new(StatementKind::VariableDeclaration, text)
    }

    /// A statement the annotator only marks, such as a bare expression.
    pub fn statement(text: impl Into<String>) -> StatementNode {
        StatementNode::new(StatementKind::Other, text)
    }

    pub fn return_statement(text: impl Into<String>) -> StatementNode {
        StatementNode::new(StatementKind::Return, text)
    }

    pub fn conditional(
        condition: impl Into<String>,
        consequent: Vec<StatementNode>,
        alternate: Vec<StatementNode>,
    ) -> StatementNode {
        let children = consequent
            .into_iter()
            .map(|child| child.with_role(BranchRole::Consequent))
            .chain(
                alternate
                    .into_iter()
                    .map(|child| child.with_role(BranchRole::Alternate)),
            )
            .collect();
        StatementNode::new(StatementKind::Conditional, condition).with_children(children)
    }

    pub fn while_loop(condition: impl Into<String>, body: Vec<StatementNode>) -> StatementNode {
        let children = body
            .into_iter()
            .map(|child| child.with_role(BranchRole::Body))
            .collect();
        StatementNode::new(StatementKind::Loop, condition).with_children(children)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn children_with_role(&self, role: BranchRole) -> impl Iterator<Item = &StatementNode> {
        self.children
            .iter()
            .filter(move |child| child.role == Some(role))
    }

    /// Function declarations directly under this node.
    pub fn functions(&self) -> impl Iterator<Item = &StatementNode> {
        self.children
            .iter()
            .filter(|child| child.kind == StatementKind::FunctionDeclaration)
    }

    /// Name of a function declaration: the word between `function` and `(`.
    pub fn function_name(&self) -> Option<&str> {
        if self.kind != StatementKind::FunctionDeclaration {
            return None;
        }
        let head = self.text.split('(').next()?.trim();
        let name = head
            .strip_prefix("function")?
            .trim()
            .trim_start_matches('*')
            .trim();
        (!name.is_empty()).then_some(name)
    }

    /// Pre-order walk over this node and all of its descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a StatementNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

#[cfg(test)]
#[path = "../tests/node_tests.rs"]
mod tests;
