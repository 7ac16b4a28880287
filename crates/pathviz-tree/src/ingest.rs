//! Decoding flow-tree builder output.
//!
//! The builder emits nested objects of the shape
//! `{ "type", "subType"?, "name", "key"?, "body"?: [...] }` and attaches many
//! more fields that pathviz ignores. `type`/`subType` decide the node kind,
//! `name` is the source fragment and `key` the role under a branch.

use crate::node::{BranchRole, StatementKind, StatementNode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("malformed flow tree: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no function named `{0}` in the flow tree")]
    FunctionNotFound(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFlowNode {
    #[serde(rename = "type", default)]
    node_type: Option<String>,
    #[serde(default)]
    sub_type: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    body: Option<Vec<RawFlowNode>>,
}

impl RawFlowNode {
    fn into_statement(self) -> StatementNode {
        let kind = classify(
            self.node_type.as_deref().unwrap_or_default(),
            self.sub_type.as_deref(),
        );
        StatementNode {
            kind,
            text: self.name.unwrap_or_default(),
            role: self.key.as_deref().and_then(BranchRole::from_key),
            in_path: false,
            children: self
                .body
                .unwrap_or_default()
                .into_iter()
                .map(RawFlowNode::into_statement)
                .collect(),
        }
    }
}

/// Map the builder's `type`/`subType` pair to a statement kind.
pub fn classify(node_type: &str, sub_type: Option<&str>) -> StatementKind {
    match (node_type, sub_type) {
        ("Function", Some("FunctionDeclaration")) => StatementKind::FunctionDeclaration,
        ("VariableDeclarator" | "AssignmentExpression", _) => StatementKind::VariableDeclaration,
        ("Conditional", Some("IfStatement")) => StatementKind::Conditional,
        ("Loop", Some("WhileStatement")) => StatementKind::Loop,
        ("ReturnStatement", _) => StatementKind::Return,
        _ => StatementKind::Other,
    }
}

pub fn from_json_str(text: &str) -> Result<StatementNode, TreeError> {
    let raw: RawFlowNode = serde_json::from_str(text)?;
    let root = raw.into_statement();
    debug!(nodes = root.node_count(), "ingested flow tree");
    Ok(root)
}

pub fn from_json_value(value: serde_json::Value) -> Result<StatementNode, TreeError> {
    let raw: RawFlowNode = serde_json::from_value(value)?;
    Ok(raw.into_statement())
}

/// Pick the function to analyze.
///
/// With a name, the first top-level function declaration carrying it. Without
/// one, the first top-level function, or the root itself for a script that
/// declares no functions.
pub fn select_function<'a>(
    root: &'a StatementNode,
    name: Option<&str>,
) -> Result<&'a StatementNode, TreeError> {
    match name {
        Some(name) => root
            .functions()
            .find(|function| function.function_name() == Some(name))
            .ok_or_else(|| TreeError::FunctionNotFound(name.to_string())),
        None => Ok(root.functions().next().unwrap_or(root)),
    }
}

#[cfg(test)]
#[path = "../tests/ingest_tests.rs"]
mod tests;
