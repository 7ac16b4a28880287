//! Merging straight-line statements into display blocks.
//!
//! Consecutive mergeable statements collapse into the first of them, their
//! texts joined by newlines. Conditionals and loops are kept, with their
//! children regrouped as the compacted primary group (consequent or body)
//! followed by the compacted alternate group. Returns are never merged.

use crate::node::{StatementKind, StatementNode};

/// Compact every top-level function of a program, or the program itself if
/// it declares none.
pub fn compact_program(root: &mut StatementNode) {
    let mut compacted_function = false;
    for function in root
        .children
        .iter_mut()
        .filter(|child| child.kind == StatementKind::FunctionDeclaration)
    {
        compact(function);
        compacted_function = true;
    }
    if !compacted_function {
        compact(root);
    }
}

/// Compact the children of `node` in place.
pub fn compact(node: &mut StatementNode) {
    let children = std::mem::take(&mut node.children);
    node.children = compact_sequence(children);
}

fn compact_sequence(children: Vec<StatementNode>) -> Vec<StatementNode> {
    let mut output: Vec<StatementNode> = Vec::with_capacity(children.len());
    for mut child in children {
        if child.kind.is_branching() {
            let (primary, alternate): (Vec<_>, Vec<_>) = std::mem::take(&mut child.children)
                .into_iter()
                .partition(|grandchild| grandchild.role.is_none_or(|role| role.is_primary()));
            child.children = compact_sequence(primary);
            child.children.extend(compact_sequence(alternate));
            output.push(child);
            continue;
        }

        match output.last_mut() {
            Some(last) if child.kind.is_mergeable() && last.kind.is_mergeable() => {
                last.text.push('\n');
                last.text.push_str(&child.text);
            }
            _ => output.push(child),
        }
    }
    output
}

#[cfg(test)]
#[path = "../tests/compact_tests.rs"]
mod tests;
