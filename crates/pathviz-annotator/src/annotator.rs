//! The path annotator.
//!
//! Walks a statement tree the way the program would run under one input
//! vector: parameters take inputs in declaration order, assignments update
//! the environment, conditionals follow the branch their condition selects
//! and loops iterate while their condition holds. Every statement reached is
//! marked `in_path`.
//!
//! Loops are bounded by an unrolling budget, and all loops of a run share a
//! cap on total body executions. Iterations are driven by a loop inside
//! `annotate_loop`, not by recursion, so the budget never turns into stack
//! depth.

use crate::environment::{Environment, RootBindings, ScopeId};
use crate::error::AnnotateError;
use pathviz_common::limits::{DEFAULT_UNROLL_BUDGET, MAX_ANNOTATION_DEPTH, MAX_LOOP_ITERATIONS};
use pathviz_expr::{
    ExprNode, ParsedExpression, Value, apply_binary, evaluate, evaluate_at, parse_assignment,
    parse_expression,
};
use pathviz_tree::{BranchRole, StatementKind, StatementNode};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{debug, trace, warn};

#[derive(Clone, Debug)]
pub struct AnnotateOptions {
    /// Extra loop iterations executed before a loop is truncated.
    pub unroll_budget: u32,
    /// Fail with `UnderflowInput` instead of binding `undefined` when the
    /// inputs run out.
    pub strict_inputs: bool,
    pub max_depth: u32,
    /// Loop body executions allowed per run, across all loops.
    pub max_loop_iterations: u64,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        AnnotateOptions {
            unroll_budget: DEFAULT_UNROLL_BUDGET,
            strict_inputs: false,
            max_depth: MAX_ANNOTATION_DEPTH,
            max_loop_iterations: MAX_LOOP_ITERATIONS,
        }
    }
}

/// A loop whose condition still held when it was cut off.
///
/// One entry per loop statement, however often that loop was truncated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncatedLoop {
    pub condition: String,
    /// Most iterations any truncated execution of the loop ran.
    pub iterations: u32,
    /// How many executions of the loop were truncated.
    pub truncations: u32,
}

/// Result of an annotation run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Final bindings of the root scope, in first-write order.
    pub bindings: RootBindings,
    pub truncated_loops: Vec<TruncatedLoop>,
}

/// Annotate `root` under `inputs`.
pub fn annotate_program(
    root: &mut StatementNode,
    inputs: impl IntoIterator<Item = Value>,
    options: &AnnotateOptions,
) -> Result<Annotation, AnnotateError> {
    PathAnnotator::new(inputs, options.clone()).run(root)
}

/// Parameter names of a function declaration: the words between the first
/// `(` and the `)` that follows it.
pub fn parameter_names(declaration: &str) -> Vec<&str> {
    let Some(open) = declaration.find('(') else {
        return Vec::new();
    };
    let rest = &declaration[open + 1..];
    let list = rest.find(')').map_or(rest, |close| &rest[..close]);
    list.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Per-call interpreter state.
pub struct PathAnnotator {
    environment: Environment,
    inputs: VecDeque<Value>,
    unroll_budget: u32,
    options: AnnotateOptions,
    truncated_loops: Vec<TruncatedLoop>,
    /// Position in `truncated_loops` of each truncated loop, keyed by the
    /// address of its node. Nodes stay put while the tree is borrowed.
    truncated_index: FxHashMap<usize, usize>,
    loop_iterations: u64,
    depth: u32,
    conditions: FxHashMap<String, Rc<ParsedExpression>>,
    assignments: FxHashMap<String, Rc<ParsedExpression>>,
}

impl PathAnnotator {
    pub fn new(inputs: impl IntoIterator<Item = Value>, options: AnnotateOptions) -> Self {
        PathAnnotator {
            environment: Environment::new(),
            inputs: inputs.into_iter().collect(),
            unroll_budget: options.unroll_budget,
            options,
            truncated_loops: Vec::new(),
            truncated_index: FxHashMap::default(),
            loop_iterations: 0,
            depth: 0,
            conditions: FxHashMap::default(),
            assignments: FxHashMap::default(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Annotate `root` in the root scope and report the final state.
    pub fn run(mut self, root: &mut StatementNode) -> Result<Annotation, AnnotateError> {
        let scope = self.environment.root();
        self.annotate(root, scope)?;
        Ok(Annotation {
            bindings: self
                .environment
                .bindings(scope)
                .cloned()
                .unwrap_or_default(),
            truncated_loops: self.truncated_loops,
        })
    }

    /// Mark `node` in-path and execute it in `scope`.
    pub fn annotate(
        &mut self,
        node: &mut StatementNode,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        if self.depth >= self.options.max_depth {
            return Err(AnnotateError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        node.in_path = true;
        let result = match node.kind {
            StatementKind::FunctionDeclaration => self.annotate_function(node, scope),
            StatementKind::VariableDeclaration => self.annotate_assignment(node, scope),
            StatementKind::Conditional => self.annotate_conditional(node, scope),
            StatementKind::Loop => self.annotate_loop(node, scope),
            StatementKind::Return | StatementKind::Other => {
                self.annotate_sequence(node.children.iter_mut(), scope)
            }
        };
        self.depth -= 1;
        result
    }

    fn annotate_sequence<'n>(
        &mut self,
        children: impl Iterator<Item = &'n mut StatementNode>,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        for child in children {
            self.annotate(child, scope)?;
        }
        Ok(())
    }

    fn annotate_function(
        &mut self,
        node: &mut StatementNode,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        for parameter in parameter_names(&node.text) {
            let value = match self.inputs.pop_front() {
                Some(value) => value,
                None if self.options.strict_inputs => {
                    return Err(AnnotateError::UnderflowInput {
                        function: node.function_name().unwrap_or("<anonymous>").to_string(),
                        parameter: parameter.to_string(),
                    });
                }
                None => {
                    warn!(parameter, "inputs exhausted, binding undefined");
                    Value::Undefined
                }
            };
            self.environment.declare(scope, parameter, value);
        }
        self.annotate_sequence(node.children.iter_mut(), scope)
    }

    fn annotate_assignment(
        &mut self,
        node: &mut StatementNode,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        let expr = self.parse_assignment(&node.text)?;
        let invalid = || AnnotateError::InvalidAssignment {
            text: node.text.clone(),
        };

        let (operator, target, value) = match expr.root_node() {
            Some(&ExprNode::Assignment {
                operator,
                target,
                value,
            }) => (operator, target, value),
            // `let x;`
            Some(ExprNode::Identifier(name)) if expr.declaration_keyword.is_some() => {
                self.environment.declare(scope, name, Value::Undefined);
                return Ok(());
            }
            _ => return Err(invalid()),
        };

        let view = self.environment.view(scope);
        let mut result = evaluate_at(&expr.arena, value, &view);
        if let Some(binary) = operator.compound_operator() {
            let current = evaluate_at(&expr.arena, target, &view);
            result = apply_binary(binary, &current, &result);
        }

        match expr.arena.get(target) {
            Some(ExprNode::Identifier(name)) => {
                self.environment.write(scope, name, result);
                Ok(())
            }
            Some(&ExprNode::Element { object, index }) => {
                let Some(ExprNode::Identifier(name)) = expr.arena.get(object) else {
                    return Err(invalid());
                };
                let index = evaluate_at(&expr.arena, index, &view);
                self.environment.write_indexed(scope, name, &index, result)
            }
            _ => Err(invalid()),
        }
    }

    fn annotate_conditional(
        &mut self,
        node: &mut StatementNode,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        let taken = if self.test(&node.text, scope)? {
            BranchRole::Consequent
        } else {
            BranchRole::Alternate
        };
        debug!(condition = %node.text, branch = taken.as_str(), "conditional");

        let branch_scope = self.environment.enter_scope(scope);
        let result = self.annotate_sequence(
            node.children
                .iter_mut()
                .filter(|child| child.role == Some(taken)),
            branch_scope,
        );
        self.environment.exit_scope(branch_scope);
        result
    }

    fn annotate_loop(
        &mut self,
        node: &mut StatementNode,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        let budget_at_entry = self.unroll_budget;
        let result = self.iterate_loop(node, scope);
        self.unroll_budget = budget_at_entry;
        result
    }

    fn iterate_loop(
        &mut self,
        node: &mut StatementNode,
        scope: ScopeId,
    ) -> Result<(), AnnotateError> {
        let mut iterations = 0u32;
        let mut exhausted = false;
        loop {
            if !self.test(&node.text, scope)? {
                debug!(condition = %node.text, iterations, "loop exited");
                return Ok(());
            }
            if exhausted || self.loop_iterations >= self.options.max_loop_iterations {
                warn!(
                    condition = %node.text,
                    iterations,
                    total = self.loop_iterations,
                    "loop still running, truncating"
                );
                self.record_truncation(node, iterations);
                return Ok(());
            }

            iterations += 1;
            self.loop_iterations += 1;
            trace!(condition = %node.text, iterations, "loop iteration");

            let body_scope = self.environment.enter_scope(scope);
            let result = self.annotate_sequence(
                node.children
                    .iter_mut()
                    .filter(|child| child.role == Some(BranchRole::Body)),
                body_scope,
            );
            self.environment.exit_scope(body_scope);
            result?;

            match self.unroll_budget.checked_sub(1) {
                Some(budget) => self.unroll_budget = budget,
                None => exhausted = true,
            }
        }
    }

    fn record_truncation(&mut self, node: &StatementNode, iterations: u32) {
        let key = std::ptr::from_ref(node).addr();
        match self.truncated_index.get(&key) {
            Some(&position) => {
                let truncated = &mut self.truncated_loops[position];
                truncated.iterations = truncated.iterations.max(iterations);
                truncated.truncations += 1;
            }
            None => {
                self.truncated_index.insert(key, self.truncated_loops.len());
                self.truncated_loops.push(TruncatedLoop {
                    condition: node.text.clone(),
                    iterations,
                    truncations: 1,
                });
            }
        }
    }

    /// Evaluate a condition for truthiness in `scope`.
    fn test(&mut self, text: &str, scope: ScopeId) -> Result<bool, AnnotateError> {
        let expr = match self.conditions.get(text) {
            Some(expr) => Rc::clone(expr),
            None => {
                let expr = Rc::new(parse_expression(text)?);
                self.conditions.insert(text.to_string(), Rc::clone(&expr));
                expr
            }
        };
        Ok(evaluate(&expr, &self.environment.view(scope)).is_truthy())
    }

    fn parse_assignment(&mut self, text: &str) -> Result<Rc<ParsedExpression>, AnnotateError> {
        if let Some(expr) = self.assignments.get(text) {
            return Ok(Rc::clone(expr));
        }
        let expr = Rc::new(parse_assignment(text)?);
        self.assignments.insert(text.to_string(), Rc::clone(&expr));
        Ok(expr)
    }
}

#[cfg(test)]
#[path = "../tests/annotator_tests.rs"]
mod tests;
