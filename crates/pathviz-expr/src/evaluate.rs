//! Expression evaluation.
//!
//! Evaluation is total: every well-formed expression produces a `Value`.
//! Unbound names, out-of-range elements and properties the subset does not
//! model all evaluate to `undefined`, never to an error.

use crate::node::{ExprArena, ExprIndex, ExprNode};
use crate::parser::ParsedExpression;
use crate::scanner::SyntaxKind;
use crate::value::Value;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Name lookup used by the evaluator.
///
/// The annotator implements this for a view of its scope chain; plain maps
/// implement it for tests and standalone use.
pub trait Bindings {
    fn lookup(&self, name: &str) -> Option<&Value>;
}

impl<S: BuildHasher> Bindings for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Bindings for [(&str, Value)] {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }
}

/// Evaluate the root of a parsed expression.
///
/// For an assignment root this yields the right-hand side's value.
pub fn evaluate<B: Bindings + ?Sized>(expr: &ParsedExpression, bindings: &B) -> Value {
    evaluate_at(&expr.arena, expr.root, bindings)
}

/// Evaluate the subtree rooted at `index`.
pub fn evaluate_at<B: Bindings + ?Sized>(arena: &ExprArena, index: ExprIndex, bindings: &B) -> Value {
    Evaluator { arena, bindings }.eval(index)
}

/// Apply a binary operator to two already evaluated operands.
///
/// Logical operators are short-circuited by the evaluator before reaching
/// this point; here they just select an operand.
pub fn apply_binary(operator: SyntaxKind, left: &Value, right: &Value) -> Value {
    match operator {
        SyntaxKind::PlusToken => {
            let (left, right) = (left.to_primitive(), right.to_primitive());
            match (&left, &right) {
                (Value::Str(_), _) | (_, Value::Str(_)) => Value::Str(format!("{left}{right}")),
                _ => Value::Number(left.to_number() + right.to_number()),
            }
        }
        SyntaxKind::MinusToken => Value::Number(left.to_number() - right.to_number()),
        SyntaxKind::AsteriskToken => Value::Number(left.to_number() * right.to_number()),
        SyntaxKind::SlashToken => Value::Number(left.to_number() / right.to_number()),
        SyntaxKind::PercentToken => Value::Number(left.to_number() % right.to_number()),
        SyntaxKind::AsteriskAsteriskToken => {
            Value::Number(left.to_number().powf(right.to_number()))
        }
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken => Value::Bool(compare(operator, left, right)),
        SyntaxKind::EqualsEqualsToken => Value::Bool(left.loose_equals(right)),
        SyntaxKind::ExclamationEqualsToken => Value::Bool(!left.loose_equals(right)),
        SyntaxKind::EqualsEqualsEqualsToken => Value::Bool(left.strict_equals(right)),
        SyntaxKind::ExclamationEqualsEqualsToken => Value::Bool(!left.strict_equals(right)),
        SyntaxKind::AmpersandAmpersandToken => {
            if left.is_truthy() {
                right.clone()
            } else {
                left.clone()
            }
        }
        SyntaxKind::BarBarToken => {
            if left.is_truthy() {
                left.clone()
            } else {
                right.clone()
            }
        }
        _ => Value::Undefined,
    }
}

/// Relational comparison: strings compare lexicographically, everything
/// else numerically (any comparison involving NaN is false).
fn compare(operator: SyntaxKind, left: &Value, right: &Value) -> bool {
    let (left, right) = (left.to_primitive(), right.to_primitive());
    if let (Value::Str(a), Value::Str(b)) = (&left, &right) {
        return match operator {
            SyntaxKind::LessThanToken => a < b,
            SyntaxKind::GreaterThanToken => a > b,
            SyntaxKind::LessThanEqualsToken => a <= b,
            _ => a >= b,
        };
    }
    let (a, b) = (left.to_number(), right.to_number());
    match operator {
        SyntaxKind::LessThanToken => a < b,
        SyntaxKind::GreaterThanToken => a > b,
        SyntaxKind::LessThanEqualsToken => a <= b,
        _ => a >= b,
    }
}

/// Convert an element index to a vector position, if it names one.
pub fn array_position(index: &Value) -> Option<usize> {
    let n = index.to_primitive().to_number();
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 {
        Some(n as usize)
    } else {
        None
    }
}

struct Evaluator<'a, B: ?Sized> {
    arena: &'a ExprArena,
    bindings: &'a B,
}

impl<B: Bindings + ?Sized> Evaluator<'_, B> {
    fn eval(&self, index: ExprIndex) -> Value {
        let Some(node) = self.arena.get(index) else {
            return Value::Undefined;
        };
        match node {
            ExprNode::Number(n) => Value::Number(*n),
            ExprNode::Str(s) => Value::Str(s.clone()),
            ExprNode::Bool(b) => Value::Bool(*b),
            ExprNode::Identifier(name) => {
                self.bindings.lookup(name).cloned().unwrap_or_default()
            }
            ExprNode::Array(elements) => {
                Value::Array(elements.iter().map(|&element| self.eval(element)).collect())
            }
            ExprNode::Element { object, index } => {
                let object = self.eval(*object);
                let index = self.eval(*index);
                element_of(&object, &index)
            }
            ExprNode::Property { object, name } => {
                let object = self.eval(*object);
                property_of(&object, name)
            }
            ExprNode::Unary { operator, operand } => {
                let operand = self.eval(*operand);
                match operator {
                    SyntaxKind::ExclamationToken => Value::Bool(!operand.is_truthy()),
                    SyntaxKind::MinusToken => Value::Number(-operand.to_number()),
                    SyntaxKind::PlusToken => Value::Number(operand.to_number()),
                    _ => Value::Undefined,
                }
            }
            ExprNode::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.eval(*left);
                match operator {
                    SyntaxKind::AmpersandAmpersandToken if !left.is_truthy() => left,
                    SyntaxKind::BarBarToken if left.is_truthy() => left,
                    _ => {
                        let right = self.eval(*right);
                        apply_binary(*operator, &left, &right)
                    }
                }
            }
            ExprNode::Conditional {
                condition,
                when_true,
                when_false,
            } => {
                if self.eval(*condition).is_truthy() {
                    self.eval(*when_true)
                } else {
                    self.eval(*when_false)
                }
            }
            ExprNode::Assignment { value, .. } => self.eval(*value),
        }
    }
}

fn element_of(object: &Value, index: &Value) -> Value {
    let element = match (object, array_position(index)) {
        (Value::Array(elements), Some(position)) => elements.get(position).cloned(),
        (Value::Str(s), Some(position)) => {
            s.chars().nth(position).map(|ch| Value::Str(ch.to_string()))
        }
        _ => None,
    };
    match (element, index) {
        (Some(element), _) => element,
        (None, Value::Str(name)) => property_of(object, name),
        (None, _) => Value::Undefined,
    }
}

fn property_of(object: &Value, name: &str) -> Value {
    match (object, name) {
        (Value::Array(elements), "length") => Value::Number(elements.len() as f64),
        (Value::Str(s), "length") => Value::Number(s.chars().count() as f64),
        _ => Value::Undefined,
    }
}

#[cfg(test)]
#[path = "../tests/evaluate_tests.rs"]
mod tests;
