//! Expression engine for the pathviz analyzer.
//!
//! Statement trees carry their conditions and assignments as source text.
//! This crate turns that text into values:
//! - `SyntaxKind` / `ScannerState` - tokens and the tokenizer
//! - `ParserState` - precedence-climbing parser producing an `ExprArena`
//! - `Value` - the runtime values the annotator tracks
//! - `evaluate` - evaluation against any `Bindings` implementation

pub mod scanner;
pub use scanner::{ScannerState, SyntaxKind};

pub mod node;
pub use node::{ExprArena, ExprIndex, ExprNode, TextRange};

pub mod parser;
pub use parser::{ParseError, ParsedExpression, ParserState, parse_assignment, parse_expression};

pub mod value;
pub use value::Value;

pub mod evaluate;
pub use evaluate::{Bindings, apply_binary, array_position, evaluate, evaluate_at};
