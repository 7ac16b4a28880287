//! Path annotation for the pathviz analyzer.
//!
//! Executes a statement tree under one concrete input vector and marks every
//! statement that input reaches as in-path.
//! - `Environment` - the arena of chained variable scopes
//! - `PathAnnotator` - the interpreter and its per-call state
//! - `annotate_program` - the entry point most callers want

pub mod error;
pub use error::AnnotateError;

pub mod environment;
pub use environment::{Environment, RootBindings, ScopeId, ScopeView};

pub mod annotator;
pub use annotator::{
    AnnotateOptions, Annotation, PathAnnotator, TruncatedLoop, annotate_program, parameter_names,
};
