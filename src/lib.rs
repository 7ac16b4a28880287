//! pathviz: input-driven path annotation and control-flow graph synthesis.
//!
//! Given a statement tree produced by a flow-tree builder and one concrete
//! input vector, pathviz marks the statements that input executes and
//! compiles the tree into a DOT control-flow graph with the executed path
//! highlighted.
//!
//! The work is split across the workspace crates, re-exported here:
//! - `expr` - expression scanner, parser and evaluator
//! - `tree` - statement trees, ingestion and compaction
//! - `annotator` - the environment chain and path annotator
//! - `cfg` - node numbering, edge synthesis and DOT rendering
//!
//! `analysis` ties them into one pipeline; `cli` drives it from the command
//! line.

pub use pathviz_annotator as annotator;
pub use pathviz_cfg as cfg;
pub use pathviz_common as common;
pub use pathviz_expr as expr;
pub use pathviz_tree as tree;

pub mod analysis;
pub use analysis::{Analysis, AnalysisError, AnalysisOptions, analyze, parse_inputs};

#[cfg(feature = "cli")]
pub mod cli;

pub mod tracing_config;
