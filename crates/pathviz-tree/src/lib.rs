//! Statement trees for the pathviz analyzer.
//!
//! A statement tree is the branch-structured view of a program that the
//! annotator walks and the CFG builder compiles:
//! - `StatementNode` / `StatementKind` / `BranchRole` - the tree itself
//! - `ingest` - decoding the JSON emitted by the flow-tree builder
//! - `compact` - merging straight-line statements into display blocks

pub mod node;
pub use node::{BranchRole, StatementKind, StatementNode};

pub mod ingest;
pub use ingest::{TreeError, classify, from_json_str, from_json_value, select_function};

pub mod compact;
pub use compact::{compact, compact_program};
