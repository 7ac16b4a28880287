//! The end-to-end pipeline: annotate, compact, select, build.

use pathviz_annotator::{AnnotateError, AnnotateOptions, Annotation, annotate_program};
use pathviz_cfg::{ControlFlowGraph, build_cfg};
use pathviz_expr::Value;
use pathviz_tree::{StatementNode, TreeError, compact_program, select_function};
use thiserror::Error;
use tracing::{debug, info_span};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Annotate(#[from] AnnotateError),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

#[derive(Clone, Debug, Default)]
pub struct AnalysisOptions {
    pub annotate: AnnotateOptions,
    /// Function to graph; the first top-level function when unset.
    pub function: Option<String>,
}

/// Everything one analysis run produces.
#[derive(Clone, Debug)]
pub struct Analysis {
    /// The annotated and compacted tree.
    pub tree: StatementNode,
    pub annotation: Annotation,
    pub graph: ControlFlowGraph,
}

/// Analyze `tree` under `inputs`. The caller's tree is left untouched.
pub fn analyze(
    tree: &StatementNode,
    inputs: Vec<Value>,
    options: &AnalysisOptions,
) -> Result<Analysis, AnalysisError> {
    let _span = info_span!("analyze", inputs = inputs.len()).entered();

    let mut tree = tree.clone();
    let annotation = annotate_program(&mut tree, inputs, &options.annotate)?;
    compact_program(&mut tree);
    let graph = build_cfg(select_function(&tree, options.function.as_deref())?);
    debug!(
        truncated_loops = annotation.truncated_loops.len(),
        "analysis complete"
    );

    Ok(Analysis {
        tree,
        annotation,
        graph,
    })
}

/// Parse an input vector as typed by a user: a comma-separated list of JSON
/// values, without the surrounding brackets.
pub fn parse_inputs(text: &str) -> Result<Vec<Value>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(&format!("[{text}]"))?;
    Ok(values.iter().map(Value::from_json).collect())
}

#[cfg(test)]
#[path = "tests/analysis_tests.rs"]
mod tests;
