use anyhow::{Context, Result};
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::analysis::{Analysis, AnalysisOptions, analyze, parse_inputs};
use crate::cli::args::{CliArgs, EmitKind};
use crate::cli::config::{
    PathvizConfig, ResolvedSettings, find_config, load_config, resolve_settings,
};
use pathviz_annotator::TruncatedLoop;
use pathviz_expr::Value;
use pathviz_tree::{StatementNode, from_json_str};

/// Outcome of one CLI invocation.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub output: String,
    pub analyses: usize,
    pub truncated_loops: Vec<TruncatedLoop>,
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let config = match find_config(args.config.as_deref(), cwd) {
        Some(path) => load_config(&path)?,
        None => PathvizConfig::default(),
    };
    let settings = resolve_settings(&config, args);

    let tree = read_tree(args, cwd)?;
    let vectors = input_vectors(args, cwd)?;
    let options = AnalysisOptions {
        annotate: settings.annotate_options(),
        function: args.function.clone(),
    };

    let analyses = analyze_all(&tree, vectors, &options)?;
    let output = render(&analyses, args.emit, &settings, args.batch.is_some(), args.pretty)?;
    let truncated_loops: Vec<_> = analyses
        .iter()
        .flat_map(|analysis| analysis.annotation.truncated_loops.iter().cloned())
        .collect();
    info!(
        analyses = analyses.len(),
        truncated_loops = truncated_loops.len(),
        "run complete"
    );

    Ok(RunResult {
        output,
        analyses: analyses.len(),
        truncated_loops,
    })
}

fn read_tree(args: &CliArgs, cwd: &Path) -> Result<StatementNode> {
    let source = if args.reads_stdin() {
        std::io::read_to_string(std::io::stdin()).context("failed to read flow tree from stdin")?
    } else {
        let path = cwd.join(&args.tree);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read flow tree: {}", path.display()))?
    };
    from_json_str(&source).context("failed to load flow tree")
}

/// The input vectors to analyze: the batch file's entries, or the single
/// `--input` vector.
pub fn input_vectors(args: &CliArgs, cwd: &Path) -> Result<Vec<Vec<Value>>> {
    match &args.batch {
        Some(path) => {
            let path = cwd.join(path);
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read batch file: {}", path.display()))?;
            parse_batch(&source).with_context(|| format!("in {}", path.display()))
        }
        None => {
            let inputs = parse_inputs(&args.input)
                .with_context(|| format!("invalid input vector `{}`", args.input))?;
            Ok(vec![inputs])
        }
    }
}

/// A batch file is a JSON array whose entries are input vectors; a non-array
/// entry is a vector of one value.
pub fn parse_batch(source: &str) -> Result<Vec<Vec<Value>>> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(source).context("batch file must hold a JSON array")?;
    Ok(entries
        .iter()
        .map(|entry| match entry {
            serde_json::Value::Array(values) => values.iter().map(Value::from_json).collect(),
            single => vec![Value::from_json(single)],
        })
        .collect())
}

/// Analyze every vector in parallel. Results keep the order of `vectors`.
pub fn analyze_all(
    tree: &StatementNode,
    vectors: Vec<Vec<Value>>,
    options: &AnalysisOptions,
) -> Result<Vec<Analysis>> {
    vectors
        .into_par_iter()
        .map(|inputs| {
            let shown = serde_json::to_string(&inputs).unwrap_or_default();
            analyze(tree, inputs, options)
                .with_context(|| format!("analysis failed for input {shown}"))
        })
        .collect()
}

pub fn render(
    analyses: &[Analysis],
    emit: EmitKind,
    settings: &ResolvedSettings,
    batch: bool,
    pretty: bool,
) -> Result<String> {
    if emit.is_json() {
        let mut values = analyses
            .iter()
            .map(|analysis| match emit {
                EmitKind::Tree => serde_json::to_value(&analysis.tree),
                _ => serde_json::to_value(&analysis.annotation),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let value = if !batch && values.len() == 1 {
            values.remove(0)
        } else {
            serde_json::Value::Array(values)
        };
        let mut text = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        text.push('\n');
        return Ok(text);
    }

    let rendered: Vec<String> = analyses
        .iter()
        .map(|analysis| match emit {
            EmitKind::Nodes => analysis.graph.node_text(&settings.render),
            EmitKind::Edges => analysis.graph.edge_text(),
            _ => analysis.graph.to_dot(&settings.render),
        })
        .collect();
    Ok(rendered.join("\n"))
}

/// Write `output` to `--out`, or to stdout.
pub fn write_output(args: &CliArgs, cwd: &Path, output: &str) -> Result<()> {
    match &args.out {
        Some(path) => {
            let path = cwd.join(path);
            std::fs::write(&path, output)
                .with_context(|| format!("failed to write output: {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write output")
        }
    }
}
