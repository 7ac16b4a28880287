use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the pathviz binary.
#[derive(Parser, Debug)]
#[command(
    name = "pathviz",
    version,
    about = "Highlight the path one input takes through a program's control-flow graph"
)]
pub struct CliArgs {
    /// Flow-tree JSON file, or `-` to read it from stdin.
    #[arg(value_name = "TREE")]
    pub tree: PathBuf,

    /// Input vector as a comma-separated list of JSON values, e.g. "1, [2, 3]".
    #[arg(short = 'i', long, default_value = "")]
    pub input: String,

    /// JSON file holding an array of input vectors to analyze in parallel.
    #[arg(long, conflicts_with = "input")]
    pub batch: Option<PathBuf>,

    /// What to print.
    #[arg(short = 'e', long, value_enum, default_value_t = EmitKind::Dot)]
    pub emit: EmitKind,

    /// Function to graph; defaults to the first top-level function.
    #[arg(short = 'f', long)]
    pub function: Option<String>,

    /// Path to pathviz.json; defaults to ./pathviz.json when present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Extra loop iterations to execute before truncating a loop.
    #[arg(long = "unroll-budget")]
    pub unroll_budget: Option<u32>,

    /// Fail instead of binding `undefined` when inputs run out.
    #[arg(long = "strict-inputs")]
    pub strict_inputs: bool,

    /// Omit `~step~` prefixes from node labels.
    #[arg(long = "no-step-numbers")]
    pub no_step_numbers: bool,

    /// Write output to a file instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored error output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EmitKind {
    /// A complete `digraph { ... }`.
    Dot,
    /// DOT node statements only.
    Nodes,
    /// DOT edge statements only.
    Edges,
    /// The annotated, compacted statement tree as JSON.
    Tree,
    /// Final root bindings and truncated loops as JSON.
    Env,
}

impl EmitKind {
    pub const fn is_json(self) -> bool {
        matches!(self, EmitKind::Tree | EmitKind::Env)
    }
}

impl CliArgs {
    pub fn reads_stdin(&self) -> bool {
        self.tree.as_os_str() == "-"
    }
}
