use super::args::{CliArgs, EmitKind};
use clap::Parser;
use std::path::Path;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["pathviz", "tree.json"]).expect("parse");
    assert_eq!(args.tree, Path::new("tree.json"));
    assert_eq!(args.input, "");
    assert_eq!(args.emit, EmitKind::Dot);
    assert!(args.batch.is_none());
    assert!(args.function.is_none());
    assert!(args.unroll_budget.is_none());
    assert!(!args.strict_inputs);
    assert!(!args.no_step_numbers);
    assert!(!args.reads_stdin());
}

#[test]
fn parses_all_flags() {
    let args = CliArgs::try_parse_from([
        "pathviz",
        "-",
        "--input",
        "1, [2, 3], \"x\"",
        "--emit",
        "env",
        "--function",
        "foo",
        "--unroll-budget",
        "5",
        "--strict-inputs",
        "--no-step-numbers",
        "--out",
        "graph.dot",
        "--pretty",
        "--no-color",
    ])
    .expect("parse");
    assert!(args.reads_stdin());
    assert_eq!(args.input, "1, [2, 3], \"x\"");
    assert_eq!(args.emit, EmitKind::Env);
    assert_eq!(args.function.as_deref(), Some("foo"));
    assert_eq!(args.unroll_budget, Some(5));
    assert!(args.strict_inputs);
    assert!(args.no_step_numbers);
    assert_eq!(args.out.as_deref(), Some(Path::new("graph.dot")));
    assert!(args.pretty);
    assert!(args.no_color);
}

#[test]
fn batch_conflicts_with_input() {
    let result =
        CliArgs::try_parse_from(["pathviz", "tree.json", "-i", "1", "--batch", "inputs.json"]);
    assert!(result.is_err());
}

#[test]
fn rejects_unknown_emit_kind() {
    assert!(CliArgs::try_parse_from(["pathviz", "tree.json", "--emit", "svg"]).is_err());
}

#[test]
fn json_emit_kinds() {
    assert!(EmitKind::Tree.is_json());
    assert!(EmitKind::Env.is_json());
    assert!(!EmitKind::Dot.is_json());
    assert!(!EmitKind::Nodes.is_json());
    assert!(!EmitKind::Edges.is_json());
}
