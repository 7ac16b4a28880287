//! End-to-end tests: flow-tree JSON in, DOT out.

use pathviz::cfg::{EdgeTarget, RenderOptions};
use pathviz::expr::Value;
use pathviz::tree::from_json_str;
use pathviz::{AnalysisOptions, analyze, parse_inputs};

const INDEXED_TREE: &str = r#"{
    "type": "Program",
    "body": [
        {
            "type": "Function",
            "subType": "FunctionDeclaration",
            "name": "function fill(n)",
            "body": [
                { "type": "VariableDeclarator", "name": "let index = 0" },
                { "type": "VariableDeclarator", "name": "let out = []" },
                {
                    "type": "Loop",
                    "subType": "WhileStatement",
                    "name": "index < n",
                    "body": [
                        { "type": "AssignmentExpression", "name": "out[index] = index * index", "key": "body" },
                        { "type": "AssignmentExpression", "name": "index = index + 1", "key": "body" }
                    ]
                },
                { "type": "ReturnStatement", "name": "return out" }
            ]
        }
    ]
}"#;

const EARLY_RETURN_TREE: &str = r#"{
    "type": "Program",
    "body": [
        {
            "type": "Function",
            "subType": "FunctionDeclaration",
            "name": "function sign(v)",
            "body": [
                {
                    "type": "Conditional",
                    "subType": "IfStatement",
                    "name": "(v < 0)",
                    "body": [
                        { "type": "ReturnStatement", "name": "return -1", "key": "consequent" }
                    ]
                },
                { "type": "ReturnStatement", "name": "return 1" }
            ]
        }
    ]
}"#;

#[test]
fn test_loop_fills_array() {
    let tree = from_json_str(INDEXED_TREE).expect("flow tree");
    let analysis = analyze(&tree, parse_inputs("4").unwrap(), &AnalysisOptions::default())
        .expect("analysis");
    assert_eq!(
        analysis.annotation.bindings.get("out"),
        Some(&Value::from(vec![0, 1, 4, 9]))
    );
    assert!(analysis.annotation.truncated_loops.is_empty());

    let dot = analysis.graph.to_dot(&RenderOptions::default());
    let expected = [
        "digraph {",
        r##"    n0[label="~1~\nlet index = 0\nlet out = []", shape="box" style=filled fillcolor="#a9d18e"]"##,
        r##"    n1[label="~2~\nindex < n", shape="diamond" style=filled fillcolor="#a9d18e"]"##,
        r##"    n2[label="~3~\nout[index] = index * index\nindex = index + 1", shape="box" style=filled fillcolor="#a9d18e"]"##,
        r##"    n3[label="", shape="circle" style=filled fillcolor="#a9d18e"]"##,
        r##"    return[label="~4~\nreturn out", shape="box" style=filled fillcolor="#a9d18e"]"##,
    ];
    let lines: Vec<_> = dot.lines().collect();
    assert_eq!(&lines[..expected.len()], expected);
    for edge in [
        r#"    n0->n1[label=""]"#,
        r#"    n1->n2[label="T"]"#,
        r#"    n2->n1[label="\nwhile"]"#,
        r#"    n1->n3[label="F"]"#,
        "    n3->return []",
    ] {
        assert!(lines.contains(&edge), "missing {edge} in\n{dot}");
    }
    assert_eq!(lines.last(), Some(&"}"));
}

#[test]
fn test_loop_body_off_path_when_never_entered() {
    let tree = from_json_str(INDEXED_TREE).expect("flow tree");
    let analysis = analyze(&tree, parse_inputs("0").unwrap(), &AnalysisOptions::default())
        .expect("analysis");
    let graph = &analysis.graph;
    assert!(graph.nodes[1].in_path);
    assert!(!graph.nodes[2].in_path);
    assert_eq!(analysis.annotation.bindings.get("out"), Some(&Value::Array(Vec::new())));
}

#[test]
fn test_early_return_shares_one_terminal() {
    let tree = from_json_str(EARLY_RETURN_TREE).expect("flow tree");
    let analysis = analyze(&tree, parse_inputs("5").unwrap(), &AnalysisOptions::default())
        .expect("analysis");
    let graph = &analysis.graph;

    let terminal = graph.terminal.as_ref().expect("terminal");
    assert_eq!(terminal.label, "return -1");
    assert!(terminal.in_path);
    assert_eq!(graph.incoming(EdgeTarget::Terminal).count(), 2);

    // The early return's sink is off the taken path.
    let sinks: Vec<_> = graph.nodes.iter().filter(|node| node.label.is_empty()).collect();
    assert_eq!(sinks.len(), 2);
    assert!(!sinks[0].in_path);
    assert!(sinks[1].in_path);
}

#[test]
fn test_step_numbers_can_be_disabled() {
    let tree = from_json_str(EARLY_RETURN_TREE).expect("flow tree");
    let analysis = analyze(&tree, parse_inputs("-3").unwrap(), &AnalysisOptions::default())
        .expect("analysis");
    let options = RenderOptions {
        step_numbers: false,
        ..RenderOptions::default()
    };
    let nodes = analysis.graph.node_text(&options);
    assert!(!nodes.contains('~'), "{nodes}");
    assert!(nodes.contains(r#"n0[label="(v < 0)""#));
}

#[test]
fn test_truncated_loop_still_renders() {
    let tree = from_json_str(INDEXED_TREE).expect("flow tree");
    let mut options = AnalysisOptions::default();
    options.annotate.unroll_budget = 1;
    let analysis = analyze(&tree, parse_inputs("10").unwrap(), &options).expect("analysis");
    assert_eq!(analysis.annotation.truncated_loops.len(), 1);
    assert_eq!(analysis.annotation.truncated_loops[0].iterations, 2);
    assert_eq!(
        analysis.annotation.bindings.get("out"),
        Some(&Value::from(vec![0, 1]))
    );
    assert!(analysis.graph.nodes.iter().all(|node| node.in_path));
}
