use super::*;

fn run(root: &mut StatementNode, inputs: Vec<Value>) -> Annotation {
    annotate_program(root, inputs, &AnnotateOptions::default()).expect("annotation succeeds")
}

fn if_else_if_function() -> StatementNode {
    StatementNode::function(
        "function foo(a, b, c)",
        vec![
            StatementNode::assignment("let x = a + 1"),
            StatementNode::assignment("let y = x + b"),
            StatementNode::assignment("let z = 0"),
            StatementNode::conditional(
                "(y < c)",
                vec![StatementNode::assignment("z = z + 5")],
                vec![StatementNode::conditional(
                    "(y < c * 2)",
                    vec![StatementNode::assignment("z = z + a + 5")],
                    vec![StatementNode::assignment("z = z + c + 5")],
                )],
            ),
            StatementNode::return_statement("return z"),
        ],
    )
}

fn all_in_path(node: &StatementNode) -> bool {
    let mut all = true;
    node.walk(&mut |n| all &= n.in_path);
    all
}

#[test]
fn test_parameter_names() {
    assert_eq!(parameter_names("function foo(a, b, c)"), ["a", "b", "c"]);
    assert_eq!(parameter_names("function fun()"), Vec::<&str>::new());
    assert_eq!(parameter_names("function f( $x,_y )"), ["$x", "_y"]);
    assert_eq!(parameter_names("function f"), Vec::<&str>::new());
}

#[test]
fn test_single_declaration_without_inputs() {
    let mut root = StatementNode::program(vec![StatementNode::assignment("let x = 0")]);
    let annotation = run(&mut root, Vec::new());
    assert!(root.children[0].in_path);
    assert_eq!(annotation.bindings.len(), 1);
    assert_eq!(annotation.bindings.get("x"), Some(&Value::from(0)));
}

#[test]
fn test_inputs_bind_parameters_in_order() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function fun(a, b, c)",
        Vec::new(),
    )]);
    let annotation = run(&mut root, vec![Value::from(1), Value::from(2), Value::from(3)]);
    let bound: Vec<_> = annotation
        .bindings
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();
    assert_eq!(
        bound,
        [("a", Value::from(1)), ("b", Value::from(2)), ("c", Value::from(3))]
    );
}

#[test]
fn test_straight_line_code_is_fully_in_path() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function f(a)",
        vec![
            StatementNode::assignment("let b = a * 2"),
            StatementNode::statement("b"),
            StatementNode::assignment("b += 1"),
            StatementNode::return_statement("return b"),
        ],
    )]);
    let annotation = run(&mut root, vec![Value::from(4)]);
    assert!(all_in_path(&root));
    assert_eq!(annotation.bindings.get("b"), Some(&Value::from(9)));
}

#[test]
fn test_true_condition_takes_consequent_only() {
    let mut root = StatementNode::program(vec![if_else_if_function()]);
    let annotation = run(&mut root, vec![Value::from(0), Value::from(0), Value::from(3)]);
    let conditional = &root.children[0].children[3];
    assert!(conditional.in_path);
    assert!(conditional.children[0].in_path, "consequent taken");
    let nested = &conditional.children[1];
    assert!(!nested.in_path, "alternate skipped");
    assert!(nested.children.iter().all(|child| !child.in_path));
    assert_eq!(annotation.bindings.get("z"), Some(&Value::from(5)));
}

#[test]
fn test_else_if_chain_with_y_one_c_three() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function foo(y, c)",
        vec![
            StatementNode::conditional(
                "(y < c)",
                vec![StatementNode::statement("first")],
                vec![StatementNode::conditional(
                    "(y < c * 2)",
                    vec![StatementNode::statement("second")],
                    vec![StatementNode::statement("third")],
                )],
            ),
        ],
    )]);
    run(&mut root, vec![Value::from(1), Value::from(3)]);
    let conditional = &root.children[0].children[0];
    assert!(conditional.children[0].in_path);
    assert!(!conditional.children[1].in_path);
    assert!(!conditional.children[1].children[0].in_path);
    assert!(!conditional.children[1].children[1].in_path);
}

#[test]
fn test_false_condition_takes_nested_alternate() {
    let mut root = StatementNode::program(vec![if_else_if_function()]);
    let annotation = run(&mut root, vec![Value::from(1), Value::from(1), Value::from(2)]);
    let function = &root.children[0];
    assert!(function.children.iter().all(|child| child.in_path));
    let conditional = &function.children[3];
    assert!(!conditional.children[0].in_path);
    let nested = &conditional.children[1];
    assert!(nested.in_path);
    assert!(nested.children[0].in_path);
    assert!(!nested.children[1].in_path);
    // 0 + a + 5, written in the nested branch and propagated to the root.
    assert_eq!(annotation.bindings.get("z"), Some(&Value::from(6)));
}

#[test]
fn test_indexed_writes_follow_javascript_coercion() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function fun(a, b, c)",
        vec![
            StatementNode::assignment("let x = a + 1"),
            StatementNode::assignment("let y = x + b"),
            StatementNode::assignment("let z = [0]"),
            StatementNode::conditional(
                "(y < c)",
                vec![StatementNode::assignment("z[0] = z + 5")],
                vec![StatementNode::conditional(
                    "(y < c * 2)",
                    vec![StatementNode::assignment("z[0] = z + a + 5")],
                    vec![StatementNode::assignment("z[0] = z + c + 5")],
                )],
            ),
            StatementNode::return_statement("return z"),
        ],
    )]);
    let annotation = run(&mut root, vec![Value::from(1), Value::from(1), Value::from(2)]);
    assert_eq!(
        annotation.bindings.get("z"),
        Some(&Value::Array(vec![Value::from("015")]))
    );
}

#[test]
fn test_indexed_write_to_non_array_fails() {
    let mut root = StatementNode::program(vec![
        StatementNode::assignment("a=1"),
        StatementNode::assignment("a[0] = 1"),
    ]);
    let err = annotate_program(&mut root, Vec::new(), &AnnotateOptions::default())
        .expect_err("number is not an array");
    assert!(matches!(err, AnnotateError::InvalidIndexTarget { .. }), "{err}");
}

#[test]
fn test_indexed_write_to_array() {
    let mut root = StatementNode::program(vec![
        StatementNode::assignment("let array = []"),
        StatementNode::assignment("array[0] = 1"),
    ]);
    let annotation = run(&mut root, Vec::new());
    assert_eq!(annotation.bindings.get("array"), Some(&Value::from(vec![1])));
}

#[test]
fn test_while_loop_runs_to_completion() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function fun(a)",
        vec![
            StatementNode::assignment("let index = 1"),
            StatementNode::while_loop("index<a", vec![StatementNode::assignment("index = index+1")]),
            StatementNode::conditional("index==a", vec![StatementNode::statement("a")], Vec::new()),
            StatementNode::return_statement("return index"),
        ],
    )]);
    let annotation = run(&mut root, vec![Value::from(10)]);
    let function = &root.children[0];
    assert!(function.children.iter().all(|child| child.in_path));
    assert!(function.children[1].children[0].in_path);
    assert!(function.children[2].children[0].in_path);
    assert_eq!(annotation.bindings.get("index"), Some(&Value::from(10)));
    assert!(annotation.truncated_loops.is_empty());
}

#[test]
fn test_false_loop_condition_marks_only_the_loop() {
    let mut root = StatementNode::program(vec![StatementNode::while_loop(
        "false",
        vec![StatementNode::statement("never")],
    )]);
    run(&mut root, Vec::new());
    assert!(root.children[0].in_path);
    assert!(!root.children[0].children[0].in_path);
}

#[test]
fn test_infinite_loop_is_truncated() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function spin(a)",
        vec![
            StatementNode::while_loop("true", vec![StatementNode::assignment("a = a + 1")]),
            StatementNode::return_statement("return a"),
        ],
    )]);
    let annotation = run(&mut root, vec![Value::from(0)]);
    assert_eq!(
        annotation.truncated_loops,
        [TruncatedLoop {
            condition: "true".to_string(),
            iterations: 21,
            truncations: 1,
        }]
    );
    assert_eq!(annotation.bindings.get("a"), Some(&Value::from(21)));
    assert!(root.children[0].children[1].in_path, "code after the loop still runs");
}

#[test]
fn test_nested_infinite_loops_terminate() {
    let mut root = StatementNode::program(vec![
        StatementNode::assignment("let n = 0"),
        StatementNode::while_loop(
            "true",
            vec![StatementNode::while_loop(
                "1",
                vec![StatementNode::assignment("n += 1")],
            )],
        ),
    ]);
    let options = AnnotateOptions {
        unroll_budget: 3,
        ..AnnotateOptions::default()
    };
    let annotation = annotate_program(&mut root, Vec::new(), &options).expect("terminates");
    // Outer loop: 4 iterations. The inner loop gets whatever budget the
    // outer loop has left: 4, 3, 2 and 1 iterations.
    assert_eq!(annotation.bindings.get("n"), Some(&Value::from(10)));
    assert_eq!(
        annotation.truncated_loops,
        [
            TruncatedLoop {
                condition: "1".to_string(),
                iterations: 4,
                truncations: 4,
            },
            TruncatedLoop {
                condition: "true".to_string(),
                iterations: 4,
                truncations: 1,
            },
        ]
    );
}

#[test]
fn test_loop_ending_on_last_budgeted_iteration_is_not_truncated() {
    let counting_to = |limit: u32| {
        StatementNode::program(vec![
            StatementNode::assignment("let i = 0"),
            StatementNode::while_loop(format!("i < {limit}"), vec![StatementNode::assignment("i += 1")]),
        ])
    };

    // Budget 20 allows 21 iterations; the condition fails on the next test.
    let mut root = counting_to(21);
    let annotation = run(&mut root, Vec::new());
    assert!(annotation.truncated_loops.is_empty());
    assert_eq!(annotation.bindings.get("i"), Some(&Value::from(21)));

    let mut root = counting_to(22);
    let annotation = run(&mut root, Vec::new());
    assert_eq!(annotation.truncated_loops.len(), 1);
    assert_eq!(annotation.truncated_loops[0].iterations, 21);
    assert_eq!(annotation.bindings.get("i"), Some(&Value::from(21)));
}

/// `depth` nested `while (true)` loops around `x = x + 1`.
fn nested_spin(depth: usize) -> StatementNode {
    let mut body = vec![StatementNode::assignment("x = x + 1")];
    for _ in 0..depth {
        body = vec![StatementNode::while_loop("true", body)];
    }
    let mut program = vec![StatementNode::assignment("let x = 0")];
    program.extend(body);
    StatementNode::program(program)
}

#[test]
fn test_total_loop_iterations_are_capped() {
    let mut root = nested_spin(8);
    let options = AnnotateOptions {
        max_loop_iterations: 1000,
        ..AnnotateOptions::default()
    };
    let annotation = annotate_program(&mut root, Vec::new(), &options).expect("terminates");
    let x = annotation
        .bindings
        .get("x")
        .and_then(Value::as_number)
        .expect("x is a number");
    assert!(x > 0.0 && x <= 1000.0, "x = {x}");
    // One entry per loop statement, not per truncated execution.
    assert_eq!(annotation.truncated_loops.len(), 8);
    assert!(annotation.truncated_loops.iter().all(|truncated| truncated.condition == "true"));
}

#[test]
fn test_deeply_nested_infinite_loops_finish_with_defaults() {
    let mut root = nested_spin(12);
    let annotation = run(&mut root, Vec::new());
    let x = annotation
        .bindings
        .get("x")
        .and_then(Value::as_number)
        .expect("x is a number");
    assert!(x <= MAX_LOOP_ITERATIONS as f64, "x = {x}");
    assert_eq!(annotation.truncated_loops.len(), 12);
}

#[test]
fn test_budget_is_restored_between_loops() {
    let loop_to = |limit: u32| {
        StatementNode::while_loop(format!("i < {limit}"), vec![StatementNode::assignment("i += 1")])
    };
    let mut root = StatementNode::program(vec![
        StatementNode::assignment("let i = 0"),
        loop_to(15),
        StatementNode::assignment("i = 0"),
        loop_to(15),
    ]);
    let annotation = run(&mut root, Vec::new());
    assert!(annotation.truncated_loops.is_empty());
    assert_eq!(annotation.bindings.get("i"), Some(&Value::from(15)));
}

#[test]
fn test_missing_inputs_bind_undefined() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function fun(a, b)",
        vec![StatementNode::conditional("(b < a)", vec![StatementNode::statement("a")], Vec::new())],
    )]);
    let annotation = run(&mut root, vec![Value::from(1)]);
    assert_eq!(annotation.bindings.get("b"), Some(&Value::Undefined));
    assert!(!root.children[0].children[0].children[0].in_path);
}

#[test]
fn test_strict_inputs_reject_underflow() {
    let mut root = StatementNode::program(vec![StatementNode::function(
        "function fun(a, b)",
        Vec::new(),
    )]);
    let options = AnnotateOptions {
        strict_inputs: true,
        ..AnnotateOptions::default()
    };
    let err = annotate_program(&mut root, vec![Value::from(1)], &options).expect_err("underflow");
    assert_eq!(
        err,
        AnnotateError::UnderflowInput {
            function: "fun".to_string(),
            parameter: "b".to_string(),
        }
    );
}

#[test]
fn test_bare_declaration_binds_undefined() {
    let mut root = StatementNode::program(vec![StatementNode::assignment("let x")]);
    let annotation = run(&mut root, Vec::new());
    assert_eq!(annotation.bindings.get("x"), Some(&Value::Undefined));
}

#[test]
fn test_branch_locals_do_not_leak() {
    let mut root = StatementNode::program(vec![StatementNode::conditional(
        "true",
        vec![StatementNode::assignment("let t = 1")],
        Vec::new(),
    )]);
    let annotation = run(&mut root, Vec::new());
    assert!(annotation.bindings.get("t").is_none());
}

#[test]
fn test_malformed_condition_propagates() {
    let mut root = StatementNode::program(vec![StatementNode::conditional(
        "(a <",
        Vec::new(),
        Vec::new(),
    )]);
    let err = annotate_program(&mut root, Vec::new(), &AnnotateOptions::default())
        .expect_err("malformed");
    assert!(matches!(err, AnnotateError::MalformedExpression(_)));
}

#[test]
fn test_non_assignment_text_is_rejected() {
    for text in ["x", "1 = 2", "f.x = 1", "a[0][1] = 2"] {
        let mut root = StatementNode::program(vec![StatementNode::assignment(text)]);
        let err = annotate_program(&mut root, Vec::new(), &AnnotateOptions::default())
            .expect_err(text);
        assert_eq!(
            err,
            AnnotateError::InvalidAssignment {
                text: text.to_string()
            }
        );
    }
}

#[test]
fn test_depth_limit() {
    let mut node = StatementNode::statement("leaf");
    for _ in 0..10 {
        node = StatementNode::conditional("true", vec![node], Vec::new());
    }
    let mut root = StatementNode::program(vec![node]);
    let options = AnnotateOptions {
        max_depth: 5,
        ..AnnotateOptions::default()
    };
    let err = annotate_program(&mut root, Vec::new(), &options).expect_err("too deep");
    assert_eq!(err, AnnotateError::DepthExceeded { limit: 5 });
    assert!(annotate_program(&mut root, Vec::new(), &AnnotateOptions::default()).is_ok());
}

#[test]
fn test_annotation_serializes_bindings_in_order() {
    let mut root = StatementNode::program(vec![
        StatementNode::assignment("let b = 2"),
        StatementNode::assignment("let a = [1, 2]"),
    ]);
    let annotation = run(&mut root, Vec::new());
    let json = serde_json::to_string(&annotation).unwrap();
    assert_eq!(json, r#"{"bindings":{"b":2,"a":[1,2]},"truncatedLoops":[]}"#);
}
