use super::args::CliArgs;
use super::config::*;
use clap::Parser;
use pathviz_common::limits::{DEFAULT_UNROLL_BUDGET, MAX_ANNOTATION_DEPTH, MAX_LOOP_ITERATIONS};
use pathviz_common::{IN_PATH_FILL, OFF_PATH_FILL};

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["pathviz", "tree.json"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).expect("parse")
}

#[test]
fn parse_empty_config() {
    let config = parse_config("{}").expect("parse");
    assert_eq!(config, PathvizConfig::default());
}

#[test]
fn parse_full_config() {
    let config = parse_config(
        r##"{
            "unrollBudget": 4,
            "strictInputs": true,
            "maxDepth": 64,
            "maxLoopIterations": 5000,
            "stepNumbers": false,
            "palette": { "inPath": "#ff0000", "offPath": "#eeeeee" }
        }"##,
    )
    .expect("parse");
    assert_eq!(config.unroll_budget, Some(4));
    assert_eq!(config.strict_inputs, Some(true));
    assert_eq!(config.max_depth, Some(64));
    assert_eq!(config.max_loop_iterations, Some(5000));
    assert_eq!(config.step_numbers, Some(false));
    let palette = config.palette.expect("palette");
    assert_eq!(palette.in_path.as_deref(), Some("#ff0000"));
    assert_eq!(palette.off_path.as_deref(), Some("#eeeeee"));
}

#[test]
fn parse_bool_from_string() {
    let config = parse_config(r#"{"strictInputs": "yes", "stepNumbers": "off"}"#).expect("parse");
    assert_eq!(config.strict_inputs, Some(true));
    assert_eq!(config.step_numbers, Some(false));
}

#[test]
fn parse_rejects_bad_bool_string() {
    let err = parse_config(r#"{"strictInputs": "maybe"}"#).expect_err("invalid bool");
    let chain = format!("{err:#}");
    assert!(chain.contains("invalid boolean value"), "{chain}");
}

#[test]
fn resolve_defaults() {
    let settings = resolve_settings(&PathvizConfig::default(), &args(&[]));
    assert_eq!(settings.unroll_budget, DEFAULT_UNROLL_BUDGET);
    assert!(!settings.strict_inputs);
    assert_eq!(settings.max_depth, MAX_ANNOTATION_DEPTH);
    assert_eq!(settings.max_loop_iterations, MAX_LOOP_ITERATIONS);
    assert!(settings.render.step_numbers);
    assert_eq!(settings.render.in_path_fill, IN_PATH_FILL);
    assert_eq!(settings.render.off_path_fill, OFF_PATH_FILL);
}

#[test]
fn cli_flags_override_config() {
    let config = PathvizConfig {
        unroll_budget: Some(3),
        strict_inputs: Some(false),
        step_numbers: Some(true),
        ..PathvizConfig::default()
    };
    let settings = resolve_settings(
        &config,
        &args(&["--unroll-budget", "7", "--strict-inputs", "--no-step-numbers"]),
    );
    assert_eq!(settings.unroll_budget, 7);
    assert!(settings.strict_inputs);
    assert!(!settings.render.step_numbers);

    let settings = resolve_settings(&config, &args(&[]));
    assert_eq!(settings.unroll_budget, 3);

    let options = settings.annotate_options();
    assert_eq!(options.unroll_budget, 3);
    assert_eq!(options.max_depth, MAX_ANNOTATION_DEPTH);
    assert_eq!(options.max_loop_iterations, MAX_LOOP_ITERATIONS);
}

#[test]
fn find_config_prefers_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert_eq!(find_config(None, dir.path()), None);

    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").expect("write");
    assert_eq!(
        find_config(None, dir.path()),
        Some(dir.path().join(CONFIG_FILE_NAME))
    );

    let explicit = std::path::Path::new("other.json");
    assert_eq!(
        find_config(Some(explicit), dir.path()),
        Some(dir.path().join("other.json"))
    );
}

#[test]
fn load_config_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, r#"{"unrollBudget": "many"}"#).expect("write");
    let err = load_config(&path).expect_err("bad budget");
    assert!(err.to_string().contains(CONFIG_FILE_NAME), "{err}");

    let missing = load_config(&dir.path().join("missing.json")).expect_err("missing");
    assert!(missing.to_string().starts_with("failed to read config"));
}
