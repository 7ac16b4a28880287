use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::cli::args::CliArgs;
use pathviz_annotator::AnnotateOptions;
use pathviz_cfg::RenderOptions;
use pathviz_common::limits::{DEFAULT_UNROLL_BUDGET, MAX_ANNOTATION_DEPTH, MAX_LOOP_ITERATIONS};
use pathviz_common::{IN_PATH_FILL, OFF_PATH_FILL};

pub const CONFIG_FILE_NAME: &str = "pathviz.json";

/// Custom deserializer for boolean options that accepts both bool and string values,
/// so `"strictInputs": "yes"` works as well as `"strictInputs": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Contents of `pathviz.json`. Every key is optional.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PathvizConfig {
    #[serde(default)]
    pub unroll_budget: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict_inputs: Option<bool>,
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub max_loop_iterations: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub step_numbers: Option<bool>,
    #[serde(default)]
    pub palette: Option<Palette>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    #[serde(default)]
    pub in_path: Option<String>,
    #[serde(default)]
    pub off_path: Option<String>,
}

/// Options after merging defaults, the config file and CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub unroll_budget: u32,
    pub strict_inputs: bool,
    pub max_depth: u32,
    pub max_loop_iterations: u64,
    pub render: RenderOptions,
}

impl ResolvedSettings {
    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            unroll_budget: self.unroll_budget,
            strict_inputs: self.strict_inputs,
            max_depth: self.max_depth,
            max_loop_iterations: self.max_loop_iterations,
        }
    }
}

pub fn parse_config(source: &str) -> Result<PathvizConfig> {
    serde_json::from_str(source).context("failed to parse pathviz config")
}

pub fn load_config(path: &Path) -> Result<PathvizConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("in {}", path.display()))
}

/// The explicit `--config` path, or `pathviz.json` in `cwd` if it exists.
pub fn find_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(cwd.join(path)),
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        }
    }
}

/// Merge: CLI flags win over the config file, which wins over defaults.
pub fn resolve_settings(config: &PathvizConfig, args: &CliArgs) -> ResolvedSettings {
    let palette = config.palette.clone().unwrap_or_default();
    ResolvedSettings {
        unroll_budget: args
            .unroll_budget
            .or(config.unroll_budget)
            .unwrap_or(DEFAULT_UNROLL_BUDGET),
        strict_inputs: args.strict_inputs || config.strict_inputs.unwrap_or(false),
        max_depth: config.max_depth.unwrap_or(MAX_ANNOTATION_DEPTH),
        max_loop_iterations: config.max_loop_iterations.unwrap_or(MAX_LOOP_ITERATIONS),
        render: RenderOptions {
            step_numbers: !args.no_step_numbers && config.step_numbers.unwrap_or(true),
            in_path_fill: palette.in_path.unwrap_or_else(|| IN_PATH_FILL.to_string()),
            off_path_fill: palette.off_path.unwrap_or_else(|| OFF_PATH_FILL.to_string()),
        },
    }
}
