//! Logging setup for the pathviz binary.
//!
//! Logging is off unless `PATHVIZ_LOG` (or `RUST_LOG`) holds filter
//! directives. `PATHVIZ_LOG_FORMAT` picks the output:
//!
//! - `text` (default): flat lines from `tracing-subscriber`
//! - `tree`: spans nested under the `analyze` span via `tracing-tree`, the
//!   easiest way to follow one input through branches and loop iterations
//! - `json`: one JSON object per event, for batch runs fed to other tools
//!
//! ```bash
//! # Branch decisions, loop exits and truncations
//! PATHVIZ_LOG=debug pathviz tree.json --input "1, 2, 3"
//!
//! # Every write, grouped per analysis
//! PATHVIZ_LOG=trace PATHVIZ_LOG_FORMAT=tree pathviz tree.json --input "1, 2, 3"
//!
//! # Only the annotator
//! PATHVIZ_LOG="pathviz_annotator=debug" pathviz tree.json --batch inputs.json
//! ```
//!
//! Everything is written to stderr; stdout carries the graph.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "PATHVIZ_LOG";
pub const LOG_FORMAT_ENV: &str = "PATHVIZ_LOG_FORMAT";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Case-insensitive; anything unrecognized means `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// What `init_tracing` installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `debug` or `pathviz_cfg=trace`.
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings through `lookup`, which maps a variable name to its
    /// value. `None` when logging is not requested. `PATHVIZ_LOG` wins over
    /// `RUST_LOG`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let directives = lookup(LOG_ENV).or_else(|| lookup(FALLBACK_LOG_ENV))?;
        let format = lookup(LOG_FORMAT_ENV).map_or(LogFormat::Text, |value| LogFormat::parse(&value));
        Some(LogSettings { directives, format })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    if let Some(settings) = LogSettings::from_env() {
        install(&settings);
    }
}

fn install(settings: &LogSettings) {
    let filter = EnvFilter::builder().parse_lossy(&settings.directives);

    match settings.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tests;
