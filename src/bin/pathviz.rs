#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use pathviz::cli::args::CliArgs;
use pathviz::cli::driver::{self, RunResult};
use pathviz::cli::reporter::Reporter;

fn main() {
    // Initialize tracing if PATHVIZ_LOG or RUST_LOG is set.
    pathviz::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let reporter = Reporter::new(!args.no_color && std::io::stderr().is_terminal());

    match run(&args) {
        Ok(result) => {
            for truncated in &result.truncated_loops {
                eprintln!("{}", reporter.format_truncation(truncated));
            }
        }
        Err(error) => {
            eprintln!("{}", reporter.format_error(&error));
            std::process::exit(1);
        }
    }
}

fn run(args: &CliArgs) -> Result<RunResult> {
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(args, &cwd)?;
    driver::write_output(args, &cwd, &result.output)?;
    Ok(result)
}
