//! Common constants for the pathviz analyzer.
//!
//! This crate holds the values every other pathviz crate agrees on:
//! - Recursion and unrolling limits (`limits`)
//! - Default DOT fill colors for in-path and off-path nodes

// Centralized limits and thresholds
pub mod limits;

/// Fill color for nodes visited under the analyzed input.
pub const IN_PATH_FILL: &str = "#a9d18e";

/// Fill color for nodes the analyzed input never reaches.
pub const OFF_PATH_FILL: &str = "#ffffff";
