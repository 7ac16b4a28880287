//! Centralized limits and thresholds for path annotation.
//!
//! Statement trees come from an external flow-tree builder and expression
//! text comes straight from user source, so every recursive walk in pathviz
//! is bounded by one of the constants below.
//!
//! # Categories
//!
//! - **Unrolling**: how many extra loop iterations the annotator executes
//! - **Recursion Depths**: limits that keep recursive walks off the end of the stack
//! - **Value Sizes**: caps on values the annotator materializes

// =============================================================================
// Unrolling
// =============================================================================

/// Default number of additional loop iterations the annotator executes.
///
/// The budget is shared by every loop that is active at the same time: a
/// loop nested inside the body of another loop only gets what its enclosing
/// loops have not yet consumed. When a loop finishes, the iterations it
/// consumed are handed back, so the next unrelated loop starts from the full
/// budget again.
///
/// # Example
///
/// ```javascript
/// function spin(a) {
///     while (true)      // always true: stops after 20 re-tests
///         a = a + 1;
///     return a;
/// }
/// ```
pub const DEFAULT_UNROLL_BUDGET: u32 = 20;

/// Maximum number of loop body executions in one annotation run, summed
/// over every loop.
///
/// The unrolling budget bounds each loop, but nested loops multiply: `d`
/// nested `while (true)` loops execute on the order of `C(20 + d, d)`
/// bodies. Once this many bodies have run, every loop still iterating is
/// truncated.
pub const MAX_LOOP_ITERATIONS: u64 = 100_000;

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum statement nesting depth the annotator will descend into.
///
/// Each nested function body, branch or loop body adds a few frames to the
/// annotator's call stack. Exceeding this depth aborts the annotation with
/// `AnnotateError::DepthExceeded`.
pub const MAX_ANNOTATION_DEPTH: u32 = 512;

/// Maximum nesting depth for parsed expressions.
///
/// Guards both the precedence-climbing parser and the evaluator against
/// inputs like `((((((((...))))))))` or `!!!!!!!!...x`.
pub const MAX_EXPRESSION_DEPTH: u32 = 256;

// =============================================================================
// Value Sizes
// =============================================================================

/// Largest array an indexed write may grow a binding to.
///
/// Writing past the end of an array fills the gap with `undefined`, so
/// `a[4000000000] = 1` would otherwise allocate billions of holes.
pub const MAX_ARRAY_LENGTH: usize = 1 << 20;
