//! Centralized limits and thresholds for the transpiler.
//!
//! Shared constants for recursion depths used by the pre-pass and the
//! transformation engine. Centralizing them keeps both passes bailing out
//! at the same depth instead of drifting apart.

/// Maximum depth for AST traversal.
///
/// Both the structural pre-pass and the transformation engine recurse over
/// the input tree; at 500 levels of statement/expression nesting they stop
/// descending rather than risk overflowing the stack.
pub const MAX_AST_DEPTH: u32 = 500;
