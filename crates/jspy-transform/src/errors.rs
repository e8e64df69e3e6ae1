//! Typed errors for the pre-pass and the transformation engine.
//!
//! All errors are fatal: the first one aborts transformation of the whole
//! unit. Every error carries the offending node's kind name and span, an
//! explanation, and a suggested alternative; presentation (line/column
//! resolution, coloring) is the caller's responsibility.

use jspy_ast::js::Node;
use jspy_common::Span;
use thiserror::Error;

/// Error taxonomy. Codes are stable and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No rewrite rule for this kind/feature combination.
    UnsupportedConstruct,
    /// `break`/`continue` with no enclosing loop or switch.
    JumpOutsideTarget,
    /// `continue` directly inside a switch body.
    ContinueInsideDispatch,
    /// Non-empty case without a terminator followed by another non-empty case.
    AmbiguousFallThrough,
    /// Identifier reference with no reachable declaration.
    UnresolvedBinding,
    /// Ordering-sensitive construct in a position where it cannot be
    /// rewritten safely (e.g. a comma sequence outside an allowed clause).
    AmbiguousEvaluationContext,
}

impl ErrorKind {
    pub fn code(self) -> u32 {
        match self {
            ErrorKind::UnsupportedConstruct => 1001,
            ErrorKind::JumpOutsideTarget => 1002,
            ErrorKind::ContinueInsideDispatch => 1003,
            ErrorKind::AmbiguousFallThrough => 1004,
            ErrorKind::UnresolvedBinding => 1005,
            ErrorKind::AmbiguousEvaluationContext => 1006,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedConstruct => "UnsupportedConstruct",
            ErrorKind::JumpOutsideTarget => "JumpOutsideTarget",
            ErrorKind::ContinueInsideDispatch => "ContinueInsideDispatch",
            ErrorKind::AmbiguousFallThrough => "AmbiguousFallThrough",
            ErrorKind::UnresolvedBinding => "UnresolvedBinding",
            ErrorKind::AmbiguousEvaluationContext => "AmbiguousEvaluationContext",
        }
    }
}

/// A fatal transformation error.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{}[{}] at {}..{} ({node_kind}): {message}. Suggestion: {suggestion}",
    kind.name(), kind.code(), span.start, span.end)]
pub struct TransformError {
    pub kind: ErrorKind,
    /// Kind name of the offending input node.
    pub node_kind: &'static str,
    pub span: Span,
    pub message: String,
    pub suggestion: String,
}

impl TransformError {
    pub fn new(
        kind: ErrorKind,
        node: &Node,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        TransformError {
            kind,
            node_kind: node.kind_name(),
            span: node.span,
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    pub fn unsupported(
        node: &Node,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnsupportedConstruct, node, message, suggestion)
    }
}
