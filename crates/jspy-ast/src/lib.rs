//! Tree vocabularies for the jspy transpiler.
//!
//! This crate defines both sides of the transformation engine's contract:
//! - [`js`]: the input tree produced by the upstream JavaScript parser — a
//!   closed set of immutable, uniquely-identified, span-carrying nodes.
//! - [`py`]: the output tree consumed by the downstream Python printer — a
//!   fixed vocabulary of expression and statement nodes.
//! - [`builder`]: a convenience builder implementing the upstream contract
//!   (unique node ids, spans), used by tests and embedders that construct
//!   input trees programmatically.
//!
//! The input tree is read-only to every downstream pass; all analysis
//! results live in side tables keyed by [`js::NodeId`].

pub mod builder;
pub mod js;
pub mod py;

pub use builder::AstBuilder;
pub use js::{Node, NodeId, NodeKind};
pub use py::{PyExpr, PyModule, PyStmt};
