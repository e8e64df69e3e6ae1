//! AST-to-AST transformation engine for the jspy transpiler.
//!
//! Translates a JavaScript-subset input tree ([`jspy_ast::js`]) into a
//! semantically equivalent Python output tree ([`jspy_ast::py`]),
//! preserving evaluation order, truthiness, equality, scoping, and
//! control-flow semantics the two languages do not share.
//!
//! # Architecture
//!
//! Two passes over each compilation unit:
//!
//! 1. [`prepass::Prepass`] — a read-only traversal that assigns loop ids,
//!    validates `break`/`continue` placement, and collects per-function
//!    hoist sets into a side table ([`prepass::Annotations`]), leaving the
//!    input tree untouched.
//! 2. [`engine::Transformer`] — a depth-first rewrite of every input node
//!    into zero or more output nodes, consulting the annotations, a
//!    [`scopes::ScopeResolver`], and a [`temp::TempAllocator`], and
//!    accumulating the set of runtime helpers the output references
//!    ([`runtime::RequiredSymbols`]).
//!
//! Each call to [`transform`] owns independent resolver, allocator, and
//! symbol-set instances, so concurrent transformation of independent units
//! needs no locking.
//!
//! Any construct that cannot be rewritten while preserving the
//! single-evaluation and ordering guarantees aborts the whole unit with a
//! typed [`errors::TransformError`]; there is no partial output.

pub mod engine;
pub mod errors;
pub mod prepass;
pub mod runtime;
pub mod scopes;
pub mod temp;

pub use engine::{TransformOutput, Transformer};
pub use errors::{ErrorKind, TransformError};
pub use prepass::{Annotations, LoopId, Prepass};
pub use runtime::{RequiredSymbols, RuntimeSymbol};
pub use scopes::ScopeResolver;
pub use temp::TempAllocator;

use jspy_ast::js::Node;

/// Transform one compilation unit: pre-pass, then node rewrite.
///
/// Returns the output module together with the exact set of
/// runtime-contract symbols the generated code references, or the first
/// error encountered.
pub fn transform(program: &Node) -> Result<TransformOutput, TransformError> {
    let annotations = Prepass::new().run(program)?;
    Transformer::new(&annotations).run(program)
}
