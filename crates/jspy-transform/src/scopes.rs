//! Scope-aware identifier resolution.
//!
//! Tracks nested lexical scopes (function boundaries only — the subset has
//! `var` semantics and no block scoping) and maps raw source names to the
//! names emitted in the output. Renaming is a pure function of the raw
//! name plus a fixed reserved table, so declaring the same name twice
//! always yields the same resolved name.
//!
//! Object-literal keys never pass through this resolver: member access in
//! the output is always indexed, so keys are emitted as literal text.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::runtime::ALL_SYMBOL_NAMES;
use crate::temp::TEMP_PREFIX;

/// Python keywords plus the builtins and runtime helpers the generated
/// code references. A user identifier colliding with any of these gets a
/// deterministic rename.
static RESERVED: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    let mut set: FxHashSet<&'static str> = [
        // Python 3 keywords
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
        "try", "while", "with", "yield",
        // Soft keywords
        "match", "case",
        // Builtins the generated code uses
        "len", "float", "print",
    ]
    .into_iter()
    .collect();
    set.extend(ALL_SYMBOL_NAMES.iter().copied());
    set
});

/// Deterministic rename for names the output language reserves.
///
/// Collisions (Python keywords, emitted builtins, runtime helper names,
/// and anything starting with the temp prefix) get a trailing underscore;
/// everything else passes through unchanged. Temps never end in an
/// underscore, so renamed user names can never collide with them.
pub fn resolve_reserved(name: &str) -> String {
    if RESERVED.contains(name) || name.starts_with(TEMP_PREFIX) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// A stack of lexical scopes mapping original names to resolved names.
///
/// One instance per transformation run; never shared across units.
#[derive(Debug)]
pub struct ScopeResolver {
    stack: Vec<FxHashMap<String, String>>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        ScopeResolver { stack: Vec::new() }
    }

    /// Push a scope on function entry.
    pub fn enter_scope(&mut self) {
        self.stack.push(FxHashMap::default());
    }

    /// Pop a scope on function exit. Strictly paired with `enter_scope`,
    /// including on error paths.
    pub fn exit_scope(&mut self) {
        let popped = self.stack.pop();
        debug_assert!(popped.is_some(), "scope stack underflow");
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Declare `name` in the innermost scope and return its resolved form.
    pub fn declare(&mut self, name: &str) -> String {
        let resolved = resolve_reserved(name);
        if let Some(scope) = self.stack.last_mut() {
            scope.insert(name.to_string(), resolved.clone());
        }
        resolved
    }

    /// Resolve a reference, searching innermost-to-outermost. Names never
    /// declared in scope fall back to the same pure rename as `declare` —
    /// the defensive default for built-ins. Callers that need to
    /// distinguish undeclared names use [`ScopeResolver::is_declared`].
    pub fn lookup(&self, name: &str) -> String {
        for scope in self.stack.iter().rev() {
            if let Some(resolved) = scope.get(name) {
                return resolved.clone();
            }
        }
        resolve_reserved(name)
    }

    /// True when `name` resolves to a reachable declaration.
    pub fn is_declared(&self, name: &str) -> bool {
        self.stack.iter().rev().any(|scope| scope.contains_key(name))
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::new()
    }
}
