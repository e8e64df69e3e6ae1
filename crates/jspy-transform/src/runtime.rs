//! Runtime-contract symbols.
//!
//! The generated Python calls into a small fixed library of semantic
//! helpers (truthiness, identity-aware equality, coercing arithmetic,
//! enumeration, the `undefined` sentinel, …). The engine does not
//! implement that library; it references helpers by stable name and
//! reports the exact set it used, so a downstream import-emission step can
//! deduplicate and order the imports deterministically.

use indexmap::IndexSet;

/// One runtime-contract or stdlib-alias symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RuntimeSymbol {
    /// `JSUndefined` — the unset sentinel, distinct from `None`
    Undefined,
    /// `JSException` — wrapper for thrown values
    Exception,
    /// `js_truthy`
    Truthy,
    /// `js_strict_eq` / `js_strict_neq` — identity-aware equality
    StrictEq,
    StrictNeq,
    /// `js_loose_eq` / `js_loose_neq` — loosely-coercive equality
    LooseEq,
    LooseNeq,
    /// `js_to_number`
    ToNumber,
    /// Coercion-aware arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `js_typeof`
    TypeOf,
    /// `js_delete` — hole-preserving delete
    Delete,
    /// `js_for_in_keys` — enumeration contract
    ForInKeys,
    /// `compile_js_regex`
    CompileRegex,
    /// Stdlib aliases
    Round,
    CharCodeAt,
    Substring,
    ArrayPop,
    DateNow,
    ConsoleLog,
}

impl RuntimeSymbol {
    /// The Python name the printer emits and the import step imports.
    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeSymbol::Undefined => "JSUndefined",
            RuntimeSymbol::Exception => "JSException",
            RuntimeSymbol::Truthy => "js_truthy",
            RuntimeSymbol::StrictEq => "js_strict_eq",
            RuntimeSymbol::StrictNeq => "js_strict_neq",
            RuntimeSymbol::LooseEq => "js_loose_eq",
            RuntimeSymbol::LooseNeq => "js_loose_neq",
            RuntimeSymbol::ToNumber => "js_to_number",
            RuntimeSymbol::Add => "js_add",
            RuntimeSymbol::Sub => "js_sub",
            RuntimeSymbol::Mul => "js_mul",
            RuntimeSymbol::Div => "js_div",
            RuntimeSymbol::Mod => "js_mod",
            RuntimeSymbol::TypeOf => "js_typeof",
            RuntimeSymbol::Delete => "js_delete",
            RuntimeSymbol::ForInKeys => "js_for_in_keys",
            RuntimeSymbol::CompileRegex => "compile_js_regex",
            RuntimeSymbol::Round => "js_round",
            RuntimeSymbol::CharCodeAt => "js_char_code_at",
            RuntimeSymbol::Substring => "js_substring",
            RuntimeSymbol::ArrayPop => "js_array_pop",
            RuntimeSymbol::DateNow => "js_date_now",
            RuntimeSymbol::ConsoleLog => "console_log",
        }
    }
}

/// Every contract symbol name, in the runtime library's export order.
/// Used by the scope resolver's reserved table: user identifiers must not
/// shadow the helpers the generated code calls.
pub const ALL_SYMBOL_NAMES: &[&str] = &[
    "JSUndefined",
    "js_truthy",
    "JSException",
    "js_strict_eq",
    "js_strict_neq",
    "js_to_number",
    "js_add",
    "js_sub",
    "js_mul",
    "js_div",
    "js_mod",
    "compile_js_regex",
    "js_typeof",
    "js_delete",
    "js_loose_eq",
    "js_loose_neq",
    "js_for_in_keys",
    "js_round",
    "js_char_code_at",
    "js_substring",
    "js_array_pop",
    "js_date_now",
    "console_log",
];

/// Append-only set of runtime symbols referenced during one transformation
/// run. Iteration order is first-use order, so identical inputs always
/// produce identical import lists.
#[derive(Debug, Default)]
pub struct RequiredSymbols {
    set: IndexSet<RuntimeSymbol>,
}

impl RequiredSymbols {
    pub fn new() -> Self {
        RequiredSymbols {
            set: IndexSet::new(),
        }
    }

    /// Record a use; returns the symbol's Python name for emission.
    pub fn record(&mut self, symbol: RuntimeSymbol) -> &'static str {
        self.set.insert(symbol);
        symbol.as_str()
    }

    pub fn contains(&self, symbol: RuntimeSymbol) -> bool {
        self.set.contains(&symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Symbols in first-use order.
    pub fn iter(&self) -> impl Iterator<Item = RuntimeSymbol> + '_ {
        self.set.iter().copied()
    }

    /// Python names in first-use order.
    pub fn names(&self) -> Vec<&'static str> {
        self.set.iter().map(|s| s.as_str()).collect()
    }
}
