//! Temp name allocation.
//!
//! The engine introduces bindings invisible to the input program to hold
//! intermediate values (short-circuit left operands, cached member-access
//! bases/keys, switch discriminants, caught exceptions). Their namespace
//! must stay disjoint from anything the scope resolver can produce: every
//! temp starts with [`TEMP_PREFIX`] and ends with a digit, and the
//! resolver renames any user identifier starting with the prefix so the
//! renamed form ends with an underscore.

/// Reserved prefix of every engine-introduced binding.
pub const TEMP_PREFIX: &str = "_js_tmp";

/// Allocates `_js_tmp1`, `_js_tmp2`, … monotonically within one function.
///
/// Reset at each function boundary (before parameters are declared) so
/// numbering is deterministic and reproducible across identical inputs.
/// Around a nested function the engine saves and restores the counter, so
/// the outer function resumes its own numbering.
#[derive(Debug, Default)]
pub struct TempAllocator {
    counter: u32,
}

impl TempAllocator {
    pub fn new() -> Self {
        TempAllocator { counter: 0 }
    }

    /// Next unique temp name for the current function.
    pub fn next(&mut self) -> String {
        self.counter += 1;
        format!("{TEMP_PREFIX}{}", self.counter)
    }

    /// Reset numbering at a function boundary.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    /// Current counter value, saved before descending into a nested
    /// function body.
    pub fn save(&self) -> u32 {
        self.counter
    }

    /// Restore a previously saved counter after a nested function body.
    pub fn restore(&mut self, counter: u32) {
        self.counter = counter;
    }
}
