//! Total order over the active stack.
//!
//! The stack is kept sorted so that its front is the generator that runs:
//!
//! 1. `Override` mode before `Default` mode,
//! 2. within a mode, higher priority first,
//! 3. between equal keys, the older generator (smaller id) first.

use std::cmp::Ordering;

use crate::Generator;

/// Order two active generators, front of the stack first.
#[inline]
pub fn compare(a: &Generator, b: &Generator) -> Ordering {
    b.sort_key().cmp(&a.sort_key()).then_with(|| a.id().cmp(&b.id()))
}

/// `true` if `a` sorts strictly before `b`.
#[inline]
pub fn ranks_before(a: &Generator, b: &Generator) -> bool {
    compare(a, b) == Ordering::Less
}

/// Index at which `generator` belongs in the sorted `stack`.
#[inline]
pub fn insertion_index(stack: &[Generator], generator: &Generator) -> usize {
    stack.partition_point(|g| ranks_before(g, generator))
}
