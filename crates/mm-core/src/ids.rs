//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so data
//! loaders can build IDs straight from parsed columns.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID", equal to `<inner>::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// `true` unless this is the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// World-unique identity of a unit (creature or player).
    pub struct UnitId(u64);
}

typed_id! {
    /// Identity of a scripted waypoint path or a taxi path.
    ///
    /// `PathId(0)` is reserved and never names a real path.
    pub struct PathId(u32);
}

typed_id! {
    /// Process-unique identity of one movement generator instance.
    ///
    /// Allocated once per generator by [`GeneratorId::next`]; used by the
    /// scheduler for remove-by-instance and contributed-state bookkeeping.
    pub struct GeneratorId(u64);
}

static NEXT_GENERATOR_ID: AtomicU64 = AtomicU64::new(1);

impl GeneratorId {
    /// Allocate a fresh id.  Ids are strictly increasing within a process, so
    /// an older generator always compares lower than a newer one.
    pub fn next() -> Self {
        GeneratorId(NEXT_GENERATOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}
