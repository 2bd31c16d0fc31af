//! Strongly typed, zero-cost identifier wrappers.
//!
//! Simulated objects carry their textual id (the `[A-Za-z0-9_]+` name a
//! scenario file uses), but inside the model they reference each other by
//! dense indices into the [`RoadMap`][crate::RoadMap]'s storage.  All IDs
//! are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Index of a junction in `RoadMap` storage (creation order).
    pub struct JunctionId(u32);
}

typed_id! {
    /// Index of a road in `RoadMap` storage (creation order).
    pub struct RoadId(u32);
}

typed_id! {
    /// Index of a vehicle in `RoadMap` storage (creation order).
    pub struct VehicleId(u32);
}
