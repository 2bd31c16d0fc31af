//! Simulation time model.
//!
//! Time is a monotonically increasing integer [`Tick`] counter.  There is
//! no sub-tick physics and no wall-clock mapping: event schedule times and
//! report times are ticks, full stop.  Using an integer as the canonical
//! unit keeps all schedule arithmetic exact and comparisons O(1).

use std::fmt;

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u32);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u32> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u32) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u32> for Tick {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

impl fmt::Display for Tick {
    /// Ticks print as the bare number — report sections embed them as
    /// `time = N`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
