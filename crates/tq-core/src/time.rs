//! Logical scheduler time.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter with no mapping to wall
//! clock time.  A queue's clock only moves when a ticket is consumed, and it
//! moves to exactly that ticket's `time`.
//!
//! Intervals are plain `u64` tick counts, so a negative interval cannot be
//! expressed and all schedule arithmetic is exact.  A due time past
//! `u64::MAX` is rejected by the queue rather than wrapped.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute logical tick.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick `n` steps after `self`, or `None` past `u64::MAX`.
    #[inline]
    pub fn checked_offset(self, n: u64) -> Option<Tick> {
        self.0.checked_add(n).map(Tick)
    }

    /// Signed distance `self - other`, for queries that may look backwards.
    /// Saturates at the `i64` bounds.
    #[inline]
    pub fn signed_diff(self, other: Tick) -> i64 {
        let d = self.0 as i128 - other.0 as i128;
        d.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    /// # Panics
    /// Panics on overflow in every build profile; queues go through
    /// [`Tick::checked_offset`] instead.
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        match self.checked_offset(rhs) {
            Some(t) => t,
            None => panic!("tick overflow: {self} + {rhs}"),
        }
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl From<u64> for Tick {
    #[inline]
    fn from(n: u64) -> Tick {
        Tick(n)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}
