//! Time domain (component A): an opaque, totally-ordered instant type with a
//! sentinel "infinity" value, generic over the representation a client picks.
//!
//! The engine never inspects the internals of `T`; it only adds, subtracts,
//! and compares instants. Two instantiations ship with the crate: `f64`
//! (continuous time, the reference crate's hard-coded choice) and [`Ticks`]
//! (a saturating discrete instant), to exercise the abstraction end to end.

use std::fmt::Debug;
use std::ops::{Add, Sub};

/// A totally-ordered instant/duration type usable as simulated time.
///
/// `INFINITY` must be idempotent under addition (`INFINITY + t == INFINITY`
/// for any finite `t`) and strictly greater than any finite value a model
/// can produce from [`Atomic::advance`](crate::modeling::Atomic::advance).
/// Equality is exact: implementations must not introduce tolerance-based
/// comparison.
pub trait SimTime:
    Copy + Clone + Debug + PartialOrd + Add<Output = Self> + Sub<Output = Self> + 'static
{
    /// The additive identity.
    const ZERO: Self;
    /// The sentinel "no event scheduled" value.
    const INFINITY: Self;
}

impl SimTime for f64 {
    const ZERO: Self = 0.0;
    const INFINITY: Self = f64::INFINITY;
}

/// A saturating discrete instant, counted in abstract "ticks".
///
/// Unlike `f64`, integers have no native infinity, so `Ticks` reserves
/// `u64::MAX` as the sentinel and saturates addition at it. This is the
/// crate's second `SimTime` instantiation, demonstrating that a rational or
/// otherwise discrete time domain works without the engine caring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(pub u64);

impl Ticks {
    pub fn new(t: u64) -> Self {
        Ticks(t)
    }
}

impl Add for Ticks {
    type Output = Ticks;
    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Ticks {
    type Output = Ticks;
    fn sub(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_sub(rhs.0))
    }
}

impl SimTime for Ticks {
    const ZERO: Self = Ticks(0);
    const INFINITY: Self = Ticks(u64::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_infinity_idempotent<T: SimTime>(finite: T) {
        assert!(finite < T::INFINITY);
        assert_eq!(T::INFINITY + finite, T::INFINITY);
    }

    #[test]
    fn f64_infinity_is_idempotent() {
        assert_infinity_idempotent(0.0_f64);
        assert_infinity_idempotent(1_000_000.0_f64);
    }

    #[test]
    fn ticks_infinity_is_idempotent() {
        assert_infinity_idempotent(Ticks(0));
        assert_infinity_idempotent(Ticks(1_000_000));
    }

    #[test]
    fn ticks_subtraction_saturates_at_zero() {
        assert_eq!(Ticks(3) - Ticks(5), Ticks(0));
    }
}
