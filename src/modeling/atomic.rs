//! The atomic model interface (component B): the five operations a timed
//! state machine must implement to participate in a simulation. Grounded in
//! the reference crate's `modeling::atomic::Atomic` trait, generalized over
//! [`SimTime`] and renamed to the operation names used throughout the
//! PDEVS literature and the C++ original this crate's models descend from
//! (`advance`/`out`/`internal`/`external`/`confluence`).

use super::Component;
use crate::time::SimTime;

/// Interface for atomic DEVS models.
///
/// Calling [`external`](Atomic::external) or [`confluent`](Atomic::confluent)
/// on a model whose domain has no input (e.g. [`Generator`](crate::models::Generator))
/// is a contract violation, not a recoverable error: such models assert in
/// their own implementation, the same way the reference crate and its C++
/// ancestor do.
pub trait Atomic<T: SimTime> {
    /// Returns a reference to the inner component (name, clock, ports).
    fn component(&self) -> &Component<T>;

    /// Returns a mutable reference to the inner component.
    fn component_mut(&mut self) -> &mut Component<T>;

    /// Performs any setup before the first transition. Does nothing by default.
    #[inline]
    fn start(&mut self) {}

    /// Performs any teardown after the last transition. Does nothing by default.
    #[inline]
    fn stop(&mut self) {}

    /// Output function: messages produced *at* the scheduled internal
    /// instant. Only called when that instant is the global next time, and
    /// must be pure — it may only write to this model's own output ports.
    fn output(&self);

    /// Internal transition: fires when the scheduled instant elapses with
    /// no external input pending.
    fn internal(&mut self);

    /// External transition: fires when input arrives before the scheduled
    /// instant. `e` is the elapsed time since the last transition.
    fn external(&mut self, e: T);

    /// Time-advance function: duration until the next internal event, timed
    /// from the most recent transition. `T::INFINITY` means passive.
    fn advance(&self) -> T;

    /// Confluent transition: fires when input arrives exactly at the
    /// scheduled instant. The PDEVS default runs [`internal`](Atomic::internal)
    /// then [`external`](Atomic::external) with elapsed time zero, matching
    /// the reference crate's and the original C++'s default.
    #[inline]
    fn confluent(&mut self, e: T) {
        let _ = e;
        self.internal();
        self.external(T::ZERO);
    }
}
