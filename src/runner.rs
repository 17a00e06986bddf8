//! A driver that runs a simulation and hands scheduled output to a sink.
//! Grounded in the original C++ library's `pdevs::runner`: a thin loop
//! around the coordinator that reads one designated output port after each
//! collection phase and forwards non-empty bags to a caller-supplied
//! interpreter, optionally silenced when only the final state matters.

use crate::modeling::Port;
use crate::modeling::{Coupled, Output};
use crate::simulation::{RootCoordinator, Simulator};
use crate::time::SimTime;
use tracing::trace;

/// Runs a simulation rooted at a [`Coupled<T>`] model, forwarding messages
/// produced on one of its external output ports to a sink closure.
///
/// Unlike the reference crate (which exposes only [`RootCoordinator`] and
/// leaves output collection to the caller), this mirrors the original C++
/// library's `runner`, which owns the output port and the presentation of
/// its contents.
pub struct Runner<T: SimTime, M> {
    coordinator: RootCoordinator<T, Coupled<T>>,
    out_port: Port<Output, M>,
    silent: bool,
}

impl<T: SimTime, M: 'static + Clone + std::fmt::Debug> Runner<T, M> {
    /// Builds a runner that forwards every message produced on `out_port`
    /// to a sink given at call time.
    pub fn new(model: Coupled<T>, out_port: Port<Output, M>) -> Self {
        Self {
            coordinator: RootCoordinator::new(model),
            out_port,
            silent: false,
        }
    }

    /// Builds a runner that discards output, only advancing state. Useful
    /// when a caller only cares about the model's final configuration.
    pub fn new_silent(model: Coupled<T>, out_port: Port<Output, M>) -> Self {
        Self {
            coordinator: RootCoordinator::new(model),
            out_port,
            silent: true,
        }
    }

    fn process_output(&self, t: T, sink: &mut impl FnMut(T, &M)) {
        if self.silent {
            return;
        }
        for msg in self.out_port.values().iter() {
            trace!(?t, ?msg, "runner output");
            sink(t, msg);
        }
    }

    /// Runs through every event scheduled strictly before `t_end`, returning
    /// the time of the first event at or past the horizon.
    pub fn run_until(&mut self, t_end: T, mut sink: impl FnMut(T, &M)) -> T {
        self.coordinator.start(T::ZERO);
        let mut t_next = self.coordinator.component().t_next();
        while t_next < t_end {
            self.coordinator.collection(t_next);
            self.process_output(t_next, &mut sink);
            self.coordinator.transition(t_next);
            self.coordinator.clear_ports();
            t_next = self.coordinator.component().t_next();
        }
        self.coordinator.stop(t_next);
        t_next
    }

    /// Runs until the model tree passivates (every submodel's next time is
    /// `T::INFINITY`).
    pub fn run_until_passivate(&mut self, mut sink: impl FnMut(T, &M)) -> T {
        self.coordinator.start(T::ZERO);
        let mut t_next = self.coordinator.component().t_next();
        while t_next < T::INFINITY {
            self.coordinator.collection(t_next);
            self.process_output(t_next, &mut sink);
            self.coordinator.transition(t_next);
            self.coordinator.clear_ports();
            t_next = self.coordinator.component().t_next();
        }
        self.coordinator.stop(t_next);
        t_next
    }
}
