//! The simulator/coordinator layer (component D): the trait that gives
//! atomic and coupled models a uniform simulation interface, and the root
//! coordinator that drives a whole model tree. Grounded in the reference
//! crate's `simulation::Simulator` and `RootCoordinator`, generalized over
//! [`SimTime`] and stripped of the `rayon`-backed `par_*` parallel
//! coupling/collection paths: ports are `Rc`-based (deliberately not
//! `Send`), so parallelizing across them is not idiomatic here.
//!
//! The reference crate gives every [`Atomic`] a free `Simulator` impl via a
//! blanket `impl<T: Atomic> Simulator for T`, alongside a second, concrete
//! impl for `Coupled`. That pair does not type-check in current stable
//! Rust: a blanket impl over a trait bound and a concrete impl for a
//! specific type are rejected as overlapping even when the concrete type
//! could never satisfy the bound, because overlap checking does not (and,
//! without specialization, cannot) reason about which impls exist
//! elsewhere in the crate. [`AtomicSimulator`] sidesteps this with the
//! standard newtype fix: the blanket impl targets the wrapper, not `T`
//! itself, so its self-type can never unify with `Coupled<T>`.

use crate::modeling::{Atomic, Component, Coupled};
use crate::time::SimTime;
use std::ops::{Deref, DerefMut};

/// Interface shared by every node of a DEVS model tree, leaf or composite.
/// [`AtomicSimulator`] implements it generically for any [`Atomic`];
/// [`Coupled`] implements it directly, dispatching into its children.
pub trait Simulator<T: SimTime> {
    /// Reference to the inner [`Component`] (name, clock, ports).
    fn component(&self) -> &Component<T>;

    /// Mutable reference to the inner [`Component`].
    fn component_mut(&mut self) -> &mut Component<T>;

    /// Attempts to recover the concrete [`Coupled<T>`] behind this node.
    /// `Ok` for composites, `Err(self)` (the trait object handed back
    /// unchanged) for atomics. Used by [`Coupled::flatten`] to find nested
    /// composites to inline without round-tripping through `dyn Any`.
    fn downcast_coupled(self: Box<Self>) -> Result<Box<Coupled<T>>, Box<dyn Simulator<T>>>;

    /// Removes all messages from every input and output port.
    #[inline]
    fn clear_ports(&mut self) {
        let component = self.component_mut();
        component.clear_input();
        component.clear_output();
    }

    /// Starts the simulation, setting the initial clock to `t_start`.
    fn start(&mut self, t_start: T);

    /// Stops the simulation, parking the clock at `t_stop`.
    fn stop(&mut self, t_stop: T);

    /// Executes output functions and propagates messages along IC/EOC.
    fn collection(&mut self, t: T);

    /// Propagates messages along EIC and executes transition functions.
    fn transition(&mut self, t: T);
}

/// Wraps any [`Atomic`] model so it can be boxed alongside [`Coupled`]
/// children in a model tree. Built by [`Coupled::add_atomic`]; there is
/// normally no need to name this type directly.
pub struct AtomicSimulator<A>(pub(crate) A);

impl<T: SimTime, A: Atomic<T> + 'static> Simulator<T> for AtomicSimulator<A> {
    #[inline]
    fn component(&self) -> &Component<T> {
        Atomic::component(&self.0)
    }

    #[inline]
    fn component_mut(&mut self) -> &mut Component<T> {
        Atomic::component_mut(&mut self.0)
    }

    #[inline]
    fn downcast_coupled(self: Box<Self>) -> Result<Box<Coupled<T>>, Box<dyn Simulator<T>>> {
        Err(self)
    }

    #[inline]
    fn start(&mut self, t_start: T) {
        Atomic::start(&mut self.0);
        let advance = self.0.advance();
        self.component_mut().set_sim_t(t_start, t_start + advance);
    }

    #[inline]
    fn stop(&mut self, t_stop: T) {
        self.component_mut().set_sim_t(t_stop, T::INFINITY);
        Atomic::stop(&mut self.0);
    }

    #[inline]
    fn collection(&mut self, t: T) {
        if t >= self.component().t_next() {
            self.component_mut().clear_output();
            Atomic::output(&self.0);
        }
    }

    fn transition(&mut self, t: T) {
        let t_next = self.component().t_next();
        if !self.component().is_input_empty() {
            if t == t_next {
                let e = t - self.component().t_last();
                Atomic::confluent(&mut self.0, e);
            } else {
                let e = t - self.component().t_last();
                Atomic::external(&mut self.0, e);
            }
        } else if t == t_next {
            Atomic::internal(&mut self.0);
        } else {
            return;
        }
        let advance = Atomic::advance(&self.0);
        self.component_mut().set_sim_t(t, t + advance);
    }
}

impl<T: SimTime> Simulator<T> for Coupled<T> {
    #[inline]
    fn component(&self) -> &Component<T> {
        &self.component
    }

    #[inline]
    fn component_mut(&mut self) -> &mut Component<T> {
        &mut self.component
    }

    #[inline]
    fn downcast_coupled(self: Box<Self>) -> Result<Box<Coupled<T>>, Box<dyn Simulator<T>>> {
        Ok(self)
    }

    /// Starts every submodel and adopts the earliest of their next times,
    /// as found by this composite's [`Scheduler`](crate::scheduler::Scheduler).
    fn start(&mut self, t_start: T) {
        self.scheduler.clear();
        for (i, c) in self.comps_vec.iter_mut().enumerate() {
            c.start(t_start);
            self.scheduler.schedule(i, c.component().t_next());
        }
        let t_next = self.scheduler.imminent();
        self.component.set_sim_t(t_start, t_next);
    }

    /// Stops every submodel and parks this composite's clock at `t_stop`.
    #[inline]
    fn stop(&mut self, t_stop: T) {
        self.comps_vec.iter_mut().for_each(|c| c.stop(t_stop));
        self.component.set_sim_t(t_stop, T::INFINITY);
    }

    /// Collects output from imminent submodels, then propagates it along
    /// EOC to this composite's own output ports.
    fn collection(&mut self, t: T) {
        if t >= self.component.t_next() {
            self.component.clear_output();
            self.comps_vec.iter_mut().for_each(|c| c.collection(t));
            self.eoc_vec
                .iter()
                .for_each(|(port_from, port_to)| port_from.propagate(port_to.as_ref()));
        }
    }

    /// Propagates EIC and IC messages, then drives every submodel's own
    /// transition and recomputes this composite's next time.
    fn transition(&mut self, t: T) {
        self.eic_vec
            .iter()
            .for_each(|(port_from, port_to)| port_from.propagate(port_to.as_ref()));
        self.ic_vec
            .iter()
            .for_each(|(port_from, port_to)| port_from.propagate(port_to.as_ref()));
        for (i, c) in self.comps_vec.iter_mut().enumerate() {
            c.transition(t);
            c.clear_ports();
            self.scheduler.schedule(i, c.component().t_next());
        }
        let t_next = self.scheduler.imminent();
        self.component.set_sim_t(t, t_next);
    }
}

/// Drives a whole model tree through a simulation run. Sequential by
/// design: see the module docs for why this crate does not parallelize
/// across submodels the way the reference crate optionally does.
pub struct RootCoordinator<T: SimTime, M: Simulator<T>>(M, std::marker::PhantomData<T>);

impl<T: SimTime, M: Simulator<T>> RootCoordinator<T, M> {
    pub fn new(model: M) -> Self {
        Self(model, std::marker::PhantomData)
    }

    /// Runs the simulation from `T::ZERO` until `t_end`, exclusive.
    pub fn simulate_time(&mut self, t_end: T) {
        self.start(T::ZERO);
        let mut t_next = self.component().t_next();
        while t_next < t_end {
            self.collection(t_next);
            self.transition(t_next);
            self.clear_ports();
            t_next = self.component().t_next();
        }
        self.stop(t_next);
    }

    /// Runs the simulation for at most `n_steps` cycles, stopping early if
    /// the model passivates (`t_next` reaches `T::INFINITY`).
    pub fn simulate_steps(&mut self, mut n_steps: usize) {
        self.start(T::ZERO);
        let mut t_next = self.component().t_next();
        while t_next < T::INFINITY && n_steps > 0 {
            self.collection(t_next);
            self.transition(t_next);
            self.clear_ports();
            t_next = self.component().t_next();
            n_steps -= 1;
        }
        self.stop(t_next);
    }
}

impl<T: SimTime, M: Simulator<T>> Deref for RootCoordinator<T, M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: SimTime, M: Simulator<T>> DerefMut for RootCoordinator<T, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
