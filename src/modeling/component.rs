//! The generic DEVS component: the name, clock, and port set every atomic
//! or coupled model owns. Grounded in the reference crate's
//! `modeling::component::Component`, generalized here over [`SimTime`]
//! instead of a hard-coded `f64`.

use super::port::{AbstractPort, Input, Output, Port};
use crate::time::SimTime;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result};
use std::rc::Rc;

/// Generic DEVS component. Every atomic and coupled model embeds one of
/// these to satisfy the [`Simulator`](crate::simulation::Simulator) trait.
#[derive(Debug)]
pub struct Component<T: SimTime> {
    name: String,
    t_last: T,
    t_next: T,
    input_map: HashMap<String, usize>,
    output_map: HashMap<String, usize>,
    input_ports: Vec<Rc<dyn AbstractPort>>,
    output_ports: Vec<Rc<dyn AbstractPort>>,
}

impl<T: SimTime> Component<T> {
    /// Creates a new component with the provided name and its clock parked
    /// at `(T::ZERO, T::INFINITY)` until [`set_sim_t`](Self::set_sim_t) runs.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            t_last: T::ZERO,
            t_next: T::INFINITY,
            input_map: HashMap::new(),
            output_map: HashMap::new(),
            input_ports: Vec::new(),
            output_ports: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn t_last(&self) -> T {
        self.t_last
    }

    pub fn t_next(&self) -> T {
        self.t_next
    }

    pub(crate) fn set_sim_t(&mut self, t_last: T, t_next: T) {
        debug_assert!(
            t_last <= t_next,
            "component {}: t_last ({:?}) must not exceed t_next ({:?})",
            self.name,
            t_last,
            t_next
        );
        self.t_last = t_last;
        self.t_next = t_next;
    }

    /// Adds a new input port of type `Port<Input, M>`. Panics if the
    /// component already has an input port with this name (a programming
    /// error in the model author's constructor, caught immediately).
    pub fn add_in_port<M: 'static + Clone + Debug>(&mut self, name: &str) -> Port<Input, M> {
        if self.input_map.contains_key(name) {
            panic!(
                "component {} already contains input port with name {}",
                self.name, name
            );
        }
        let raw = super::port::new_raw::<M>(name);
        self.input_map.insert(name.to_string(), self.input_ports.len());
        self.input_ports.push(raw.clone());
        Port::<Input, M>::new(raw)
    }

    /// Adds a new output port of type `Port<Output, M>`. Panics on a
    /// duplicate name, symmetric to [`add_in_port`](Self::add_in_port).
    pub fn add_out_port<M: 'static + Clone + Debug>(&mut self, name: &str) -> Port<Output, M> {
        if self.output_map.contains_key(name) {
            panic!(
                "component {} already contains output port with name {}",
                self.name, name
            );
        }
        let raw = super::port::new_raw::<M>(name);
        self.output_map.insert(name.to_string(), self.output_ports.len());
        self.output_ports.push(raw.clone());
        Port::<Output, M>::new(raw)
    }

    pub fn is_input_empty(&self) -> bool {
        self.input_ports.iter().all(|p| p.is_empty())
    }

    pub fn is_output_empty(&self) -> bool {
        self.output_ports.iter().all(|p| p.is_empty())
    }

    pub(crate) fn clear_input(&mut self) {
        self.input_ports.iter().for_each(|p| p.clear());
    }

    pub(crate) fn clear_output(&mut self) {
        self.output_ports.iter().for_each(|p| p.clear());
    }

    /// Looks up an input port by name for coupling construction. Panics if
    /// absent — a malformed-coupling detail the model author controls
    /// directly (wrong literal port name), distinct from the data-dependent
    /// `CompositionError`s surfaced by [`Coupled`](super::coupled::Coupled).
    pub(crate) fn in_port(&self, name: &str) -> Rc<dyn AbstractPort> {
        let i = *self
            .input_map
            .get(name)
            .unwrap_or_else(|| panic!("component {} has no input port named {}", self.name, name));
        self.input_ports[i].clone()
    }

    pub(crate) fn out_port(&self, name: &str) -> Rc<dyn AbstractPort> {
        let i = *self.output_map.get(name).unwrap_or_else(|| {
            panic!("component {} has no output port named {}", self.name, name)
        });
        self.output_ports[i].clone()
    }
}

impl<T: SimTime> Display for Component<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "has no input port named i32")]
    fn missing_in_port_panics() {
        Component::<f64>::new("a").in_port("i32");
    }

    #[test]
    #[should_panic(expected = "already contains input port with name i32")]
    fn duplicate_in_port_panics() {
        let mut a = Component::<f64>::new("a");
        let _p = a.add_in_port::<i32>("i32");
        a.add_in_port::<i32>("i32");
    }

    #[test]
    fn ports_track_emptiness_independently() {
        let mut a = Component::<f64>::new("a");
        let out_i32 = a.add_out_port::<i32>("i32");
        let out_f64 = a.add_out_port::<f64>("f64");
        assert!(a.is_input_empty());
        assert!(a.is_output_empty());
        out_i32.add_value(1);
        out_f64.add_values(&[1.0, 2.0]);
        assert!(!a.is_output_empty());
        a.clear_output();
        assert!(a.is_output_empty());
    }
}
