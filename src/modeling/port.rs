//! Type-erased message ports.
//!
//! A [`Coupled`](super::coupled::Coupled) holds children of many different
//! concrete atomic types in a single `Vec<Box<dyn Simulator<T>>>`, so the
//! ports used to wire them together must be type-erased at the boundary the
//! same way the reference crate's `modeling::component`/`modeling::coupled`
//! erase them behind `Rc<dyn AbstractPort>`. Each port still carries a single
//! concrete message type `M` underneath; coupling construction downcasts
//! both endpoints via [`AbstractPort::as_any`] to check type compatibility.

use std::any::Any;
use std::cell::RefCell;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::rc::Rc;

/// Operations available on a type-erased port. Every method here only needs
/// `&dyn AbstractPort` on the other side, so the trait stays object-safe
/// despite each concrete port wrapping a different message type `M`.
pub trait AbstractPort: Debug {
    /// The port's name, as given to `add_in_port`/`add_out_port`.
    fn name(&self) -> &str;
    /// True if the port's bag holds no messages.
    fn is_empty(&self) -> bool;
    /// Empties the port's bag.
    fn clear(&self);
    /// Type-erased view, used to downcast to `RawPort<M>`.
    fn as_any(&self) -> &dyn Any;
    /// Copies every message currently in `self` into `to`. Panics if the two
    /// ports do not carry the same concrete message type — callers must
    /// check [`AbstractPort::is_compatible`] first (coupling construction
    /// does, at build time).
    fn propagate(&self, to: &dyn AbstractPort);
    /// True if `to` wraps the same concrete message type as `self`, i.e.
    /// [`propagate`](AbstractPort::propagate) would not panic.
    fn is_compatible(&self, to: &dyn AbstractPort) -> bool;
}

/// The shared, type-erased storage backing a [`Port`]. Multiple `Port`
/// handles (one per `Coupled`/`Component` that references it) point at the
/// same `RawPort` via `Rc`.
#[derive(Debug)]
pub struct RawPort<M> {
    name: String,
    bag: RefCell<Vec<M>>,
}

impl<M: 'static + Clone + Debug> RawPort<M> {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bag: RefCell::new(Vec::new()),
        }
    }

    fn add_value(&self, value: M) {
        self.bag.borrow_mut().push(value);
    }

    fn add_values(&self, values: &[M]) {
        self.bag.borrow_mut().extend_from_slice(values);
    }

    fn values(&self) -> std::cell::Ref<'_, Vec<M>> {
        self.bag.borrow()
    }
}

impl<M: 'static + Clone + Debug> AbstractPort for RawPort<M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.bag.borrow().is_empty()
    }

    fn clear(&self) {
        self.bag.borrow_mut().clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn propagate(&self, to: &dyn AbstractPort) {
        let to = to
            .as_any()
            .downcast_ref::<RawPort<M>>()
            .expect("propagate called on incompatible ports");
        to.bag.borrow_mut().extend(self.bag.borrow().iter().cloned());
    }

    fn is_compatible(&self, to: &dyn AbstractPort) -> bool {
        to.as_any().downcast_ref::<RawPort<M>>().is_some()
    }
}

/// Marker type for input ports (client code may only read from these).
#[derive(Debug, Clone, Copy)]
pub struct Input;
/// Marker type for output ports (client code may only write to these).
#[derive(Debug, Clone, Copy)]
pub struct Output;

/// A typed handle to a port. `Dir` is [`Input`] or [`Output`] and only
/// enables the matching half of the API, mirroring the reference crate's
/// `Port<Input, T>` / `Port<Output, T>` split.
#[derive(Debug)]
pub struct Port<Dir, M>(pub(crate) Rc<RawPort<M>>, PhantomData<Dir>);

impl<Dir, M> Clone for Port<Dir, M> {
    fn clone(&self) -> Self {
        Port(self.0.clone(), PhantomData)
    }
}

impl<M: 'static + Clone + Debug> Port<Input, M> {
    pub(crate) fn new(raw: Rc<RawPort<M>>) -> Self {
        Port(raw, PhantomData)
    }

    /// Reads every message currently queued on this input port.
    pub fn values(&self) -> std::cell::Ref<'_, Vec<M>> {
        self.0.values()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Injects a single message of external input. Meant for a composite's
    /// own external input ports, fed by a driver from outside the model
    /// tree — an atomic model should only ever read its own input, never
    /// write to it.
    pub fn add_value(&self, value: M) {
        self.0.add_value(value);
    }

    /// Injects a bag of external input messages.
    pub fn add_values(&self, values: &[M]) {
        self.0.add_values(values);
    }
}

impl<M: 'static + Clone + Debug> Port<Output, M> {
    pub(crate) fn new(raw: Rc<RawPort<M>>) -> Self {
        Port(raw, PhantomData)
    }

    /// Queues a single output message. Only valid to call from
    /// [`Atomic::output`](crate::modeling::Atomic::output).
    pub fn add_value(&self, value: M) {
        self.0.add_value(value);
    }

    /// Queues a bag of output messages.
    pub fn add_values(&self, values: &[M]) {
        self.0.add_values(values);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads every message currently queued on this output port. Meant for
    /// a composite's own external output ports, read by a driver after the
    /// coordinator has propagated EOC into them — an atomic model should
    /// never need to read back what it just wrote.
    pub fn values(&self) -> std::cell::Ref<'_, Vec<M>> {
        self.0.values()
    }
}

/// Constructs a fresh, unconnected `RawPort<M>` wrapped for storage in a
/// `Component`'s type-erased port table.
pub(crate) fn new_raw<M: 'static + Clone + Debug>(name: &str) -> Rc<RawPort<M>> {
    Rc::new(RawPort::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagate_copies_bag_between_compatible_ports() {
        let from = new_raw::<i32>("out");
        let to = new_raw::<i32>("in");
        from.add_values(&[1, 2, 3]);
        let from_dyn: Rc<dyn AbstractPort> = from.clone();
        let to_dyn: Rc<dyn AbstractPort> = to.clone();
        from_dyn.propagate(to_dyn.as_ref());
        assert_eq!(&*to.values(), &[1, 2, 3]);
    }

    #[test]
    fn incompatible_ports_are_detected() {
        let from = new_raw::<i32>("out");
        let to = new_raw::<f64>("in");
        let from_dyn: Rc<dyn AbstractPort> = from.clone();
        let to_dyn: Rc<dyn AbstractPort> = to.clone();
        assert!(!from_dyn.is_compatible(to_dyn.as_ref()));
    }
}
