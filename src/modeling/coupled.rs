//! The coupled model (component C): a static description of a composite's
//! submodels and its EIC/IC/EOC routing tables, plus the optional
//! [`flatten`](Coupled::flatten) transform. Grounded in the reference
//! crate's `modeling::coupled::Coupled`, generalized over [`SimTime`] and
//! extended with `flatten()`, which the reference crate does not implement
//! but the original C++ library's `flattened_coupled` does.

use super::port::AbstractPort;
use super::Component;
use crate::error::CompositionError;
use crate::modeling::Atomic;
use crate::scheduler::{PollScheduler, Scheduler};
use crate::simulation::{AtomicSimulator, Simulator};
use crate::time::SimTime;
use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result};
use std::rc::Rc;

type Coupling = (Rc<dyn AbstractPort>, Rc<dyn AbstractPort>);

/// Coupled DEVS model: an immutable-once-built composite of submodels and
/// the three coupling tables that connect them.
pub struct Coupled<T: SimTime> {
    pub(crate) component: Component<T>,
    comps_map: HashMap<String, usize>,
    pub(crate) comps_vec: Vec<Box<dyn Simulator<T>>>,
    pub(crate) eic_vec: Vec<Coupling>,
    pub(crate) ic_vec: Vec<Coupling>,
    pub(crate) eoc_vec: Vec<Coupling>,
    pub(crate) scheduler: Box<dyn Scheduler<T>>,
}

impl<T: SimTime> Debug for Coupled<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Coupled")
            .field("name", &self.component.name())
            .field("submodels", &self.comps_vec.len())
            .field("eic", &self.eic_vec.len())
            .field("ic", &self.ic_vec.len())
            .field("eoc", &self.eoc_vec.len())
            .finish()
    }
}

impl<T: SimTime> Coupled<T> {
    /// Builds an empty composite, scheduled with the reference crate's
    /// default strategy: a linear poll over every submodel's next time.
    pub fn new(name: &str) -> Self {
        Self::with_scheduler(name, PollScheduler::new())
    }

    /// Builds an empty composite using `scheduler` to track submodels'
    /// next times, so a caller can swap in [`HeapScheduler`](crate::scheduler::HeapScheduler)
    /// for a wide composition without changing anything else about how the
    /// model is built.
    pub fn with_scheduler<S: Scheduler<T> + 'static>(name: &str, scheduler: S) -> Self {
        Self {
            component: Component::new(name),
            comps_map: HashMap::new(),
            comps_vec: Vec::new(),
            eic_vec: Vec::new(),
            ic_vec: Vec::new(),
            eoc_vec: Vec::new(),
            scheduler: Box::new(scheduler),
        }
    }

    pub fn name(&self) -> &str {
        self.component.name()
    }

    fn add_coupling(
        table: &mut Vec<Coupling>,
        from: Rc<dyn AbstractPort>,
        to: Rc<dyn AbstractPort>,
    ) -> std::result::Result<(), CompositionError> {
        if !from.is_compatible(to.as_ref()) {
            return Err(CompositionError::IncompatiblePorts {
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
        }
        if table
            .iter()
            .any(|(f, t)| Rc::ptr_eq(f, &from) && Rc::ptr_eq(t, &to))
        {
            return Err(CompositionError::DuplicateCoupling {
                from: from.name().to_string(),
                to: to.name().to_string(),
            });
        }
        table.push((from, to));
        Ok(())
    }

    /// Adds an input port of type `Port<Input, M>` to this composite.
    /// Panics on a duplicate name (a model-author programming error).
    pub fn add_in_port<M: 'static + Clone + Debug>(
        &mut self,
        name: &str,
    ) -> super::port::Port<super::port::Input, M> {
        self.component.add_in_port::<M>(name)
    }

    /// Adds an output port of type `Port<Output, M>` to this composite.
    pub fn add_out_port<M: 'static + Clone + Debug>(
        &mut self,
        name: &str,
    ) -> super::port::Port<super::port::Output, M> {
        self.component.add_out_port::<M>(name)
    }

    /// Adds an atomic submodel, wrapping it so it can share `comps_vec`
    /// with coupled children. Panics if a submodel with this name is
    /// already present — submodel names must be unique within a composite.
    pub fn add_atomic<A: Atomic<T> + 'static>(&mut self, atomic: A) {
        self.insert_component(Box::new(AtomicSimulator(atomic)));
    }

    /// Adds a coupled submodel.
    pub fn add_coupled(&mut self, coupled: Coupled<T>) {
        self.insert_component(Box::new(coupled));
    }

    fn insert_component(&mut self, component: Box<dyn Simulator<T>>) {
        let name = component.component().name().to_string();
        if self.comps_map.contains_key(&name) {
            panic!(
                "coupled model {} already has a submodel named {}",
                self.name(),
                name
            );
        }
        self.comps_map.insert(name, self.comps_vec.len());
        self.comps_vec.push(component);
    }

    fn submodel(&self, name: &str) -> &dyn Simulator<T> {
        let i = *self.comps_map.get(name).unwrap_or_else(|| {
            panic!("coupled model {} has no submodel named {}", self.name(), name)
        });
        self.comps_vec[i].as_ref()
    }

    /// Registers an external-input coupling: `port_from` (one of this
    /// composite's own input ports) feeds `port_to` on `component_to`.
    pub fn add_eic(
        &mut self,
        port_from: &str,
        component_to: &str,
        port_to: &str,
    ) -> std::result::Result<(), CompositionError> {
        let from = self.component.in_port(port_from);
        let to = self.submodel(component_to).component().in_port(port_to);
        Self::add_coupling(&mut self.eic_vec, from, to)
    }

    /// Registers an internal coupling: the output of `port_from` on
    /// `component_from` feeds `port_to` on `component_to`.
    pub fn add_ic(
        &mut self,
        component_from: &str,
        port_from: &str,
        component_to: &str,
        port_to: &str,
    ) -> std::result::Result<(), CompositionError> {
        let from = self.submodel(component_from).component().out_port(port_from);
        let to = self.submodel(component_to).component().in_port(port_to);
        Self::add_coupling(&mut self.ic_vec, from, to)
    }

    /// Registers an external-output coupling: the output of `port_from` on
    /// `component_from` bubbles up as this composite's `port_to`.
    pub fn add_eoc(
        &mut self,
        component_from: &str,
        port_from: &str,
        port_to: &str,
    ) -> std::result::Result<(), CompositionError> {
        let from = self.submodel(component_from).component().out_port(port_from);
        let to = self.component.out_port(port_to);
        Self::add_coupling(&mut self.eoc_vec, from, to)
    }

    pub fn n_submodels(&self) -> usize {
        self.comps_vec.len()
    }

    pub fn n_eics(&self) -> usize {
        self.eic_vec.len()
    }

    pub fn n_ics(&self) -> usize {
        self.ic_vec.len()
    }

    pub fn n_eocs(&self) -> usize {
        self.eoc_vec.len()
    }

    /// Recursively inlines every nested coupled submodel into this
    /// composite's own level, rewriting couplings transitively so the
    /// externally observable behavior is unchanged. The coordinator never
    /// distinguishes a flattened tree from the original one, so this is
    /// purely a transform on the static description.
    ///
    /// Must be called before the model is added as a submodel of another
    /// `Coupled`: it preserves this composite's own port identities, but a
    /// parent that already captured references to a nested child's ports
    /// would be invalidated by inlining that child afterwards.
    pub fn flatten(self) -> Self {
        let name = self.component.name().to_string();
        let Coupled {
            component,
            comps_vec,
            eic_vec,
            ic_vec,
            eoc_vec,
            ..
        } = self;

        let mut leaves: Vec<(String, Box<dyn Simulator<T>>)> = Vec::new();
        let mut inlined: Vec<(String, Coupled<T>)> = Vec::new();
        for child in comps_vec {
            match child.downcast_coupled() {
                Ok(nested) => {
                    let nested_name = nested.name().to_string();
                    inlined.push((nested_name, nested.flatten()));
                }
                Err(leaf) => {
                    let leaf_name = leaf.component().name().to_string();
                    leaves.push((leaf_name, leaf));
                }
            }
        }

        // A nested child's external port expands to the list of its own
        // submodels' ports that its own EIC/EOC tables forward to/from. Its
        // own IC table is already entirely between its own submodels, so it
        // carries over to the flattened level unchanged.
        let mut in_expansion: HashMap<*const (), Vec<Rc<dyn AbstractPort>>> = HashMap::new();
        let mut out_expansion: HashMap<*const (), Vec<Rc<dyn AbstractPort>>> = HashMap::new();
        let mut inner_ic: Vec<Coupling> = Vec::new();
        for (_, nested) in &inlined {
            for (ext_in, child_in) in &nested.eic_vec {
                in_expansion
                    .entry(ptr_key(ext_in))
                    .or_default()
                    .push(child_in.clone());
            }
            for (child_out, ext_out) in &nested.eoc_vec {
                out_expansion
                    .entry(ptr_key(ext_out))
                    .or_default()
                    .push(child_out.clone());
            }
            inner_ic.extend(nested.ic_vec.iter().cloned());
        }
        fn expand(
            port: &Rc<dyn AbstractPort>,
            map: &HashMap<*const (), Vec<Rc<dyn AbstractPort>>>,
        ) -> Vec<Rc<dyn AbstractPort>> {
            map.get(&ptr_key(port))
                .cloned()
                .unwrap_or_else(|| vec![port.clone()])
        }

        let mut flat = Coupled::new(&name);
        flat.component = component;
        for (leaf_name, leaf) in leaves {
            flat.comps_map.insert(leaf_name, flat.comps_vec.len());
            flat.comps_vec.push(leaf);
        }
        for (nested_name, nested) in inlined {
            for (mut child_name, child) in nested.into_entries() {
                if flat.comps_map.contains_key(&child_name) {
                    child_name = format!("{nested_name}.{child_name}");
                }
                flat.comps_map.insert(child_name, flat.comps_vec.len());
                flat.comps_vec.push(child);
            }
        }

        for (from, to) in eic_vec {
            for expanded_to in expand(&to, &in_expansion) {
                flat.eic_vec.push((from.clone(), expanded_to));
            }
        }
        flat.ic_vec.extend(inner_ic);
        for (from, to) in ic_vec {
            for expanded_from in expand(&from, &out_expansion) {
                for expanded_to in expand(&to, &in_expansion) {
                    flat.ic_vec.push((expanded_from.clone(), expanded_to));
                }
            }
        }
        for (from, to) in eoc_vec {
            for expanded_from in expand(&from, &out_expansion) {
                flat.eoc_vec.push((expanded_from, to.clone()));
            }
        }

        flat
    }

    /// Drains this composite's submodels paired with their registered
    /// names, in insertion order. Used only by [`flatten`](Self::flatten).
    fn into_entries(self) -> Vec<(String, Box<dyn Simulator<T>>)> {
        let mut names = vec![String::new(); self.comps_vec.len()];
        for (name, idx) in self.comps_map {
            names[idx] = name;
        }
        names.into_iter().zip(self.comps_vec).collect()
    }
}

fn ptr_key(port: &Rc<dyn AbstractPort>) -> *const () {
    Rc::as_ptr(port) as *const ()
}

impl<T: SimTime> Display for Coupled<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "already has a submodel named")]
    fn duplicate_component_panics() {
        let mut top = Coupled::<f64>::new("top");
        top.add_coupled(Coupled::<f64>::new("child"));
        top.add_coupled(Coupled::<f64>::new("child"));
    }

    #[test]
    #[should_panic(expected = "has no submodel named")]
    fn missing_component_panics() {
        let top = Coupled::<f64>::new("top");
        top.submodel("ghost");
    }

    #[test]
    fn incompatible_port_types_are_rejected() {
        let mut top = Coupled::<f64>::new("top");
        top.add_in_port::<i32>("input");
        let mut inner = Coupled::<f64>::new("inner");
        inner.add_in_port::<i64>("input");
        top.add_coupled(inner);
        let err = top.add_eic("input", "inner", "input").unwrap_err();
        assert_eq!(
            err,
            CompositionError::IncompatiblePorts {
                from: "input".to_string(),
                to: "input".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_coupling_is_rejected() {
        let mut top = Coupled::<f64>::new("top");
        top.add_in_port::<i32>("input");
        let mut inner = Coupled::<f64>::new("inner");
        inner.add_in_port::<i32>("input");
        top.add_coupled(inner);
        top.add_eic("input", "inner", "input").unwrap();
        let err = top.add_eic("input", "inner", "input").unwrap_err();
        assert!(matches!(err, CompositionError::DuplicateCoupling { .. }));
    }
}
