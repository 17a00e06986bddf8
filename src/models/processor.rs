//! A single-slot processing station. Grounded in the original C++
//! library's `basic_models::processor`: jobs arrive on an input port,
//! queue up, and leave (one at a time, each after `processing_time`) on an
//! output port.

use crate::modeling::{Atomic, Component, Input, Output, Port};
use crate::time::SimTime;
use std::collections::VecDeque;
use std::fmt::Debug;

#[derive(Debug)]
pub struct Processor<T: SimTime, M> {
    component: Component<T>,
    input: Port<Input, M>,
    output: Port<Output, M>,
    jobs: VecDeque<M>,
    processing_time: T,
    next: T,
}

impl<T: SimTime, M: 'static + Clone + Debug> Processor<T, M> {
    pub fn new(name: &str, processing_time: T) -> Self {
        let mut component = Component::new(name);
        let input = component.add_in_port::<M>("in");
        let output = component.add_out_port::<M>("out");
        Self {
            component,
            input,
            output,
            jobs: VecDeque::new(),
            processing_time,
            next: T::INFINITY,
        }
    }

    /// Number of jobs currently queued, including the one in progress.
    pub fn queue_len(&self) -> usize {
        self.jobs.len()
    }
}

impl<T: SimTime, M: 'static + Clone + Debug> Atomic<T> for Processor<T, M> {
    fn component(&self) -> &Component<T> {
        &self.component
    }

    fn component_mut(&mut self) -> &mut Component<T> {
        &mut self.component
    }

    fn output(&self) {
        if let Some(job) = self.jobs.front() {
            self.output.add_value(job.clone());
        }
    }

    fn internal(&mut self) {
        self.jobs.pop_front();
        self.next = if self.jobs.is_empty() {
            T::INFINITY
        } else {
            self.processing_time
        };
    }

    fn external(&mut self, e: T) {
        self.next = if self.jobs.is_empty() {
            self.processing_time
        } else {
            self.next - e
        };
        for job in self.input.values().iter() {
            self.jobs.push_back(job.clone());
        }
    }

    fn advance(&self) -> T {
        self.next
    }

    fn confluent(&mut self, e: T) {
        let _ = e;
        self.internal();
        self.external(T::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::Processor;
    use crate::modeling::Coupled;
    use crate::simulation::{RootCoordinator, Simulator};

    #[test]
    fn processor_serializes_jobs_one_at_a_time() {
        let mut top = Coupled::<f64>::new("top");
        let in_port = top.add_in_port::<u32>("in");
        let out_port = top.add_out_port::<u32>("out");
        let proc = Processor::<f64, u32>::new("p", 3.0);
        top.add_atomic(proc);
        top.add_eic("in", "p", "in").unwrap();
        top.add_eoc("p", "out", "out").unwrap();

        let mut root = RootCoordinator::new(top);
        root.start(0.0);
        in_port.add_value(10);
        root.collection(0.0);
        root.transition(0.0);
        root.clear_ports();
        assert_eq!(Simulator::component(&*root).t_next(), 3.0);

        root.collection(3.0);
        assert!(!out_port.is_empty());
        assert_eq!(&*out_port.values(), &[10]);
        root.transition(3.0);
        assert_eq!(Simulator::component(&*root).t_next(), f64::INFINITY);
    }
}
