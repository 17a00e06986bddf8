//! A confluent-transition-exercising counter. Grounded in the original
//! C++ library's `basic_models::infinite_counter`: counts the messages it
//! receives, but a `0` in the input bag fires an immediate (zero-delay)
//! output of the running total and resets the count, which is the
//! simplest model in the corpus that routinely hits the confluent case
//! (external input arriving exactly when `advance` scheduled zero).

use crate::modeling::{Atomic, Component, Input, Output, Port};
use crate::time::SimTime;

#[derive(Debug)]
pub struct InfiniteCounter<T: SimTime> {
    component: Component<T>,
    input: Port<Input, i64>,
    output: Port<Output, i64>,
    next: T,
    count: i64,
}

impl<T: SimTime> InfiniteCounter<T> {
    pub fn new(name: &str) -> Self {
        let mut component = Component::new(name);
        let input = component.add_in_port::<i64>("in");
        let output = component.add_out_port::<i64>("out");
        Self {
            component,
            input,
            output,
            next: T::INFINITY,
            count: 0,
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }
}

impl<T: SimTime> Atomic<T> for InfiniteCounter<T> {
    fn component(&self) -> &Component<T> {
        &self.component
    }

    fn component_mut(&mut self) -> &mut Component<T> {
        &mut self.component
    }

    fn output(&self) {
        self.output.add_value(self.count);
    }

    fn internal(&mut self) {
        self.next = T::INFINITY;
        self.count = 0;
    }

    fn external(&mut self, _e: T) {
        let values = self.input.values();
        let zeros = values.iter().filter(|&&v| v == 0).count() as i64;
        if zeros > 0 {
            self.next = T::ZERO;
            self.count += values.len() as i64 - zeros;
        } else {
            self.count += values.len() as i64;
        }
    }

    fn advance(&self) -> T {
        self.next
    }

    fn confluent(&mut self, e: T) {
        self.internal();
        self.external(e);
    }
}

#[cfg(test)]
mod tests {
    use super::InfiniteCounter;
    use crate::modeling::Coupled;
    use crate::simulation::{RootCoordinator, Simulator};

    #[test]
    fn zero_triggers_immediate_output_of_running_total() {
        let mut top = Coupled::<f64>::new("top");
        let in_port = top.add_in_port::<i64>("in");
        let out_port = top.add_out_port::<i64>("out");
        top.add_atomic(InfiniteCounter::<f64>::new("counter"));
        top.add_eic("in", "counter", "in").unwrap();
        top.add_eoc("counter", "out", "out").unwrap();

        let mut root = RootCoordinator::new(top);
        root.start(0.0);
        in_port.add_values(&[1, 1, 1]);
        root.collection(0.0);
        root.transition(0.0);
        root.clear_ports();
        assert_eq!(Simulator::component(&*root).t_next(), f64::INFINITY);

        in_port.add_values(&[0]);
        root.collection(5.0);
        root.transition(5.0);
        root.clear_ports();
        assert_eq!(Simulator::component(&*root).t_next(), 5.0);

        root.collection(5.0);
        assert_eq!(&*out_port.values(), &[3]);
        root.transition(5.0);
        assert_eq!(Simulator::component(&*root).t_next(), f64::INFINITY);
    }
}
