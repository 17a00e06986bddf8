//! A periodic emitter with no input. Grounded in the original C++
//! library's `basic_models::generator`: ticks every `period` time units,
//! emitting the same fixed value each time.

use crate::modeling::{Atomic, Component, Output, Port};
use crate::time::SimTime;
use std::fmt::Debug;

#[derive(Debug)]
pub struct Generator<T: SimTime, M> {
    component: Component<T>,
    out: Port<Output, M>,
    period: T,
    value: M,
}

impl<T: SimTime, M: 'static + Clone + Debug> Generator<T, M> {
    pub fn new(name: &str, period: T, value: M) -> Self {
        let mut component = Component::new(name);
        let out = component.add_out_port::<M>("out");
        Self {
            component,
            out,
            period,
            value,
        }
    }
}

impl<T: SimTime, M: 'static + Clone + Debug> Atomic<T> for Generator<T, M> {
    fn component(&self) -> &Component<T> {
        &self.component
    }

    fn component_mut(&mut self) -> &mut Component<T> {
        &mut self.component
    }

    fn output(&self) {
        self.out.add_value(self.value.clone());
    }

    fn internal(&mut self) {}

    fn external(&mut self, _e: T) {
        unreachable!("generator has no input port, so it can never receive external input");
    }

    fn advance(&self) -> T {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::Generator;
    use crate::simulation::{AtomicSimulator, RootCoordinator, Simulator};

    #[test]
    fn generator_ticks_at_fixed_period() {
        let gen = Generator::new("gen", 2.0_f64, 7u32);
        let out = gen.out.clone();
        let mut root = RootCoordinator::new(AtomicSimulator(gen));
        root.start(0.0);
        assert_eq!(Simulator::component(&*root).t_next(), 2.0);
        root.collection(2.0);
        assert_eq!(&*out.values(), &[7]);
        root.transition(2.0);
        assert_eq!(Simulator::component(&*root).t_next(), 4.0);
    }
}
