//! A generator feeding two chained processors with delays 1 and 3, printing
//! each stage's output as it bubbles to the root. `cargo run --example
//! echo_box`.

use xdevs::models::{Generator, Processor};
use xdevs::modeling::Coupled;
use xdevs::runner::Runner;

fn main() {
    let mut top = Coupled::<f64>::new("echo-box");
    let out = top.add_out_port::<i32>("out");
    top.add_atomic(Generator::new("source", 1.0, 1i32));
    top.add_atomic(Processor::<f64, i32>::new("proc-1", 1.0));
    top.add_atomic(Processor::<f64, i32>::new("proc-3", 3.0));
    top.add_ic("source", "out", "proc-1", "in").unwrap();
    top.add_ic("proc-1", "out", "proc-3", "in").unwrap();
    top.add_eoc("proc-3", "out", "out").unwrap();

    let mut runner = Runner::new(top, out);
    runner.run_until(20.0, |t, v| println!("{t}\t{v}"));
}
