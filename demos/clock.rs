//! Three generators of periods 1, 60, 3600 bubbled to one output port, run
//! until a two-hour horizon. `cargo run --example clock`.

use xdevs::models::Generator;
use xdevs::modeling::Coupled;
use xdevs::runner::Runner;

fn main() {
    let mut top = Coupled::<f64>::new("clock");
    let out = top.add_out_port::<u32>("out");
    top.add_atomic(Generator::new("seconds", 1.0, 1u32));
    top.add_atomic(Generator::new("minutes", 60.0, 1u32));
    top.add_atomic(Generator::new("hours", 3600.0, 1u32));
    top.add_eoc("seconds", "out", "out").unwrap();
    top.add_eoc("minutes", "out", "out").unwrap();
    top.add_eoc("hours", "out", "out").unwrap();

    let mut ticks = 0u32;
    let mut runner = Runner::new(top, out);
    let t_next = runner.run_until(7200.0, |_t, _v| ticks += 1);
    println!("ticks observed: {ticks}");
    println!("next scheduled event: {t_next}");
}
