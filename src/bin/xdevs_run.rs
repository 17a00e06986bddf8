//! Runs one of the shipped demo models to stdout.
//!
//! USAGE:
//! `xdevs-run clock --until <T>`
//! `xdevs-run echo-box --until <T>`
//! `xdevs-run replay <FILE> [--until <T>]`

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use xdevs::models::{parse_trace, EventStream, Generator, Processor};
use xdevs::modeling::Coupled;
use xdevs::runner::Runner;

#[derive(Parser)]
#[command(name = "xdevs-run")]
#[command(about = "Runs a shipped PDEVS demo model and prints its output trace")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Three generators (periods 1, 60, 3600) bubbled to one output.
    Clock {
        /// Simulated time to run until.
        #[arg(long, default_value = "120")]
        until: f64,
    },
    /// A generator feeding two chained processors with delays 1 and 3.
    EchoBox {
        #[arg(long, default_value = "20")]
        until: f64,
    },
    /// Replays a `<time> <value>` trace file until it passivates.
    Replay {
        /// Path to a trace file of whitespace-separated `<time> <value>` lines.
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Clock { until } => run_clock(until),
        Commands::EchoBox { until } => run_echo_box(until),
        Commands::Replay { file } => run_replay(&file),
    }
}

fn run_clock(until: f64) {
    let mut top = Coupled::<f64>::new("clock");
    let out = top.add_out_port::<u32>("out");
    top.add_atomic(Generator::new("gen-1", 1.0, 1u32));
    top.add_atomic(Generator::new("gen-60", 60.0, 1u32));
    top.add_atomic(Generator::new("gen-3600", 3600.0, 1u32));
    top.add_eoc("gen-1", "out", "out").expect("wiring gen-1");
    top.add_eoc("gen-60", "out", "out").expect("wiring gen-60");
    top.add_eoc("gen-3600", "out", "out").expect("wiring gen-3600");

    info!(until, "running clock");
    let mut runner = Runner::new(top, out);
    let t_next = runner.run_until(until, |t, v| println!("{t}\t{v}"));
    info!(?t_next, "clock run finished");
}

fn run_echo_box(until: f64) {
    let mut top = Coupled::<f64>::new("echo-box");
    let out = top.add_out_port::<i32>("out");
    top.add_atomic(Generator::new("source", 1.0, 1i32));
    top.add_atomic(Processor::<f64, i32>::new("proc-1", 1.0));
    top.add_atomic(Processor::<f64, i32>::new("proc-3", 3.0));
    top.add_ic("source", "out", "proc-1", "in").expect("wiring source->proc-1");
    top.add_ic("proc-1", "out", "proc-3", "in").expect("wiring proc-1->proc-3");
    top.add_eoc("proc-3", "out", "out").expect("wiring proc-3->out");

    info!(until, "running echo box");
    let mut runner = Runner::new(top, out);
    let t_next = runner.run_until(until, |t, v| println!("{t}\t{v}"));
    info!(?t_next, "echo box run finished");
}

fn run_replay(file: &PathBuf) {
    let text = std::fs::read_to_string(file).expect("failed to read trace file");
    let records = parse_trace::<i32>(&text).expect("failed to parse trace file");
    let records = records
        .into_iter()
        .map(|r| xdevs::models::Record {
            time: r.time.0 as f64,
            value: r.value,
        })
        .collect();

    let mut top = Coupled::<f64>::new("replay");
    let out = top.add_out_port::<i32>("out");
    top.add_atomic(EventStream::new("trace", 0.0, records));
    top.add_eoc("trace", "out", "out").expect("wiring trace->out");

    let mut runner = Runner::new(top, out);
    info!(path = %file.display(), "replaying trace");
    runner.run_until_passivate(|t, v| println!("{t}\t{v}"));
}
