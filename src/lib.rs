//! A Parallel DEVS (PDEVS) discrete-event simulation kernel.
//!
//! The crate is organized the way the formalism is usually taught: a
//! [`time`] domain, the [`modeling`] layer (atomic and coupled model
//! descriptions), the [`simulation`] coordinator that walks a model tree,
//! a choice of [`scheduler`] for finding the next imminent event, and a
//! [`runner`] that ties a coordinator to an output sink for end-to-end
//! use. [`models`] ships a handful of ready-made atomic models for
//! experimentation.
//!
//! ```
//! use xdevs::modeling::{Atomic, Component};
//! use xdevs::models::Generator;
//! use xdevs::runner::Runner;
//! use xdevs::modeling::Coupled;
//!
//! let mut top = Coupled::<f64>::new("top");
//! let out = top.add_out_port::<u32>("out");
//! top.add_atomic(Generator::new("gen", 1.0_f64, 1u32));
//! top.add_eoc("gen", "out", "out").unwrap();
//!
//! let mut runner = Runner::new(top, out);
//! let mut ticks = Vec::new();
//! runner.run_until(3.5, |t, v| ticks.push((t, *v)));
//! assert_eq!(ticks, vec![(1.0, 1), (2.0, 1), (3.0, 1)]);
//! ```

pub mod error;
pub mod modeling;
pub mod models;
pub mod runner;
pub mod scheduler;
pub mod simulation;
pub mod time;

pub use error::{CompositionError, ParseError};
pub use simulation::{RootCoordinator, Simulator};
pub use time::{SimTime, Ticks};
